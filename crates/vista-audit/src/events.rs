use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    ReportSaved,
    ReportUpdated,
    ReportStatusToggled,
    ReportDeleted,
    ReportViewed,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::ReportSaved => "report_saved",
            AuditAction::ReportUpdated => "report_updated",
            AuditAction::ReportStatusToggled => "report_status_toggled",
            AuditAction::ReportDeleted => "report_deleted",
            AuditAction::ReportViewed => "report_viewed",
        }
    }
}

/// A structured audit event for a portal action.
///
/// Emitted through `tracing`, so it lands wherever the subscriber writes
/// (JSON lines when the binary runs with `--log-json`).
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub actor: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor: actor.into(),
            details: None,
        }
    }

    /// Shorthand for an event about a report record.
    pub fn report(action: AuditAction, report_id: impl Into<String>, actor: impl Into<String>) -> Self {
        Self::new(action, "report", report_id, actor)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            audit.action = self.action.as_str(),
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.actor = %self.actor,
            audit.details = %details,
            "audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_event_serializes_snake_case_action() {
        let event = AuditEvent::report(AuditAction::ReportStatusToggled, "report1", "admin")
            .with_details(serde_json::json!({ "isActive": false }));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["action"], "report_status_toggled");
        assert_eq!(value["resource_type"], "report");
        assert_eq!(value["details"]["isActive"], false);
        event.emit();
    }
}
