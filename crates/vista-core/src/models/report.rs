use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Configuration for one embeddable dashboard and its access rules.
///
/// Field names on the wire are camelCase; the stored snapshot and the front
/// end both depend on them.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Free-form; see [`super::category::ReportCategory`] for the suggested set.
    pub category: String,
    pub client_id: String,
    pub report_id: String,
    pub embed_url: String,
    pub tenant_id: String,
    /// Short-lived widget credential. Stored and sent in clear text.
    pub embed_token: String,
    pub core_dataset_id: String,
    #[serde(default)]
    pub report_dataset_id: String,
    pub allow_export: bool,
    pub allow_print: bool,
    pub access_users: Vec<String>,
    pub is_active: bool,
    /// Written by the store on every mutation.
    pub last_updated: String,
}

impl ReportRecord {
    /// Whether `user` is listed in `accessUsers`.
    pub fn grants(&self, user: &str) -> bool {
        self.access_users.iter().any(|u| u == user)
    }

    pub fn has_embed_token(&self) -> bool {
        !self.embed_token.trim().is_empty()
    }

    /// Names of required fields that are still empty. A record is only
    /// offered to the store once this is empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.embed_url.trim().is_empty() {
            missing.push("embedUrl");
        }
        if self.core_dataset_id.trim().is_empty() {
            missing.push("coreDatasetId");
        }
        missing
    }

    /// Dataset ids the report reads from, core dataset first.
    pub fn dataset_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.core_dataset_id.as_str()];
        if !self.report_dataset_id.is_empty() {
            ids.push(self.report_dataset_id.as_str());
        }
        ids
    }
}

impl fmt::Debug for ReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.embed_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("ReportRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("client_id", &self.client_id)
            .field("report_id", &self.report_id)
            .field("embed_url", &self.embed_url)
            .field("tenant_id", &self.tenant_id)
            .field("embed_token", &token)
            .field("core_dataset_id", &self.core_dataset_id)
            .field("report_dataset_id", &self.report_dataset_id)
            .field("allow_export", &self.allow_export)
            .field("allow_print", &self.allow_print)
            .field("access_users", &self.access_users)
            .field("is_active", &self.is_active)
            .field("last_updated", &self.last_updated)
            .finish()
    }
}

/// A partial edit of a [`ReportRecord`].
///
/// `id` and `lastUpdated` are deliberately absent: the key never changes and
/// the timestamp belongs to the store. Unknown fields are rejected so a form
/// cannot smuggle either of them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct ReportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub embed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub embed_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub core_dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub report_dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub allow_export: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub allow_print: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub access_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_active: Option<bool>,
}

impl ReportPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow field-level override: every `Some` replaces the record's value.
    pub fn apply_to(self, record: &mut ReportRecord) {
        let Self {
            name,
            description,
            category,
            client_id,
            report_id,
            embed_url,
            tenant_id,
            embed_token,
            core_dataset_id,
            report_dataset_id,
            allow_export,
            allow_print,
            access_users,
            is_active,
        } = self;

        replace(&mut record.name, name);
        replace(&mut record.description, description);
        replace(&mut record.category, category);
        replace(&mut record.client_id, client_id);
        replace(&mut record.report_id, report_id);
        replace(&mut record.embed_url, embed_url);
        replace(&mut record.tenant_id, tenant_id);
        replace(&mut record.embed_token, embed_token);
        replace(&mut record.core_dataset_id, core_dataset_id);
        replace(&mut record.report_dataset_id, report_dataset_id);
        replace(&mut record.allow_export, allow_export);
        replace(&mut record.allow_print, allow_print);
        replace(&mut record.access_users, access_users);
        replace(&mut record.is_active, is_active);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
