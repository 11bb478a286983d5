use vista_core::models::report::ReportRecord;
use vista_core::models::session::Session;

/// Whether `session` may see `report` in a listing or open it.
///
/// Admins see everything. Users see active reports that are either in
/// their `accessibleReports` or list them in `accessUsers`.
pub fn can_view(report: &ReportRecord, session: &Session) -> bool {
    if session.user.is_admin() {
        return true;
    }
    if !report.is_active {
        return false;
    }
    session.can_open(&report.id)
        || report.grants(&session.user.id)
        || report.grants(&session.user.username)
}

/// Filter a full listing down to what `session` may see, keeping order.
pub fn visible_reports(reports: Vec<ReportRecord>, session: &Session) -> Vec<ReportRecord> {
    reports
        .into_iter()
        .filter(|r| can_view(r, session))
        .collect()
}

#[cfg(test)]
mod tests {
    use vista_core::models::session::{Role, User};

    use super::*;

    fn report(id: &str, active: bool, users: &[&str]) -> ReportRecord {
        ReportRecord {
            id: id.to_string(),
            is_active: active,
            access_users: users.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    fn session(role: Role, accessible: &[&str]) -> Session {
        Session::new(User {
            id: "u-7".to_string(),
            username: "user7".to_string(),
            email: String::new(),
            role,
            accessible_reports: accessible.iter().map(|r| r.to_string()).collect(),
        })
    }

    #[test]
    fn admin_sees_inactive_reports() {
        let reports = vec![report("a", false, &[]), report("b", true, &[])];
        assert_eq!(visible_reports(reports, &session(Role::Admin, &[])).len(), 2);
    }

    #[test]
    fn user_sees_granted_active_reports_in_order() {
        let reports = vec![
            report("a", true, &[]),
            report("b", true, &["user7"]),
            report("c", false, &["user7"]),
            report("d", true, &["u-7"]),
            report("e", true, &["someone"]),
        ];
        let visible = visible_reports(reports, &session(Role::User, &["a"]));
        let ids: Vec<&str> = visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "d"]);
    }
}
