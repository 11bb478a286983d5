use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// A portal account as the session layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Report ids this account may open. Ignored for admins.
    #[serde(default)]
    pub accessible_reports: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The signed-in actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub user: User,
    pub started_at: jiff::Timestamp,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            started_at: jiff::Timestamp::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn can_open(&self, report_id: &str) -> bool {
        self.user.is_admin() || self.user.accessible_reports.iter().any(|r| r == report_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn user_without_accessible_reports_decodes() {
        let json = r#"{"id":"1","username":"admin","email":"admin@company.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        assert!(user.accessible_reports.is_empty());
    }

    #[test]
    fn admins_can_open_everything() {
        let admin = Session::new(User {
            id: "1".to_string(),
            username: "admin".to_string(),
            email: String::new(),
            role: Role::Admin,
            accessible_reports: vec![],
        });
        assert!(admin.can_open("anything"));

        let user = Session::new(User {
            id: "2".to_string(),
            username: "user1".to_string(),
            email: String::new(),
            role: Role::User,
            accessible_reports: vec!["report1".to_string()],
        });
        assert!(user.can_open("report1"));
        assert!(!user.can_open("report3"));
    }
}
