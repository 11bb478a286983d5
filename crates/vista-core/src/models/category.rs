use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Categories the configuration form offers.
///
/// `ReportRecord::category` stays a free-form string; this is only the
/// suggested set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReportCategory {
    Sales,
    Marketing,
    Finance,
    Operations,
    #[serde(rename = "HR")]
    Hr,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 5] = [
        ReportCategory::Sales,
        ReportCategory::Marketing,
        ReportCategory::Finance,
        ReportCategory::Operations,
        ReportCategory::Hr,
    ];

    /// Value stored in `ReportRecord::category`.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportCategory::Sales => "Sales",
            ReportCategory::Marketing => "Marketing",
            ReportCategory::Finance => "Finance",
            ReportCategory::Operations => "Operations",
            ReportCategory::Hr => "HR",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            ReportCategory::Hr => "Human Resources",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}
