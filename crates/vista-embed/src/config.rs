use std::fmt;

use serde::Serialize;

use vista_core::models::report::ReportRecord;

/// The embed configuration handed to the widget.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub embed_url: String,
    pub access_token: String,
    pub token_type: TokenType,
    pub settings: EmbedSettings,
}

impl EmbedConfig {
    pub fn for_report(report: &ReportRecord, access_token: impl Into<String>) -> Self {
        Self {
            kind: "report",
            id: report.report_id.clone(),
            embed_url: report.embed_url.clone(),
            access_token: access_token.into(),
            token_type: TokenType::Embed,
            settings: EmbedSettings::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Debug for EmbedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedConfig")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("embed_url", &self.embed_url)
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("settings", &self.settings)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    Aad,
    Embed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSettings {
    pub panes: Panes,
    pub background: Background,
    pub layout_type: LayoutType,
    pub contrast_mode: ContrastMode,
}

impl Default for EmbedSettings {
    /// Filter pane available but collapsed, page tabs shown, transparent
    /// background so the portal chrome shows through.
    fn default() -> Self {
        Self {
            panes: Panes {
                filters: FilterPane {
                    expanded: false,
                    visible: true,
                },
                page_navigation: PageNavigation { visible: true },
            },
            background: Background::Transparent,
            layout_type: LayoutType::Custom,
            contrast_mode: ContrastMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panes {
    pub filters: FilterPane,
    pub page_navigation: PageNavigation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPane {
    pub expanded: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNavigation {
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Background {
    Default,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutType {
    Master,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContrastMode {
    None,
    HighContrast1,
    HighContrast2,
}
