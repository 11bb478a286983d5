use std::sync::{Arc, Mutex};

use vista_auth::tokens::EmbedToken;
use vista_core::models::report::ReportRecord;

use crate::config::EmbedConfig;
use crate::widget::{EmbedWidget, EmbeddedReport, Surface, WidgetEvent, WidgetEventKind};

/// What the report page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// No token: the widget was not invoked. Carries the non-secret
    /// configuration so the problem can be diagnosed.
    AuthenticationRequired {
        report_id: String,
        client_id: String,
        embed_url: String,
    },
    /// Embedded, waiting for the widget's `loaded` notification.
    Loading,
    Ready,
    Failed { detail: String },
}

/// Capability flags shown next to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub export: bool,
    pub print: bool,
}

/// Opens reports through an [`EmbedWidget`].
pub struct ReportViewer<W> {
    widget: W,
}

impl<W: EmbedWidget> ReportViewer<W> {
    pub fn new(widget: W) -> Self {
        Self { widget }
    }

    pub fn open(
        &self,
        report: &ReportRecord,
        token: Option<&EmbedToken>,
        surface: &Surface,
    ) -> ReportView {
        let capabilities = Capabilities {
            export: report.allow_export,
            print: report.allow_print,
        };

        let Some(token) = token.filter(|t| !t.token.is_empty()) else {
            tracing::info!(report_id = %report.id, "no embed token, authentication required");
            return ReportView::detached(
                capabilities,
                ViewState::AuthenticationRequired {
                    report_id: report.report_id.clone(),
                    client_id: report.client_id.clone(),
                    embed_url: report.embed_url.clone(),
                },
            );
        };

        if report.report_id.is_empty() || report.embed_url.is_empty() {
            return ReportView::detached(
                capabilities,
                ViewState::Failed {
                    detail: "report has no report id or embed URL configured".to_string(),
                },
            );
        }

        let config = EmbedConfig::for_report(report, token.token.clone());
        let mut embedded = match self.widget.embed(surface, &config) {
            Ok(embedded) => embedded,
            Err(e) => {
                tracing::error!(report_id = %report.id, error = %e, "embedding failed");
                return ReportView::detached(
                    capabilities,
                    ViewState::Failed {
                        detail: e.to_string(),
                    },
                );
            }
        };

        let state = Arc::new(Mutex::new(ViewState::Loading));

        let loaded_state = Arc::clone(&state);
        let report_id = report.id.clone();
        embedded.on(
            WidgetEventKind::Loaded,
            Box::new(move |_| {
                tracing::info!(report_id = %report_id, "report loaded");
                set_state(&loaded_state, ViewState::Ready);
            }),
        );

        let error_state = Arc::clone(&state);
        let report_id = report.id.clone();
        embedded.on(
            WidgetEventKind::Error,
            Box::new(move |event| {
                let detail = match event {
                    WidgetEvent::Error { detail } => detail.clone(),
                    WidgetEvent::Loaded => return,
                };
                tracing::error!(report_id = %report_id, %detail, "report error");
                set_state(&error_state, ViewState::Failed { detail });
            }),
        );

        ReportView {
            capabilities,
            state,
            embedded: Some(embedded),
        }
    }
}

fn set_state(state: &Mutex<ViewState>, next: ViewState) {
    *state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
}

/// A report on screen. Dropping it releases the widget subscriptions.
pub struct ReportView {
    capabilities: Capabilities,
    state: Arc<Mutex<ViewState>>,
    embedded: Option<Box<dyn EmbeddedReport>>,
}

impl ReportView {
    fn detached(capabilities: Capabilities, state: ViewState) -> Self {
        Self {
            capabilities,
            state: Arc::new(Mutex::new(state)),
            embedded: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether the widget was invoked for this view.
    pub fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }

    /// Tear the view down now instead of on drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut embedded) = self.embedded.take() {
            embedded.off(WidgetEventKind::Loaded);
            embedded.off(WidgetEventKind::Error);
            tracing::debug!("widget subscriptions released");
        }
    }
}

impl Drop for ReportView {
    fn drop(&mut self) {
        self.release();
    }
}
