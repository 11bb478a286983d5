use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vista_auth::tokens::EmbedToken;
use vista_core::models::report::ReportRecord;
use vista_embed::config::EmbedConfig;
use vista_embed::error::EmbedError;
use vista_embed::viewer::{ReportViewer, ViewState};
use vista_embed::widget::{
    EmbedWidget, EmbeddedReport, EventHandler, Surface, WidgetEvent, WidgetEventKind,
};

#[derive(Default)]
struct Log {
    embeds: Vec<EmbedConfig>,
    handlers: HashMap<WidgetEventKind, EventHandler>,
    released: Vec<WidgetEventKind>,
}

#[derive(Clone, Default)]
struct FakeWidget {
    log: Arc<Mutex<Log>>,
    fail: bool,
}

impl FakeWidget {
    fn fire(&self, event: WidgetEvent) {
        let mut log = self.log.lock().unwrap();
        if let Some(handler) = log.handlers.get_mut(&event.kind()) {
            handler(&event);
        }
    }

    fn embed_count(&self) -> usize {
        self.log.lock().unwrap().embeds.len()
    }
}

struct FakeReport {
    log: Arc<Mutex<Log>>,
}

impl EmbedWidget for FakeWidget {
    fn embed(
        &self,
        _surface: &Surface,
        config: &EmbedConfig,
    ) -> Result<Box<dyn EmbeddedReport>, EmbedError> {
        if self.fail {
            return Err(EmbedError::Widget("container detached".to_string()));
        }
        self.log.lock().unwrap().embeds.push(config.clone());
        Ok(Box::new(FakeReport {
            log: Arc::clone(&self.log),
        }))
    }
}

impl EmbeddedReport for FakeReport {
    fn on(&mut self, kind: WidgetEventKind, handler: EventHandler) {
        self.log.lock().unwrap().handlers.insert(kind, handler);
    }

    fn off(&mut self, kind: WidgetEventKind) {
        let mut log = self.log.lock().unwrap();
        log.handlers.remove(&kind);
        log.released.push(kind);
    }
}

fn report() -> ReportRecord {
    ReportRecord {
        id: "report1".to_string(),
        report_id: "abcd1234".to_string(),
        client_id: "client-guid".to_string(),
        embed_url: "https://app.powerbi.com/reportEmbed?reportId=abcd1234".to_string(),
        allow_export: true,
        allow_print: false,
        ..Default::default()
    }
}

fn token(value: &str) -> EmbedToken {
    EmbedToken {
        token: value.to_string(),
        expires_at: None,
    }
}

fn surface() -> Surface {
    Surface("report-container".to_string())
}

#[test]
fn missing_token_never_invokes_the_widget() {
    let widget = FakeWidget::default();
    let viewer = ReportViewer::new(widget.clone());

    let view = viewer.open(&report(), None, &surface());
    assert_eq!(
        view.state(),
        ViewState::AuthenticationRequired {
            report_id: "abcd1234".to_string(),
            client_id: "client-guid".to_string(),
            embed_url: "https://app.powerbi.com/reportEmbed?reportId=abcd1234".to_string(),
        }
    );
    assert!(!view.is_embedded());

    let empty = viewer.open(&report(), Some(&token("")), &surface());
    assert!(matches!(empty.state(), ViewState::AuthenticationRequired { .. }));
    assert_eq!(widget.embed_count(), 0);
}

#[test]
fn loaded_notification_makes_the_view_ready() {
    let widget = FakeWidget::default();
    let viewer = ReportViewer::new(widget.clone());

    let view = viewer.open(&report(), Some(&token("tok")), &surface());
    assert_eq!(view.state(), ViewState::Loading);
    assert!(view.capabilities().export);
    assert!(!view.capabilities().print);

    widget.fire(WidgetEvent::Loaded);
    assert_eq!(view.state(), ViewState::Ready);

    let log = widget.log.lock().unwrap();
    assert_eq!(log.embeds.len(), 1);
    assert_eq!(log.embeds[0].id, "abcd1234");
    assert_eq!(log.embeds[0].access_token, "tok");
}

#[test]
fn error_notification_fails_the_view() {
    let widget = FakeWidget::default();
    let viewer = ReportViewer::new(widget.clone());
    let view = viewer.open(&report(), Some(&token("tok")), &surface());

    widget.fire(WidgetEvent::Error {
        detail: "TokenExpired".to_string(),
    });
    assert_eq!(
        view.state(),
        ViewState::Failed {
            detail: "TokenExpired".to_string()
        }
    );
}

#[test]
fn widget_embed_failure_is_a_failed_view() {
    let widget = FakeWidget {
        fail: true,
        ..Default::default()
    };
    let view = ReportViewer::new(widget).open(&report(), Some(&token("tok")), &surface());
    assert!(matches!(view.state(), ViewState::Failed { .. }));
    assert!(!view.is_embedded());
}

#[test]
fn incomplete_configuration_is_not_embedded() {
    let widget = FakeWidget::default();
    let mut incomplete = report();
    incomplete.embed_url.clear();

    let view = ReportViewer::new(widget.clone()).open(&incomplete, Some(&token("tok")), &surface());
    assert!(matches!(view.state(), ViewState::Failed { .. }));
    assert_eq!(widget.embed_count(), 0);
}

#[test]
fn teardown_releases_both_subscriptions() {
    let widget = FakeWidget::default();
    let viewer = ReportViewer::new(widget.clone());

    let view = viewer.open(&report(), Some(&token("tok")), &surface());
    drop(view);
    {
        let log = widget.log.lock().unwrap();
        assert!(log.handlers.is_empty());
        assert_eq!(
            log.released,
            vec![WidgetEventKind::Loaded, WidgetEventKind::Error]
        );
    }

    let view = viewer.open(&report(), Some(&token("tok")), &surface());
    view.close();
    assert_eq!(widget.log.lock().unwrap().released.len(), 4);
}
