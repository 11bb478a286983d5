use std::io::Write;
use std::sync::Mutex;

use vista_embed::config::EmbedConfig;
use vista_embed::error::EmbedError;
use vista_embed::widget::{
    EmbedWidget, EmbeddedReport, EventHandler, Surface, WidgetEvent, WidgetEventKind,
};

/// Text stand-in for the browser widget: describes what it would render.
///
/// Rendering is synchronous, so a `loaded` subscriber is notified as soon
/// as it subscribes.
pub struct ConsoleWidget<W> {
    out: Mutex<W>,
}

impl<W: Write> ConsoleWidget<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write> EmbedWidget for ConsoleWidget<W> {
    fn embed(
        &self,
        surface: &Surface,
        config: &EmbedConfig,
    ) -> Result<Box<dyn EmbeddedReport>, EmbedError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| EmbedError::Surface(surface.0.clone()))?;
        writeln!(out, "embedding report {} into {}", config.id, surface.0)
            .and_then(|()| writeln!(out, "  url:      {}", config.embed_url))
            .and_then(|()| writeln!(out, "  token:    {:?}", config.token_type))
            .and_then(|()| {
                writeln!(
                    out,
                    "  filters:  {}",
                    if config.settings.panes.filters.visible {
                        "visible"
                    } else {
                        "hidden"
                    }
                )
            })
            .map_err(|e| EmbedError::Surface(e.to_string()))?;
        Ok(Box::new(ConsoleReport))
    }
}

struct ConsoleReport;

impl EmbeddedReport for ConsoleReport {
    fn on(&mut self, kind: WidgetEventKind, mut handler: EventHandler) {
        if kind == WidgetEventKind::Loaded {
            handler(&WidgetEvent::Loaded);
        }
    }

    fn off(&mut self, _kind: WidgetEventKind) {}
}
