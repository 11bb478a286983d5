use crate::config::EmbedConfig;
use crate::error::EmbedError;

/// Where a widget draws. Opaque to everything but the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEventKind {
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Loaded,
    Error { detail: String },
}

impl WidgetEvent {
    pub fn kind(&self) -> WidgetEventKind {
        match self {
            WidgetEvent::Loaded => WidgetEventKind::Loaded,
            WidgetEvent::Error { .. } => WidgetEventKind::Error,
        }
    }
}

pub type EventHandler = Box<dyn FnMut(&WidgetEvent) + Send>;

/// The external report renderer.
pub trait EmbedWidget {
    fn embed(
        &self,
        surface: &Surface,
        config: &EmbedConfig,
    ) -> Result<Box<dyn EmbeddedReport>, EmbedError>;
}

/// A report the widget is rendering.
pub trait EmbeddedReport {
    /// Subscribe to `kind`, replacing any existing handler.
    fn on(&mut self, kind: WidgetEventKind, handler: EventHandler);

    fn off(&mut self, kind: WidgetEventKind);
}
