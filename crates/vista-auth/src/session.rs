use vista_core::models::session::Session;
use vista_core::slot_keys;
use vista_storage::slot::KeyValueSlot;
use vista_storage::state::{load_json, save_json};

use crate::error::AuthError;

/// Keeps the signed-in session across restarts in the `currentUser` slot.
pub struct SessionStore<S> {
    slots: S,
}

impl<S: KeyValueSlot> SessionStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// The previously persisted session, if any. Unreadable data counts as
    /// signed out.
    pub fn restore(&self) -> Option<Session> {
        match load_json::<Session>(&self.slots, slot_keys::CURRENT_USER) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                None
            }
        }
    }

    pub fn persist(&self, session: &Session) -> Result<(), AuthError> {
        save_json(&self.slots, slot_keys::CURRENT_USER, session)?;
        tracing::info!(username = %session.user.username, "session saved");
        Ok(())
    }

    /// Sign out.
    pub fn clear(&self) -> Result<(), AuthError> {
        self.slots.remove(slot_keys::CURRENT_USER)?;
        tracing::info!("session cleared");
        Ok(())
    }
}
