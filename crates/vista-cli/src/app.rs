use std::time::Duration;

use vista_auth::directory::UserDirectory;
use vista_auth::session::SessionStore;
use vista_auth::tokens::{NoTokenIssuer, SignedTokenIssuer, TokenIssuer};
use vista_core::models::session::Session;
use vista_reports::ReportStore;
use vista_storage::slot::FileSlots;

use crate::config::VistaConfig;

/// Everything a command needs, built once at startup and passed down.
pub struct App {
    pub reports: ReportStore<FileSlots>,
    pub sessions: SessionStore<FileSlots>,
    pub directory: UserDirectory,
    pub issuer: Box<dyn TokenIssuer>,
}

impl App {
    pub fn open(config: &VistaConfig) -> Self {
        let mut slots = FileSlots::new(&config.data_dir);
        if let Some(quota) = config.storage_quota_bytes {
            slots = slots.with_quota(quota);
        }
        tracing::debug!(data_dir = %config.data_dir.display(), "opening storage");

        let issuer: Box<dyn TokenIssuer> = match &config.embed_signing_key {
            Some(key) => Box::new(SignedTokenIssuer::new(
                key.as_bytes(),
                Duration::from_secs(config.embed_token_ttl_minutes.saturating_mul(60)),
            )),
            None => Box::new(NoTokenIssuer),
        };

        Self {
            reports: ReportStore::open(slots.clone()),
            sessions: SessionStore::new(slots),
            directory: config.users.clone(),
            issuer,
        }
    }

    /// The signed-in session, or an error telling the user to log in.
    pub fn require_session(&self) -> eyre::Result<Session> {
        self.sessions
            .restore()
            .ok_or_else(|| eyre::eyre!("not logged in; run `vista login` first"))
    }

    pub fn require_admin(&self) -> eyre::Result<Session> {
        let session = self.require_session()?;
        if !session.user.is_admin() {
            eyre::bail!("{} is not an administrator", session.user.username);
        }
        Ok(session)
    }
}
