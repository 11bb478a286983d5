use std::io::Write;
use std::path::Path;

use vista_audit::{AuditAction, AuditEvent};
use vista_auth::directory::{Authenticator, Credentials};
use vista_auth::gate;
use vista_auth::tokens::resolve_embed_token;
use vista_core::models::category::ReportCategory;
use vista_core::models::report::{ReportPatch, ReportRecord};
use vista_core::models::session::{Role, Session};
use vista_embed::viewer::{ReportViewer, ViewState};
use vista_embed::widget::Surface;

use crate::app::App;
use crate::cli::{Command, ConfigCommand, ReportsCommand, UpdateFields};
use crate::config::{self, VistaConfig};
use crate::console::ConsoleWidget;

/// Run a command that needs the opened stores.
pub fn run(app: &mut App, command: Command, out: &mut dyn Write) -> eyre::Result<()> {
    match command {
        Command::Login {
            username,
            password,
            admin,
        } => login(app, username, password, admin, out),
        Command::Logout => logout(app, out),
        Command::Whoami => whoami(app, out),
        Command::Reports(cmd) => reports(app, cmd, out),
        Command::View { id } => view(app, &id, out),
        Command::Config(_) => eyre::bail!("config commands do not use the report store"),
    }
}

/// Run a `config` subcommand against the file at `path`.
pub fn run_config(path: &Path, command: ConfigCommand, out: &mut dyn Write) -> eyre::Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                eyre::bail!(
                    "config already exists at {}; pass --force to replace it",
                    path.display()
                );
            }
            let (config, password) = config::generate_config();
            config::save_config(path, &config)?;
            writeln!(out, "wrote {}", path.display())?;
            writeln!(out, "admin password: {password}")?;
        }
        ConfigCommand::Show => {
            let config = config::load_config(path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&config::redacted(&config))?)?;
        }
        ConfigCommand::Path => writeln!(out, "{}", path.display())?,
    }
    Ok(())
}

/// Load the config and open the stores.
pub fn open_app(path: &Path) -> eyre::Result<App> {
    let config: VistaConfig = config::load_config(path)?;
    Ok(App::open(&config))
}

fn login(
    app: &App,
    username: String,
    password: String,
    admin: bool,
    out: &mut dyn Write,
) -> eyre::Result<()> {
    let credentials = Credentials {
        username,
        password,
        role: if admin { Role::Admin } else { Role::User },
    };
    let session = app.directory.authenticate(&credentials)?;
    app.sessions.persist(&session)?;

    AuditEvent::new(AuditAction::Login, "session", &session.user.id, &session.user.username).emit();
    writeln!(
        out,
        "logged in as {} ({})",
        session.user.username,
        session.role()
    )?;
    Ok(())
}

fn logout(app: &App, out: &mut dyn Write) -> eyre::Result<()> {
    if let Some(session) = app.sessions.restore() {
        AuditEvent::new(AuditAction::Logout, "session", &session.user.id, &session.user.username)
            .emit();
    }
    app.sessions.clear()?;
    writeln!(out, "logged out")?;
    Ok(())
}

fn whoami(app: &App, out: &mut dyn Write) -> eyre::Result<()> {
    match app.sessions.restore() {
        Some(session) => writeln!(
            out,
            "{} <{}> ({}), signed in {}",
            session.user.username,
            session.user.email,
            session.role(),
            session.started_at
        )?,
        None => writeln!(out, "not logged in")?,
    }
    Ok(())
}

fn reports(app: &mut App, command: ReportsCommand, out: &mut dyn Write) -> eyre::Result<()> {
    match command {
        ReportsCommand::List { json } => {
            let session = app.require_session()?;
            let visible: Vec<ReportRecord> =
                gate::visible_reports(app.reports.get_all_reports(), &session)
                    .into_iter()
                    .map(|report| shown_to(&session, report))
                    .collect();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&visible)?)?;
            } else if visible.is_empty() {
                writeln!(out, "no reports available")?;
            } else {
                for report in &visible {
                    writeln!(
                        out,
                        "{:<38} {:<10} {:<8} {}",
                        report.id,
                        report.category,
                        if report.is_active { "active" } else { "inactive" },
                        report.name
                    )?;
                }
            }
        }
        ReportsCommand::Show { id } => {
            let session = app.require_session()?;
            let report = find_visible(app, &id, &session)?;
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&shown_to(&session, report))?
            )?;
        }
        ReportsCommand::Create { file, id } => {
            let session = app.require_admin()?;
            let patch: ReportPatch = read_json(&file)?;
            let mut record = ReportRecord {
                id: id.unwrap_or_default(),
                ..Default::default()
            };
            patch.apply_to(&mut record);

            let missing = record.missing_required_fields();
            if !missing.is_empty() {
                eyre::bail!("missing required fields: {}", missing.join(", "));
            }
            if !record.id.is_empty() && app.reports.contains(&record.id) {
                eyre::bail!("report {} already exists; use `reports update`", record.id);
            }
            warn_on_unknown_category(&record.category);

            let saved = app.reports.save_report(record);
            AuditEvent::report(AuditAction::ReportSaved, &saved.id, &session.user.username).emit();
            writeln!(out, "created report {}", saved.id)?;
        }
        ReportsCommand::Update { id, fields } => {
            let session = app.require_admin()?;
            let patch = build_patch(fields)?;
            if patch.is_empty() {
                eyre::bail!("nothing to update");
            }
            if let Some(category) = &patch.category {
                warn_on_unknown_category(category);
            }
            let details = serde_json::to_value(redact_patch(&patch))?;

            let updated = app
                .reports
                .update_report(&id, patch)
                .ok_or_else(|| eyre::eyre!("report {id} not found"))?;
            if !updated.missing_required_fields().is_empty() {
                tracing::warn!(report_id = %id, "report is missing required fields after update");
            }
            AuditEvent::report(AuditAction::ReportUpdated, &id, &session.user.username)
                .with_details(details)
                .emit();
            writeln!(out, "updated report {id} at {}", updated.last_updated)?;
        }
        ReportsCommand::Toggle { id } => {
            let session = app.require_admin()?;
            let is_active = app
                .reports
                .toggle_report_status(&id)
                .ok_or_else(|| eyre::eyre!("report {id} not found"))?;
            AuditEvent::report(AuditAction::ReportStatusToggled, &id, &session.user.username)
                .with_details(serde_json::json!({ "isActive": is_active }))
                .emit();
            writeln!(
                out,
                "report {id} is now {}",
                if is_active { "active" } else { "inactive" }
            )?;
        }
        ReportsCommand::Delete { id } => {
            let session = app.require_admin()?;
            if !app.reports.delete_report(&id) {
                eyre::bail!("report {id} not found");
            }
            AuditEvent::report(AuditAction::ReportDeleted, &id, &session.user.username).emit();
            writeln!(out, "deleted report {id}")?;
        }
        ReportsCommand::Categories => {
            for category in ReportCategory::ALL {
                writeln!(out, "{:<12} {}", category.as_str(), category.label())?;
            }
            return Ok(());
        }
    }

    // Goes to the log on stderr so stdout stays parseable.
    if let vista_reports::SyncState::Diverged { error } = app.reports.sync_state() {
        tracing::warn!(%error, "changes could not be saved; they will be lost when vista exits");
    }
    Ok(())
}

fn view(app: &App, id: &str, out: &mut dyn Write) -> eyre::Result<()> {
    let session = app.require_session()?;
    let report = find_visible(app, id, &session)?;
    let token = resolve_embed_token(&report, app.issuer.as_ref());

    let viewer = ReportViewer::new(ConsoleWidget::new(&mut *out));
    let view = viewer.open(&report, token.as_ref(), &Surface("console".to_string()));
    drop(viewer);

    AuditEvent::report(AuditAction::ReportViewed, &report.id, &session.user.username).emit();

    writeln!(out, "{} [{}]", report.name, report.category)?;
    match view.state() {
        ViewState::AuthenticationRequired {
            report_id,
            client_id,
            embed_url,
        } => {
            writeln!(out, "Authentication required: an access token is needed to display the report.")?;
            writeln!(out, "  report id: {report_id}")?;
            writeln!(out, "  client id: {client_id}")?;
            writeln!(out, "  embed url: {embed_url}")?;
        }
        ViewState::Loading => writeln!(out, "loading")?,
        ViewState::Ready => {
            let caps = view.capabilities();
            writeln!(
                out,
                "ready (export: {}, print: {})",
                if caps.export { "yes" } else { "no" },
                if caps.print { "yes" } else { "no" }
            )?;
        }
        ViewState::Failed { detail } => writeln!(out, "failed to display report: {detail}")?,
    }
    view.close();
    Ok(())
}

fn find_visible(app: &App, id: &str, session: &Session) -> eyre::Result<ReportRecord> {
    app.reports
        .get_report(id)
        .filter(|r| gate::can_view(r, session))
        .ok_or_else(|| eyre::eyre!("report {id} not found"))
}

/// Embed tokens are for administrators only.
fn shown_to(session: &Session, mut report: ReportRecord) -> ReportRecord {
    if !session.user.is_admin() {
        report.embed_token.clear();
    }
    report
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| eyre::eyre!("invalid form {}: {e}", path.display()))
}

fn build_patch(fields: UpdateFields) -> eyre::Result<ReportPatch> {
    let mut patch: ReportPatch = match &fields.file {
        Some(path) => read_json(path)?,
        None => ReportPatch::default(),
    };

    let overrides = ReportPatch {
        name: fields.name,
        description: fields.description,
        category: fields.category,
        embed_url: fields.embed_url,
        embed_token: fields.embed_token,
        allow_export: fields.allow_export,
        allow_print: fields.allow_print,
        access_users: (!fields.users.is_empty()).then_some(fields.users),
        ..Default::default()
    };
    merge_patch(&mut patch, overrides);
    Ok(patch)
}

fn merge_patch(base: &mut ReportPatch, overrides: ReportPatch) {
    macro_rules! take {
        ($($field:ident),*) => {
            $(if overrides.$field.is_some() {
                base.$field = overrides.$field;
            })*
        };
    }
    take!(
        name,
        description,
        category,
        client_id,
        report_id,
        embed_url,
        tenant_id,
        embed_token,
        core_dataset_id,
        report_dataset_id,
        allow_export,
        allow_print,
        access_users,
        is_active
    );
}

fn redact_patch(patch: &ReportPatch) -> ReportPatch {
    let mut shown = patch.clone();
    if shown.embed_token.is_some() {
        shown.embed_token = Some("****".to_string());
    }
    shown
}

fn warn_on_unknown_category(category: &str) {
    if !category.is_empty() && category.parse::<ReportCategory>().is_err() {
        tracing::warn!(%category, "category is not one of the suggested categories");
    }
}
