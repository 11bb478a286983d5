use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Report portal administration and viewing.
#[derive(Parser, Debug)]
#[command(name = "vista", version)]
pub struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file to use instead of the default location.
    #[arg(long, global = true, env = "VISTA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
        /// Sign in to the admin portal.
        #[arg(long)]
        admin: bool,
    },
    /// Forget the current session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage report configurations.
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Open a report the way the report page does.
    View { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Write a new config with a generated admin password and signing key.
    Init {
        /// Overwrite an existing config.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config with secrets masked.
    Show,
    /// Print the config file location.
    Path,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReportsCommand {
    /// List the reports the signed-in user can see.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one report.
    Show { id: String },
    /// Create a report from a JSON form (camelCase fields, no id).
    Create {
        #[arg(long)]
        file: PathBuf,
        /// Use this id instead of a generated one.
        #[arg(long)]
        id: Option<String>,
    },
    /// Change fields of an existing report.
    Update {
        id: String,
        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Activate or deactivate a report.
    Toggle { id: String },
    /// Delete a report.
    Delete { id: String },
    /// List the suggested categories.
    Categories,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct UpdateFields {
    /// JSON file with the fields to change. Flags override it.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub embed_url: Option<String>,
    #[arg(long)]
    pub embed_token: Option<String>,
    #[arg(long)]
    pub allow_export: Option<bool>,
    #[arg(long)]
    pub allow_print: Option<bool>,
    /// Replace the users allowed to view the report.
    #[arg(long = "user", value_name = "USER")]
    pub users: Vec<String>,
}
