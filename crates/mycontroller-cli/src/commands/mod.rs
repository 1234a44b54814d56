//! Command implementations for the CLI.

mod config_cmd;
mod set;
mod show;

pub use config_cmd::cmd_config;
pub use set::cmd_set;
pub use show::cmd_show;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use mycontroller_core::client::McClient;
use mycontroller_core::{
    Catalog, SESSION_KEY, Services, SessionContext, SessionHandle, Translator,
};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::frontend::{ConfiguredGeolocator, FileSessionStore, PromptDialog, TerminalAlerts};

/// Everything a settings command needs.
pub struct CommandContext {
    pub services: Services,
    pub format: OutputFormat,
    pub no_color: bool,
    pub quiet: bool,
}

/// Flags that shape how commands talk to the user.
#[derive(Debug, Clone, Copy)]
pub struct UiOptions {
    pub format: OutputFormat,
    pub no_color: bool,
    pub quiet: bool,
    pub assume_yes: bool,
}

impl CommandContext {
    /// Wire the HTTP client and the terminal front end into one bundle.
    pub fn connect(server_url: &str, config: &Config, config_dir: &Path, ui: UiOptions) -> Result<Self> {
        let mut client = McClient::new(server_url)
            .with_context(|| format!("Cannot use server URL {}", server_url))?;
        if let Some(username) = &config.username {
            client = client.with_basic_auth(username, config.password.as_deref());
        }

        // The snapshot from the last controller save carries the server's
        // language; the config file only covers the time before one exists.
        let session_store = FileSessionStore::new(config_dir.join("session.json"));
        let session = session_store.load(SESSION_KEY).unwrap_or_default();
        let catalog = Catalog::english();
        catalog.set_language(active_language(&session, config));

        let services = Services::builder(Arc::new(client))
            .translator(Arc::new(catalog))
            .alerts(Arc::new(TerminalAlerts {
                no_color: ui.no_color,
                quiet: ui.quiet,
            }))
            .session_store(Arc::new(session_store))
            .session(SessionHandle::new(session))
            .geolocator(Arc::new(ConfiguredGeolocator {
                position: config.location.map(Into::into),
            }))
            .dialogs(Arc::new(PromptDialog {
                assume_yes: ui.assume_yes,
                no_color: ui.no_color,
            }))
            .build();

        Ok(Self {
            services,
            format: ui.format,
            no_color: ui.no_color,
            quiet: ui.quiet,
        })
    }
}

/// Language for CLI messages: the restored session's, else the config file's.
fn active_language<'a>(session: &'a SessionContext, config: &'a Config) -> &'a str {
    session.language().unwrap_or(&config.language)
}
