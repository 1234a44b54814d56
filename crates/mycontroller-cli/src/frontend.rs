//! Terminal implementations of the presentation collaborators.

use std::collections::BTreeMap;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use mycontroller_core::{
    AlertSink, DialogOutcome, DialogPresenter, Geolocator, RetentionWarningDialog, SessionContext,
    SessionStore, SettingsError,
};
use mycontroller_types::Position;
use tracing::debug;

use crate::style::{format_error, format_success, format_warning};

/// Prints alerts to stderr so stdout stays clean for command output.
#[derive(Debug, Clone, Copy)]
pub struct TerminalAlerts {
    pub no_color: bool,
    pub quiet: bool,
}

impl AlertSink for TerminalAlerts {
    fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", format_success(message, self.no_color));
        }
    }

    fn error(&self, error: &SettingsError) {
        eprintln!("{}", format_error(&alert_text(error), self.no_color));
    }
}

/// Alert text for a failed operation, with a retry hint when running the
/// same command again could succeed.
pub fn alert_text(error: &SettingsError) -> String {
    if error.is_transient() {
        format!("{} (temporary failure, try again)", error)
    } else {
        error.to_string()
    }
}

/// Asks for confirmation on the terminal.
///
/// With `assume_yes` every dialog is confirmed without asking. When stdin is
/// not a terminal and `assume_yes` is off, the dialog is dismissed.
#[derive(Debug, Clone, Copy)]
pub struct PromptDialog {
    pub assume_yes: bool,
    pub no_color: bool,
}

#[async_trait]
impl DialogPresenter for PromptDialog {
    async fn open(&self, dialog: &RetentionWarningDialog) -> DialogOutcome {
        if self.assume_yes {
            return dialog.confirm();
        }
        if !std::io::stdin().is_terminal() {
            eprintln!(
                "{}",
                format_warning(
                    "Cannot prompt for confirmation in non-interactive mode. Use --yes to skip confirmation.",
                    self.no_color,
                )
            );
            return dialog.cancel();
        }

        let prompt = format!("{}\n{}", dialog.header(), dialog.message());
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(true)) => dialog.confirm(),
            Ok(Ok(false)) => dialog.cancel(),
            Ok(Err(e)) => {
                debug!("Confirmation prompt failed: {}", e);
                dialog.cancel()
            }
            Err(e) => {
                debug!("Confirmation prompt task failed: {}", e);
                dialog.cancel()
            }
        }
    }
}

/// Reports the position configured in the `[location]` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredGeolocator {
    pub position: Option<Position>,
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> mycontroller_core::Result<Position> {
        self.position.ok_or_else(|| {
            SettingsError::Geolocation(
                "no [location] section in the configuration file".to_string(),
            )
        })
    }
}

/// Persists session snapshots as a JSON object keyed by session key.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back the snapshot stored under `key`.
    pub fn load(&self, key: &str) -> Option<SessionContext> {
        self.read_all().remove(key)
    }

    fn read_all(&self) -> BTreeMap<String, SessionContext> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }
}

impl SessionStore for FileSessionStore {
    fn put(&self, key: &str, session: &SessionContext) -> mycontroller_core::Result<()> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), session.clone());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::Session(format!("{}: {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)
            .map_err(|e| SettingsError::Session(format!("{}: {}", self.path.display(), e)))?;
        debug!("Session stored in {}", self.path.display());
        Ok(())
    }
}
