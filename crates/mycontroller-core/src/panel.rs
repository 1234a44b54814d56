//! The edit/load/save state machine behind every settings group.
//!
//! ```text
//! Unloaded --load--> Viewing --begin_edit--> Editing --save--> Saving
//!                       ^                      |  ^              |
//!                       +------cancel_edit-----+  +---failure----+
//!                       ^                                        |
//!                       +----------------success-----------------+
//! ```
//!
//! A [`SettingsPanel`] holds the local copy of one group plus its two flags.
//! The save is split into [`SettingsPanel::begin_save`] and
//! [`SettingsPanel::finish_save`] so an immediate-mode UI can hand the
//! request to a worker and poll; [`SettingsPanel::save`] runs both halves
//! around the request for async callers.

use mycontroller_types::{GroupKind, SettingsGroup};
use tracing::{debug, info, warn};

use crate::error::{Result, SettingsError};
use crate::services::Services;
use crate::traits::{SettingsService, fetch_group, store_group};

/// Where a group is in its edit/save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Nothing loaded yet.
    Unloaded,
    /// Showing server values.
    Viewing,
    /// Fields are editable.
    Editing,
    /// A save is in flight.
    Saving,
}

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server accepted the group.
    Saved,
    /// The save failed; the error was reported.
    Failed,
    /// Another save of the same group was still in flight; nothing was sent.
    Rejected,
}

impl SaveOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Local copy of one settings group with its edit and save flags.
#[derive(Debug, Clone)]
pub struct SettingsPanel<G> {
    data: Option<G>,
    editing: bool,
    saving: bool,
}

impl<G> Default for SettingsPanel<G> {
    fn default() -> Self {
        Self {
            data: None,
            editing: false,
            saving: false,
        }
    }
}

impl<G: SettingsGroup> SettingsPanel<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The group this panel edits.
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        G::KIND
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        if self.saving {
            PanelState::Saving
        } else if self.editing {
            PanelState::Editing
        } else if self.data.is_some() {
            PanelState::Viewing
        } else {
            PanelState::Unloaded
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&G> {
        self.data.as_ref()
    }

    /// Mutable access to the local copy; only granted in edit mode.
    pub fn data_mut(&mut self) -> Option<&mut G> {
        if self.editing {
            self.data.as_mut()
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    /// Replace the local copy with freshly loaded server data.
    pub fn apply_loaded(&mut self, data: G) {
        self.data = Some(data);
    }

    /// Fetch the group and replace the local copy.
    pub async fn load(&mut self, service: &dyn SettingsService) -> Result<()> {
        let data = fetch_group::<G>(service).await?;
        debug!("Loaded {} settings", G::KIND);
        self.apply_loaded(data);
        Ok(())
    }

    /// Mark the group as saving and return the payload to submit.
    pub fn begin_save(&mut self) -> Result<G> {
        self.begin_save_with(|_| Ok(()))
    }

    /// Like [`begin_save`](Self::begin_save), first letting `prepare` write
    /// display values back into the local copy.
    ///
    /// Fails without touching any flag when a save is already in flight,
    /// when nothing is loaded, or when `prepare` fails.
    pub fn begin_save_with<F>(&mut self, prepare: F) -> Result<G>
    where
        F: FnOnce(&mut G) -> Result<()>,
    {
        if self.saving {
            return Err(SettingsError::SaveInProgress(G::KIND));
        }
        let data = self
            .data
            .as_mut()
            .ok_or(SettingsError::NotLoaded(G::KIND))?;
        prepare(data)?;
        self.saving = true;
        Ok(data.clone())
    }

    /// Record the server's answer to a save started with `begin_save`.
    ///
    /// Success leaves edit mode; failure keeps it so the user can fix the
    /// values and retry.
    pub fn finish_save(&mut self, result: &Result<()>) {
        self.saving = false;
        if result.is_ok() {
            self.editing = false;
        }
    }

    /// Run a complete save: prepare, submit, record, notify.
    ///
    /// Every failure is reported to the alert sink exactly once.
    pub async fn save<F>(&mut self, services: &Services, prepare: F) -> SaveOutcome
    where
        F: FnOnce(&mut G) -> Result<()>,
    {
        let payload = match self.begin_save_with(prepare) {
            Ok(payload) => payload,
            Err(e) => {
                let outcome = if matches!(e, SettingsError::SaveInProgress(_)) {
                    warn!("Rejected overlapping save of {} settings", G::KIND);
                    SaveOutcome::Rejected
                } else {
                    SaveOutcome::Failed
                };
                services.report(&e);
                return outcome;
            }
        };

        let result = store_group(services.settings.as_ref(), &payload).await;
        self.finish_save(&result);

        match result {
            Ok(()) => {
                info!("Saved {} settings", G::KIND);
                services.notify_updated();
                SaveOutcome::Saved
            }
            Err(e) => {
                services.report(&e);
                SaveOutcome::Failed
            }
        }
    }
}
