//! Party Session – glue between the stores and the party UI.
//!
//! The UI that displays and edits the party is abstracted behind
//! [`PartyView`].  [`PartySession`] owns the [`SlotStore`] and the
//! [`QuickSave`] and exposes one method per UI action.
//!
//! # Contract
//!
//! * Every successful action is logged and followed by exactly one
//!   [`PartyView::refresh`].
//! * A failed action is logged, returned to the caller, and leaves the view
//!   untouched: no [`PartyView::replace_party`], no refresh.

use partyvault_types::{DecodeWarning, PartyCharacter};
use tracing::{error, info};

use crate::error::StoreError;
use crate::layout::StorageLayout;
use crate::quick_save::QuickSave;
use crate::slot_store::SlotStore;

/// The UI collaborator that shows the party being edited.
pub trait PartyView {
    /// The party currently displayed.
    fn party(&self) -> &[PartyCharacter];

    /// Replace the displayed party with a freshly loaded one.
    fn replace_party(&mut self, party: Vec<PartyCharacter>);

    /// The slot name typed by the user; may be empty.
    fn party_name_input(&self) -> String;

    /// Redraw after the catalog or the displayed party changed.
    fn refresh(&mut self);
}

/// Owns the party stores for the lifetime of the application.
#[derive(Debug)]
pub struct PartySession {
    slots: SlotStore,
    quick_save: QuickSave,
}

impl PartySession {
    /// Application start: open the slot directory, build the catalog, then
    /// refresh the view.
    pub fn start<V: PartyView>(layout: &StorageLayout, view: &mut V) -> Result<Self, StoreError> {
        let slots = SlotStore::open(&layout.save_dir, layout.slot_extension.as_str())
            .inspect_err(|e| error!(error = %e, "could not open party storage"))?;
        let session = Self {
            slots,
            quick_save: QuickSave::new(&layout.quick_save_file),
        };
        view.refresh();
        Ok(session)
    }

    /// Names to offer in the load selector.
    pub fn party_names(&self) -> &[String] {
        self.slots.list_names()
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    pub fn quick_save(&self) -> &QuickSave {
        &self.quick_save
    }

    /// Save the displayed party under the name the user entered.
    pub fn save_pressed<V: PartyView>(&mut self, view: &mut V) -> Result<(), StoreError> {
        let name = view.party_name_input();
        self.slots
            .save(&name, view.party())
            .inspect_err(|e| error!(slot = %name, error = %e, "save failed"))?;
        info!(slot = %name, "party saved successfully");
        view.refresh();
        Ok(())
    }

    /// Load slot `name` into the view.  Returns whatever the decoder skipped.
    pub fn load_selected<V: PartyView>(
        &self,
        name: &str,
        view: &mut V,
    ) -> Result<Vec<DecodeWarning>, StoreError> {
        let loaded = self
            .slots
            .load(name)
            .inspect_err(|e| error!(slot = %name, error = %e, "load failed"))?;
        info!(slot = %name, "party loaded successfully");
        view.replace_party(loaded.slot.records);
        view.refresh();
        Ok(loaded.warnings)
    }

    /// Delete the slot named by the user's input.
    pub fn delete_pressed<V: PartyView>(&mut self, view: &mut V) -> Result<(), StoreError> {
        let name = view.party_name_input();
        self.slots
            .delete(&name)
            .inspect_err(|e| error!(slot = %name, error = %e, "delete failed"))?;
        info!(slot = %name, "party deleted successfully");
        view.refresh();
        Ok(())
    }

    /// Single-slot mode: overwrite the quick save with the displayed party.
    pub fn quick_save_pressed<V: PartyView>(&self, view: &mut V) -> Result<(), StoreError> {
        self.quick_save
            .save(view.party())
            .inspect_err(|e| error!(error = %e, "quick save failed"))?;
        view.refresh();
        Ok(())
    }

    /// Single-slot mode: replace the displayed party with the quick save.
    pub fn quick_load_pressed<V: PartyView>(
        &self,
        view: &mut V,
    ) -> Result<Vec<DecodeWarning>, StoreError> {
        let decoded = self
            .quick_save
            .load()
            .inspect_err(|e| error!(error = %e, "quick load failed"))?;
        view.replace_party(decoded.records);
        view.refresh();
        Ok(decoded.warnings)
    }

    /// Rebuild the catalog from disk.
    pub fn rescan<V: PartyView>(&mut self, view: &mut V) -> Result<(), StoreError> {
        self.slots
            .initialize()
            .inspect_err(|e| error!(error = %e, "rescan failed"))?;
        view.refresh();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
