//! `partyvault-store` – Party persistence.
//!
//! Saves and restores parties of [`PartyCharacter`][partyvault_types::PartyCharacter]
//! records to plain text files in a local directory.
//!
//! # Modules
//!
//! - [`codec`] – [`encode_slot`][codec::encode_slot] /
//!   [`decode_slot`][codec::decode_slot]: the line-oriented text format.  Each
//!   record is a comma-separated attribute line followed by a space-separated
//!   equipment line.  Decoding never fails; malformed lines are skipped and
//!   reported as [`DecodeWarning`][partyvault_types::DecodeWarning]s.
//! - [`slot_store`] – [`SlotStore`][slot_store::SlotStore]: one file per named
//!   slot plus an in-memory catalog of slot names that is kept equal to the
//!   set of slot files on disk.
//! - [`quick_save`] – [`QuickSave`][quick_save::QuickSave]: the single-slot
//!   mode, one implicit save file with no catalog.
//! - [`session`] – [`PartySession`][session::PartySession]: wires the stores
//!   to a [`PartyView`][session::PartyView] (the UI that shows and edits the
//!   party) and exposes the button-level entry points.
//! - [`layout`] – [`StorageLayout`][layout::StorageLayout]: where the files live.

pub mod codec;
mod disk;
pub mod error;
pub mod layout;
pub mod quick_save;
pub mod session;
pub mod slot_store;

pub use codec::{DecodedParty, decode_slot, encode_record, encode_slot};
pub use error::StoreError;
pub use layout::StorageLayout;
pub use quick_save::QuickSave;
pub use session::{PartySession, PartyView};
pub use slot_store::{LoadedSlot, SlotStore};
