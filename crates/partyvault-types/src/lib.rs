use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One party member: six numeric attributes plus the equipment they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyCharacter {
    pub class_id: i32,
    pub health: i32,
    pub mana: i32,
    pub strength: i32,
    pub agility: i32,
    pub wisdom: i32,
    /// Equipment identifiers in insertion order. Duplicates are allowed.
    #[serde(default)]
    pub equipment: Vec<i32>,
}

impl PartyCharacter {
    /// Construct a character with no equipment.
    pub fn new(
        class_id: i32,
        health: i32,
        mana: i32,
        strength: i32,
        agility: i32,
        wisdom: i32,
    ) -> Self {
        Self {
            class_id,
            health,
            mana,
            strength,
            agility,
            wisdom,
            equipment: Vec::new(),
        }
    }

    /// Builder-style helper that replaces the equipment list.
    pub fn with_equipment(mut self, equipment: impl IntoIterator<Item = i32>) -> Self {
        self.equipment = equipment.into_iter().collect();
        self
    }

    /// The six scalar attributes in persisted order:
    /// class, health, mana, strength, agility, wisdom.
    pub fn scalars(&self) -> [i32; 6] {
        [
            self.class_id,
            self.health,
            self.mana,
            self.strength,
            self.agility,
            self.wisdom,
        ]
    }

    /// Inverse of [`PartyCharacter::scalars`].
    pub fn from_scalars(scalars: [i32; 6]) -> Self {
        let [class_id, health, mana, strength, agility, wisdom] = scalars;
        Self::new(class_id, health, mana, strength, agility, wisdom)
    }
}

/// A named, persisted group of party members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySlot {
    /// Slot name; equal to the backing file's base name.
    pub name: String,
    pub records: Vec<PartyCharacter>,
}

/// Non-fatal problems found while decoding a slot's text.
///
/// Line numbers are 1-based and refer to the decoded text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeWarning {
    #[error("line {line}: malformed record skipped: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error("line {line}: dropped non-integer equipment token {token:?}")]
    MalformedEquipmentToken { line: usize, token: String },
}

impl DecodeWarning {
    /// The line the warning refers to.
    pub fn line(&self) -> usize {
        match self {
            DecodeWarning::MalformedRecord { line, .. }
            | DecodeWarning::MalformedEquipmentToken { line, .. } => *line,
        }
    }
}
