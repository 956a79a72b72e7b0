//! Party text codec.
//!
//! Encodes a party as a sequence of line pairs:
//!
//! ```text
//! <classID>,<health>,<mana>,<strength>,<agility>,<wisdom>
//! <equipID_1> <equipID_2> ... <equipID_n>
//! ```
//!
//! The equipment line is empty when a character carries nothing.  All
//! integers are base-10 with an optional leading `-`.
//!
//! Decoding is total: a record line that does not hold exactly six integers is
//! skipped together with the line that follows it (its equipment line), so
//! later pairs stay aligned.  Equipment tokens that are not integers are
//! dropped.  Every skip is reported as a [`DecodeWarning`].
//!
//! # Example
//!
//! ```rust
//! use partyvault_store::codec::{decode_slot, encode_slot};
//! use partyvault_types::PartyCharacter;
//!
//! let party = vec![PartyCharacter::new(1, 100, 20, 8, 6, 4).with_equipment([3, 9])];
//! let text = encode_slot(&party);
//! let decoded = decode_slot(&text);
//! assert_eq!(decoded.records, party);
//! assert!(decoded.warnings.is_empty());
//! ```

use partyvault_types::{DecodeWarning, PartyCharacter};

/// Separator between the six scalar fields of a record line.
pub const FIELD_DELIMITER: &str = ",";

/// Separator between equipment ids on an equipment line.
pub const EQUIPMENT_SEPARATOR: &str = " ";

/// Number of scalar fields on a record line.
pub const SCALAR_FIELDS: usize = 6;

/// Line terminator used when encoding.
pub const NEWLINE: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Records recovered from a slot's text, plus whatever had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedParty {
    pub records: Vec<PartyCharacter>,
    pub warnings: Vec<DecodeWarning>,
}

impl DecodedParty {
    /// `true` when decoding skipped nothing.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Encode one record as its record line and equipment line, each terminated
/// by [`NEWLINE`].
pub fn encode_record(character: &PartyCharacter) -> String {
    let scalars: Vec<String> = character.scalars().iter().map(i32::to_string).collect();
    let equipment: Vec<String> = character.equipment.iter().map(i32::to_string).collect();

    let mut out = scalars.join(FIELD_DELIMITER);
    out.push_str(NEWLINE);
    out.push_str(&equipment.join(EQUIPMENT_SEPARATOR));
    out.push_str(NEWLINE);
    out
}

/// Encode a whole party in order.  An empty party encodes to an empty string.
pub fn encode_slot(records: &[PartyCharacter]) -> String {
    records.iter().map(encode_record).collect()
}

/// Decode a slot's text.  Never fails; see the module docs for how malformed
/// input degrades.
pub fn decode_slot(text: &str) -> DecodedParty {
    let mut decoded = DecodedParty::default();
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    while let Some((line_no, record_line)) = lines.next() {
        // A missing equipment line at end of input reads as empty equipment.
        let equipment_line = lines.next();

        let Some(scalars) = parse_record_line(record_line) else {
            decoded.warnings.push(DecodeWarning::MalformedRecord {
                line: line_no,
                content: record_line.to_string(),
            });
            continue;
        };

        let mut character = PartyCharacter::from_scalars(scalars);
        if let Some((equipment_no, equipment_line)) = equipment_line {
            character.equipment =
                parse_equipment_line(equipment_line, equipment_no, &mut decoded.warnings);
        }
        decoded.records.push(character);
    }

    decoded
}

/// Parse a record line into its six scalars, or `None` when the field count
/// is wrong or any field is not an integer.
pub fn parse_record_line(line: &str) -> Option<[i32; SCALAR_FIELDS]> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != SCALAR_FIELDS {
        return None;
    }
    let mut scalars = [0i32; SCALAR_FIELDS];
    for (slot, field) in scalars.iter_mut().zip(fields) {
        *slot = parse_int(field)?;
    }
    Some(scalars)
}

fn parse_equipment_line(
    line: &str,
    line_no: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> Vec<i32> {
    line.split_whitespace()
        .filter_map(|token| match parse_int(token) {
            Some(id) => Some(id),
            None => {
                warnings.push(DecodeWarning::MalformedEquipmentToken {
                    line: line_no,
                    token: token.to_string(),
                });
                None
            }
        })
        .collect()
}

// `str::parse::<i32>` also accepts a leading `+`, which the format excludes.
fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
