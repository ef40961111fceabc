//! Board pin mappings
//!
//! A pin mapping translates the logical pin labels printed on a board
//! ("D0".."D7", "RX", "TX") into the GPIO numbers the firmware speaks.
//! Inbound pin events carry the GPIO number, so the mapping must also
//! support reverse lookup; that requires the table to be injective, which
//! is checked when a custom mapping is constructed.

use crate::error::{Error, Result};

/// Label used when an inbound pin event names a GPIO number the active
/// mapping does not know.
pub const UNKNOWN_PIN_LABEL: &str = "unknown";

/// WeMos D1 R1 pin table, the default board profile.
const WEMOS_D1_R1: &[(&str, u8)] = &[
    ("D0", 2),
    ("D1", 3),
    ("D2", 4),
    ("RX", 0),
    ("TX", 1),
    ("D3", 8),
    ("D5", 5),
    ("D6", 6),
    ("D7", 7),
];

/// Named table translating logical pin labels to GPIO numbers for one
/// board variant. Exactly one mapping is active per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMapping {
    name: String,
    pins: Vec<(String, u8)>,
}

impl PinMapping {
    /// Build a custom mapping from `(label, gpio)` pairs.
    ///
    /// Fails with a configuration error if two labels share a GPIO number
    /// (reverse lookup would be ambiguous) or a label appears twice.
    pub fn new(name: impl Into<String>, entries: &[(&str, u8)]) -> Result<Self> {
        let name = name.into();
        let mut pins: Vec<(String, u8)> = Vec::with_capacity(entries.len());
        for &(label, number) in entries {
            if pins.iter().any(|(l, _)| l == label) {
                return Err(Error::Configuration(format!(
                    "pin label {label:?} appears twice in mapping {name:?}"
                )));
            }
            if pins.iter().any(|&(_, n)| n == number) {
                return Err(Error::Configuration(format!(
                    "GPIO {number} is mapped to more than one label in mapping {name:?}"
                )));
            }
            pins.push((label.to_string(), number));
        }
        Ok(Self { name, pins })
    }

    /// The default WeMos D1 R1 profile.
    pub fn wemos_d1_r1() -> Self {
        // Static table, known injective; skip the constructor checks.
        Self {
            name: "WeMOSD1_R1".to_string(),
            pins: WEMOS_D1_R1
                .iter()
                .map(|&(label, number)| (label.to_string(), number))
                .collect(),
        }
    }

    /// Resolve a built-in board profile by name.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "WeMOSD1_R1" => Ok(Self::wemos_d1_r1()),
            other => Err(Error::Configuration(format!(
                "unknown pin map {other:?}"
            ))),
        }
    }

    /// Name of the board profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forward lookup: label to GPIO number.
    pub fn number(&self, label: &str) -> Option<u8> {
        self.pins
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, n)| n)
    }

    /// Reverse lookup: GPIO number to label.
    pub fn label(&self, number: u8) -> Option<&str> {
        self.pins
            .iter()
            .find(|&&(_, n)| n == number)
            .map(|(l, _)| l.as_str())
    }

    /// Defined labels, in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.pins.iter().map(|(l, _)| l.as_str())
    }
}
