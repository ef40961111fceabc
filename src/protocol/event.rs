//! Frame decoding for text received from the strip controller
//!
//! Inbound frames are classified by prefix, checked in a fixed order:
//! `"7:"` pin event, `"INFO:"` state update, `"ERROR:"` error event,
//! `"RAW:"` raw payload, and everything else falls through to a plain
//! message. The prefixes are mutually exclusive today; the order is still
//! fixed so a future overlapping prefix cannot reshuffle classification.
//! Decoding is total: malformed payloads degrade to partial events rather
//! than failing.

use crate::pins::{PinMapping, UNKNOWN_PIN_LABEL};

/// Frame kinds received from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    /// A watched GPIO pin changed (`7:<gpio>,<state>`)
    Pin { label: String, state: String },
    /// The firmware reported a pin-related fault (`ERROR:<gpio>,<detail>`)
    Error { label: String, detail: String },
    /// Raw-mode payload, unparsed (`RAW:<payload>`)
    Raw { payload: String },
    /// Mode flag update (`INFO:UDP.true,RAW.false,…`). Only the keys
    /// present in the frame are set; the rest stay `None`.
    Info {
        udp: Option<bool>,
        raw: Option<bool>,
        debug: Option<bool>,
    },
    /// Anything that matched no prefix, verbatim
    Message { text: String },
}

/// Decoder for converting inbound text frames to typed frames
pub struct FrameDecoder;

impl FrameDecoder {
    /// Classify and parse one inbound frame. Never fails.
    ///
    /// GPIO numbers in pin and error frames are reverse-mapped through
    /// `pins`; a number the mapping does not know decodes to the label
    /// `"unknown"`. A pin payload without a comma decodes with an empty
    /// state string.
    pub fn decode(frame: &str, pins: &PinMapping) -> DecodedFrame {
        if let Some(payload) = frame.strip_prefix("7:") {
            let (label, state) = Self::pin_payload(payload, pins);
            return DecodedFrame::Pin { label, state };
        }

        if let Some(payload) = frame.strip_prefix("INFO:") {
            return Self::info_payload(payload);
        }

        if let Some(payload) = frame.strip_prefix("ERROR:") {
            let (label, detail) = Self::pin_payload(payload, pins);
            return DecodedFrame::Error { label, detail };
        }

        if let Some(payload) = frame.strip_prefix("RAW:") {
            // Everything after the first colon, including later colons.
            return DecodedFrame::Raw {
                payload: payload.to_string(),
            };
        }

        DecodedFrame::Message {
            text: frame.to_string(),
        }
    }

    fn pin_payload(payload: &str, pins: &PinMapping) -> (String, String) {
        let (number, state) = payload.split_once(',').unwrap_or((payload, ""));
        let label = number
            .parse::<u8>()
            .ok()
            .and_then(|n| pins.label(n))
            .unwrap_or(UNKNOWN_PIN_LABEL)
            .to_string();
        (label, state.to_string())
    }

    fn info_payload(payload: &str) -> DecodedFrame {
        let mut udp = None;
        let mut raw = None;
        let mut debug = None;
        for token in payload.split(',') {
            let Some((key, value)) = token.split_once('.') else {
                continue;
            };
            let value = match value {
                "true" => true,
                "false" => false,
                _ => continue,
            };
            // Keys are case-sensitive; anything unrecognized is ignored.
            match key {
                "UDP" => udp = Some(value),
                "RAW" => raw = Some(value),
                "DEBUG" => debug = Some(value),
                _ => {}
            }
        }
        DecodedFrame::Info { udp, raw, debug }
    }
}
