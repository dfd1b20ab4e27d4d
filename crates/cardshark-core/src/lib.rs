//! CardShark core library for magnetic-stripe swipe decoding.
//!
//! This crate implements the pipeline used by the CLI: a byte transport
//! feeds the accumulator, which assembles complete swipe buffers and hands
//! them to the decoder (layout/reader/parser). Decoding is byte-oriented and
//! side-effect free; all I/O is isolated in `transport` implementations.
//! Reader-frame conventions are captured in the reader so the parser stays
//! minimal and free of direct byte indexing.
//!
//! Invariants:
//! - A decoded record always carries exactly three tracks.
//! - Transport timeouts are absorbed by the accumulator and surfaced only as
//!   diagnostic events; they never reach the caller as errors.
//! - A cancelled read cycle never hands a partial buffer to the decoder.
//!
//! # Examples
//! ```no_run
//! use cardshark_core::{CancelToken, Session, SwipeOutcome, UsbTransport};
//!
//! let transport = UsbTransport::open(0x0801, 0x0002)?;
//! let mut session = Session::new(transport, CancelToken::new());
//! while let Some(outcome) = session.next_swipe(&mut |_event| {})? {
//!     if let SwipeOutcome::Decoded(record) = outcome {
//!         println!("{}", serde_json::to_string(&record)?);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

mod accumulator;
mod session;
mod swipe;
mod transport;

pub use accumulator::{Accumulator, SwipeEvent};
pub use session::{Session, SwipeOutcome};
pub use swipe::{DecodeError, decode_swipe};
pub use swipe::layout::COMPLETE_SWIPE_LEN;
pub use transport::{Transport, TransportError, UsbTransport};

/// Card encoding format, selected by the reader's encoding-type byte.
///
/// Only ISO/ABA swipes get per-field parsing; the other formats are tagged
/// by name and carried through with raw track data.
///
/// # Examples
/// ```
/// use cardshark_core::EncodingType;
///
/// assert_eq!(EncodingType::from_index(0), Some(EncodingType::IsoAba));
/// assert_eq!(EncodingType::from_index(7), None);
/// assert_eq!(EncodingType::IsoAba.name(), "ISO/ABA");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingType {
    #[serde(rename = "ISO/ABA")]
    IsoAba,
    #[serde(rename = "AAMVA")]
    Aamva,
    #[serde(rename = "CADL")]
    Cadl,
    Blank,
    Other,
    Undetermined,
    None,
}

impl EncodingType {
    /// Map the on-wire encoding-type byte (0–6) to a format.
    pub fn from_index(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::IsoAba),
            1 => Some(Self::Aamva),
            2 => Some(Self::Cadl),
            3 => Some(Self::Blank),
            4 => Some(Self::Other),
            5 => Some(Self::Undetermined),
            6 => Some(Self::None),
            _ => None,
        }
    }

    /// Canonical display name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsoAba => "ISO/ABA",
            Self::Aamva => "AAMVA",
            Self::Cadl => "CADL",
            Self::Blank => "Blank",
            Self::Other => "Other",
            Self::Undetermined => "Undetermined",
            Self::None => "None",
        }
    }
}

impl std::fmt::Display for EncodingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One magnetic track of a decoded swipe.
///
/// `length` and `data` are always populated (`0` / empty for an absent
/// track); the remaining fields are filled only for ISO/ABA tracks whose
/// delimited fields parse successfully, and are omitted from JSON otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Declared payload length in bytes (0 means the track is absent).
    pub length: u8,
    /// Printable track payload with sentinel characters trimmed.
    pub data: String,
    /// ISO/ABA format code (first track, the character after `%`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_code: Option<char>,
    /// Primary account number (first two ISO/ABA tracks).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_account_number: Option<String>,
    /// Raw cardholder name field, `LAST/FIRST`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Two-character expiration year (not validated as a calendar date).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<String>,
    /// Two-character expiration month (not validated as a calendar date).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<String>,
}

/// Decoded output for one complete card swipe.
///
/// # Examples
/// ```
/// use cardshark_core::{EncodingType, SwipeRecord, Track};
///
/// let record = SwipeRecord {
///     encoding_type: EncodingType::Blank,
///     tracks: [Track::default(), Track::default(), Track::default()],
/// };
/// assert_eq!(record.tracks.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeRecord {
    /// Encoding format reported by the reader.
    pub encoding_type: EncodingType,
    /// The three magnetic tracks, in track order (fixed cardinality).
    pub tracks: [Track; 3],
}

/// Cooperative cancellation flag shared between the read loop and an
/// external interrupt handler.
///
/// # Examples
/// ```
/// use cardshark_core::CancelToken;
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_omits_optional_fields_when_none() {
        let record = SwipeRecord {
            encoding_type: EncodingType::IsoAba,
            tracks: [
                Track {
                    length: 4,
                    data: "%B12".to_string(),
                    format_code: Some('B'),
                    ..Track::default()
                },
                Track::default(),
                Track::default(),
            ],
        };

        let value = serde_json::to_value(&record).expect("record json");
        assert_eq!(value["encoding_type"], "ISO/ABA");

        let track = &value["tracks"][0];
        assert_eq!(track["format_code"], "B");
        assert!(track.get("primary_account_number").is_none());
        assert!(track.get("name").is_none());

        let empty = &value["tracks"][1];
        assert_eq!(empty["length"], 0);
        assert_eq!(empty["data"], "");
        assert!(empty.get("expiration_year").is_none());
    }

    #[test]
    fn encoding_type_roundtrips_display_names() {
        for index in 0..7u8 {
            let encoding = EncodingType::from_index(index).expect("in range");
            let json = serde_json::to_value(encoding).expect("encoding json");
            assert_eq!(json, encoding.name());
        }
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
