use thiserror::Error;

/// Errors returned by swipe decoding, one variant per failing stage.
///
/// `TooShort` covers length accounting, `UnknownEncodingType` the encoding
/// table lookup, and the remaining variants the ISO/ABA field parsing.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("swipe buffer too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("encoding type index out of range: {value}")]
    UnknownEncodingType { value: u8 },
    #[error("track {track}: delimiter '{delimiter}' not found")]
    DelimiterNotFound { track: usize, delimiter: char },
    #[error("track {track}: field '{field}' runs past the end of track data")]
    TruncatedField { track: usize, field: &'static str },
    #[error("track {track}: name must contain exactly one '/', got {name:?}")]
    MalformedName { track: usize, name: String },
}
