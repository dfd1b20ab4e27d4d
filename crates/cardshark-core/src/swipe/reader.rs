use super::error::DecodeError;
use super::layout;

pub struct SwipeReader<'a> {
    payload: &'a [u8],
}

impl<'a> SwipeReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DecodeError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload
            .get(range.clone())
            .ok_or(DecodeError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    /// Read a track payload as text: each byte maps to one character, then
    /// sentinel and control characters are trimmed from both ends.
    pub fn read_track_text(&self, range: std::ops::Range<usize>) -> Result<String, DecodeError> {
        let bytes = self.read_slice(range)?;
        let raw: String = bytes.iter().map(|&b| b as char).collect();
        Ok(raw
            .trim_matches(|c| layout::SENTINEL_CHARS.contains(&c))
            .to_string())
    }
}
