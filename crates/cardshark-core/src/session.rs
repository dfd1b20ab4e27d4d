use crate::accumulator::{Accumulator, SwipeEvent};
use crate::swipe::{DecodeError, decode_swipe};
use crate::transport::{Transport, TransportError};
use crate::{CancelToken, SwipeRecord};

/// Per-swipe result: decode failures are reported, not session-ending.
#[derive(Debug)]
pub enum SwipeOutcome {
    Decoded(SwipeRecord),
    Rejected(DecodeError),
}

/// One device session: a run-until-cancelled read/decode cycle.
///
/// Swipes come back in the order their buffers complete; there is no
/// batching or reordering. Only a fatal transport failure ends the session
/// with an error.
pub struct Session<T: Transport> {
    accumulator: Accumulator<T>,
    cancel: CancelToken,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, cancel: CancelToken) -> Self {
        Self {
            accumulator: Accumulator::new(transport),
            cancel,
        }
    }

    /// Override the complete-swipe length (device max frame size by default).
    pub fn with_swipe_len(mut self, len: usize) -> Self {
        self.accumulator = self.accumulator.with_threshold(len);
        self
    }

    /// Block until the next swipe completes and decode it.
    ///
    /// Returns `Ok(None)` once the session is cancelled.
    pub fn next_swipe<F>(
        &mut self,
        events: &mut F,
    ) -> Result<Option<SwipeOutcome>, TransportError>
    where
        F: FnMut(SwipeEvent),
    {
        let buffer = match self.accumulator.read_swipe(&self.cancel, events)? {
            Some(buffer) => buffer,
            None => return Ok(None),
        };
        Ok(Some(match decode_swipe(&buffer) {
            Ok(record) => SwipeOutcome::Decoded(record),
            Err(err) => SwipeOutcome::Rejected(err),
        }))
    }
}
