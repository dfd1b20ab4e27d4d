//! Swipe buffer assembly.
//!
//! The accumulator turns a stream of variably-sized transport chunks into
//! complete swipe buffers. A transport timeout marks an abandoned or partial
//! swipe: the in-progress buffer is discarded, a diagnostic event reports the
//! dropped byte count, and the loop keeps waiting. Only non-timeout transport
//! failures reach the caller.

use crate::CancelToken;
use crate::swipe::layout::COMPLETE_SWIPE_LEN;
use crate::transport::{Transport, TransportError};

/// Diagnostic events emitted while assembling swipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeEvent {
    /// A read window elapsed; `bytes` of partial swipe data were dropped.
    Discarded { bytes: usize },
}

pub struct Accumulator<T: Transport> {
    transport: T,
    threshold: usize,
    buffer: Vec<u8>,
}

impl<T: Transport> Accumulator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            threshold: COMPLETE_SWIPE_LEN,
            buffer: Vec::new(),
        }
    }

    /// Override the completion threshold (device max frame size by default).
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Block until one complete swipe buffer is assembled.
    ///
    /// Returns `Ok(Some(buffer))` once the accumulated length reaches the
    /// threshold, resetting the accumulator for the next swipe. Timeouts
    /// discard partial data and continue; cancellation between reads returns
    /// `Ok(None)` without ever handing out a partial buffer. Any other
    /// transport error is fatal and propagates unchanged.
    pub fn read_swipe<F>(
        &mut self,
        cancel: &CancelToken,
        events: &mut F,
    ) -> Result<Option<Vec<u8>>, TransportError>
    where
        F: FnMut(SwipeEvent),
    {
        loop {
            if cancel.is_cancelled() {
                self.buffer.clear();
                return Ok(None);
            }
            if self.buffer.len() >= self.threshold {
                return Ok(Some(std::mem::take(&mut self.buffer)));
            }
            match self.transport.read_chunk() {
                Ok(chunk) => self.buffer.extend_from_slice(&chunk),
                Err(TransportError::Timeout) => {
                    events(SwipeEvent::Discarded {
                        bytes: self.buffer.len(),
                    });
                    self.buffer.clear();
                }
                Err(err) => {
                    self.buffer.clear();
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::{Accumulator, SwipeEvent};
    use crate::CancelToken;
    use crate::transport::{Transport, TransportError};

    struct ScriptedTransport {
        reads: VecDeque<Result<Vec<u8>, TransportError>>,
    }

    impl ScriptedTransport {
        fn new(reads: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            Self {
                reads: reads.into(),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn read_chunk(&mut self) -> Result<Vec<u8>, TransportError> {
            self.reads
                .pop_front()
                .unwrap_or(Err(TransportError::Usb("script exhausted".to_string())))
        }
    }

    #[test]
    fn assembles_chunks_into_one_buffer() {
        let transport =
            ScriptedTransport::new(vec![Ok(vec![1; 4]), Ok(vec![2; 3]), Ok(vec![3; 2])]);
        let mut accumulator = Accumulator::new(transport).with_threshold(8);

        let buffer = accumulator
            .read_swipe(&CancelToken::new(), &mut |_| {})
            .unwrap()
            .expect("complete swipe");

        assert_eq!(buffer.len(), 9);
        assert_eq!(&buffer[..4], &[1; 4]);
        assert_eq!(&buffer[4..7], &[2; 3]);
    }

    #[test]
    fn timeout_discards_partial_swipe_and_reports_bytes() {
        let transport = ScriptedTransport::new(vec![
            Ok(vec![1; 5]),
            Err(TransportError::Timeout),
            Ok(vec![2; 8]),
        ]);
        let mut accumulator = Accumulator::new(transport).with_threshold(8);

        let mut events = Vec::new();
        let buffer = accumulator
            .read_swipe(&CancelToken::new(), &mut |event| events.push(event))
            .unwrap()
            .expect("complete swipe");

        assert_eq!(events, vec![SwipeEvent::Discarded { bytes: 5 }]);
        assert_eq!(buffer, vec![2; 8]);
    }

    #[test]
    fn timeout_while_idle_reports_zero_bytes() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError::Timeout), Ok(vec![1; 8])]);
        let mut accumulator = Accumulator::new(transport).with_threshold(8);

        let mut events = Vec::new();
        accumulator
            .read_swipe(&CancelToken::new(), &mut |event| events.push(event))
            .unwrap()
            .expect("complete swipe");

        assert_eq!(events, vec![SwipeEvent::Discarded { bytes: 0 }]);
    }

    #[test]
    fn fatal_transport_error_propagates() {
        let transport = ScriptedTransport::new(vec![
            Ok(vec![1; 3]),
            Err(TransportError::Usb("device gone".to_string())),
        ]);
        let mut accumulator = Accumulator::new(transport).with_threshold(8);

        let err = accumulator
            .read_swipe(&CancelToken::new(), &mut |_| {})
            .unwrap_err();

        assert!(matches!(err, TransportError::Usb(_)));
        assert!(!err.is_timeout());
    }

    #[test]
    fn cancellation_unblocks_without_emitting() {
        let transport = ScriptedTransport::new(vec![Ok(vec![1; 3])]);
        let mut accumulator = Accumulator::new(transport).with_threshold(8);
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut events = Vec::new();
        let result = accumulator
            .read_swipe(&cancel, &mut |event| events.push(event))
            .unwrap();

        assert!(result.is_none());
        assert!(events.is_empty());
    }
}
