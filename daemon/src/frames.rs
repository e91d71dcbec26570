//! Slicing of a recorded utterance into recognizer-sized frames.

use std::num::NonZeroUsize;
use std::slice::Chunks;

/// One complete recorded utterance: 16-bit mono PCM at the configured rate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
}

impl AudioPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for AudioPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// View over a payload that yields contiguous frames of `frame_size` bytes.
///
/// The last frame is shorter when the payload length is not a multiple of the
/// frame size. Iterating again restarts from the first frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuffer<'a> {
    payload: &'a [u8],
    frame_size: NonZeroUsize,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(payload: &'a [u8], frame_size: NonZeroUsize) -> Self {
        Self {
            payload,
            frame_size,
        }
    }

    pub fn frame_size(&self) -> NonZeroUsize {
        self.frame_size
    }

    /// Number of frames the payload splits into.
    pub fn frame_count(&self) -> usize {
        self.payload.len().div_ceil(self.frame_size.get())
    }

    pub fn frames(&self) -> Chunks<'a, u8> {
        self.payload.chunks(self.frame_size.get())
    }
}

impl<'a> IntoIterator for FrameBuffer<'a> {
    type Item = &'a [u8];
    type IntoIter = Chunks<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames()
    }
}

impl<'a> IntoIterator for &FrameBuffer<'a> {
    type Item = &'a [u8];
    type IntoIter = Chunks<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames()
    }
}

#[cfg(test)]
#[path = "frames_test.rs"]
mod tests;
