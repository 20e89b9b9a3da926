use crate::config::FRAME_CAPACITY;
use crate::error::{Error, Result};

/// Fixed-capacity sample buffer with a logical length cursor.
///
/// Holds real samples only; the imaginary plane of a future transform is
/// implicitly zero and not stored.
pub struct Frame {
    samples: [i8; FRAME_CAPACITY],
    len: usize,
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            samples: [0; FRAME_CAPACITY],
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        FRAME_CAPACITY
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.samples[..self.len]
    }

    /// Samples as they go on the wire, two's complement
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_slice().iter().map(|&s| s as u8)
    }

    /// Set the length for a new acquisition and hand out the slots to fill
    pub fn begin(&mut self, len: usize) -> Result<&mut [i8]> {
        if len == 0 || len > FRAME_CAPACITY {
            return Err(Error::FrameTooLong);
        }
        self.len = len;
        Ok(&mut self.samples[..len])
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_moves_cursor() {
        let mut frame = Frame::new();
        assert!(frame.is_empty());

        frame.begin(3).unwrap().copy_from_slice(&[1, -1, 127]);
        assert_eq!(frame.as_slice(), &[1, -1, 127]);
        assert_eq!(frame.bytes().collect::<Vec<_>>(), vec![0x01, 0xff, 0x7f]);

        frame.begin(2).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.capacity(), FRAME_CAPACITY);
    }

    #[test]
    fn begin_rejects_oversized() {
        let mut frame = Frame::new();
        assert!(frame.begin(FRAME_CAPACITY + 1).is_err());
        assert!(frame.begin(0).is_err());
        assert_eq!(frame.len(), 0);
    }
}
