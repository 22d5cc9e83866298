use std::sync::atomic::{AtomicU16, Ordering};

/// Source of the 2-byte sequence id carried at frame offsets 6..8.
///
/// The device echoes the id back in the matching response. The id is laid
/// out low byte first: the low byte increments on every call and carries
/// into the high byte when it overflows. After `[0xFF, 0xFF]` the counter
/// wraps to `[0x00, 0x00]`.
///
/// `next` is a single atomic read-modify-write, so a counter shared through
/// an `Arc` hands out distinct ids to concurrent callers.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    value: AtomicU16,
}

impl SequenceCounter {
    /// Create a counter starting at `[0x00, 0x00]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter whose next id is `id`.
    pub fn starting_at(id: [u8; 2]) -> Self {
        Self {
            value: AtomicU16::new(u16::from_le_bytes(id)),
        }
    }

    /// Return the current id and advance the counter.
    pub fn next(&self) -> [u8; 2] {
        let id = self.value.fetch_add(1, Ordering::Relaxed).to_le_bytes();
        tracing::trace!(lo = id[0], hi = id[1], "allocated sequence id");
        id
    }

    /// The id the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> [u8; 2] {
        self.value.load(Ordering::Relaxed).to_le_bytes()
    }
}
