//! Ring Buffers
//!
//! The two circular buffers bridging the analog domain and the serial domain:
//! - [`SampleRing`]: words between the analog front-end and the codec
//! - [`BitRing`]: bytes between the codec and the serial transport
//!
//! Both use [`RingIndex`] cursors, so a ring of capacity `L` holds exactly `L`
//! unread items and fullness never has to be inferred from a spare slot.

pub mod bit;
pub mod index;
pub mod sample;

pub use bit::BitRing;
pub use index::RingIndex;
pub use sample::SampleRing;
