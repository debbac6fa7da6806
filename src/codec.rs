//! Sample Codec
//!
//! Converts between the word stream of a [`SampleRing`](crate::ring::SampleRing)
//! and the byte stream of a [`BitRing`](crate::ring::BitRing):
//! - Encoder: words -> packed bytes with periodic sync markers
//! - Decoder: bytes -> words once a sync marker has been seen
//!
//! Neither side owns the rings; the session passes both in on every call.

pub mod decoder;
pub mod encoder;

pub use decoder::{Decoded, Decoder};
pub use encoder::{Encoded, Encoder};
