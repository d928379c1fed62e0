//! # Remap Codec
//!
//! Encoding and decoding of the compact `mappings` field of version 3
//! source maps.
//!
//! ## Example
//!
//! ```
//! use remap_codec::{decode, encode, RawSegment};
//!
//! let lines = decode("AAAA,KAAK;AACA").unwrap();
//! assert_eq!(lines[0][1], RawSegment::mapped(5, 0, 0, 5));
//! assert_eq!(encode(&lines), "AAAA,KAAK;AACA");
//! ```

mod error;
mod segment;
pub mod vlq;

pub use error::DecodeError;
pub use segment::{decode, encode, OriginalPosition, RawSegment};
