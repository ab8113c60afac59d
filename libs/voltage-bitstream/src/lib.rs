//! Voltage Bit Stream Library
//!
//! Bit-level codec for packing telemetry flags, sub-width integers and IEEE
//! floats into fixed, caller-owned buffers.
//!
//! # Architecture
//!
//! This library provides:
//! - **BitStream**: cursor-based put/get over a borrowed `&mut [u8]` (or `&mut [i8]`)
//! - **Field traits**: `UnsignedField` / `SignedField` for the 8-64 bit integers
//! - **StreamPosition**: copyable cursor snapshot for diagnostics and rollback checks
//!
//! # Wire format
//!
//! Everything is stored in network order: most-significant bit first inside a
//! byte, most-significant byte first across a value, independent of the host.
//! Narrow fields occupy exactly their width, with no byte alignment.
//!
//! # Features
//!
//! - `serde` - `Serialize`/`Deserialize` for `StreamPosition` and `BitStreamError`

pub mod error;
pub mod field;
pub mod position;
pub mod stream;

// Re-export core types
pub use error::{BitStreamError, Result};
pub use field::{sign_extend, SignedField, UnsignedField};
pub use position::{StreamPosition, BITS_PER_BYTE};
pub use stream::BitStream;
