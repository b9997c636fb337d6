//! # Bitrank: succinct bit sequences with constant-time rank and select
//!
//! Bitrank packs bit sequences at byte granularity and layers small
//! precomputed directories on top of them:
//!
//! - [`BitSequence`]: fixed-size packed bits with random access and windowed
//!   popcount.
//! - [`RankIndex`]: two-level directory answering `rank1` in constant time
//!   with `o(n)` extra bits.
//! - [`SelectIndex`]: `select1` by binary search over a rank index, with zero
//!   extra storage.
//! - [`SparseArray`]: values stored only at occupied positions, addressed
//!   through the rank of a presence sequence.
//! - [`PackedIntVector`]: fixed-width integers in a bit buffer.
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bitrank::{BitSequence, RankIndex, SelectIndex};
//!
//! let seq = BitSequence::from_binary_string("0100010001")?;
//! let rank = RankIndex::new(&seq);
//! let select = SelectIndex::new(&rank);
//!
//! assert_eq!(rank.rank1(5)?, 2);
//! assert_eq!(select.select1(2)?, 5);
//! assert_eq!(rank.total_ones(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Serialization
//!
//! [`RankIndex`] and [`SparseArray`] persist to little-endian binary formats
//! through their `save`/`load` methods; the building blocks implement
//! [`Serializable`] for stream round-trips.
#![deny(missing_docs)]

pub mod bit_sequence;
pub mod broadword;
pub mod error;
pub mod packed_int_vector;
pub mod rank_index;
pub mod select_index;
pub mod serial;
pub mod sparse_array;
pub mod utils;

pub use bit_sequence::BitSequence;
pub use error::{Error, Result};
pub use packed_int_vector::PackedIntVector;
pub use rank_index::RankIndex;
pub use select_index::SelectIndex;
pub use serial::Serializable;
pub use sparse_array::SparseArray;
