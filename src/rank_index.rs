//! Constant-time rank queries over a borrowed bit sequence.

pub mod inner;

use std::io::{Read, Write};

use crate::bit_sequence::BitSequence;
use crate::error::Result;
use inner::RankDirectory;

/// Constant-time rank index over a borrowed [`BitSequence`].
///
/// The index is a two-level directory of precomputed popcounts (see
/// [`RankDirectory`]); `rank1` resolves with two table lookups and one
/// machine popcount. The sequence is borrowed for the lifetime of the index,
/// so the answers cannot go stale.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bitrank::{BitSequence, RankIndex};
///
/// let seq = BitSequence::from_binary_string("1001011101001010")?;
/// let rank = RankIndex::new(&seq);
///
/// assert_eq!(rank.rank1(0)?, 1);
/// assert_eq!(rank.rank1(4)?, 2);
/// assert_eq!(rank.rank1(15)?, 8);
/// assert_eq!(rank.total_ones(), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RankIndex<'a> {
    bits: &'a BitSequence,
    directory: RankDirectory,
}

impl<'a> RankIndex<'a> {
    /// Creates a new index over `bits`, building its tables.
    ///
    /// # Arguments
    ///
    /// - `bits`: Sequence to index.
    ///
    /// # Complexity
    ///
    /// Linear in the length of `bits`.
    pub fn new(bits: &'a BitSequence) -> Self {
        Self {
            bits,
            directory: RankDirectory::new(bits),
        }
    }

    /// Counts the set bits in positions `0..=i`.
    ///
    /// # Errors
    ///
    /// An error is returned if `i` is out of bounds.
    ///
    /// # Complexity
    ///
    /// Constant
    #[inline(always)]
    pub fn rank1(&self, i: usize) -> Result<usize> {
        self.directory.rank1(self.bits, i)
    }

    /// Returns the number of set bits in the whole sequence.
    #[inline(always)]
    pub const fn total_ones(&self) -> usize {
        self.directory.total_ones()
    }

    /// Returns the number of bits covered.
    pub const fn len(&self) -> usize {
        self.directory.len()
    }

    /// Checks if the covered sequence is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the table storage in bits, excluding the sequence itself.
    pub fn overhead(&self) -> usize {
        self.directory.overhead()
    }

    /// Returns the indexed sequence.
    pub const fn bit_sequence(&self) -> &'a BitSequence {
        self.bits
    }

    /// Saves the directory tables into the writer, returning the number of
    /// written bytes.
    ///
    /// # Arguments
    ///
    /// - `writer`: [`Write`] variable.
    pub fn save<W: Write>(&self, writer: W) -> Result<usize> {
        self.directory.serialize_into(writer)
    }

    /// Loads an index persisted by [`Self::save()`] back over `bits`.
    ///
    /// # Arguments
    ///
    /// - `reader`: [`Read`] variable.
    /// - `bits`: Sequence the persisted tables were built over.
    ///
    /// # Errors
    ///
    /// An error is returned if the magic number does not match or the tables
    /// do not fit `bits`.
    pub fn load<R: Read>(reader: R, bits: &'a BitSequence) -> Result<Self> {
        Ok(Self {
            bits,
            directory: RankDirectory::deserialize_from(reader, bits)?,
        })
    }
}
