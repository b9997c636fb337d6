//! Select queries answered by binary search over a rank index.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::rank_index::RankIndex;

/// Select queries over a borrowed [`RankIndex`].
///
/// `select1(j)` locates the `j`-th set bit (1-indexed) by binary searching
/// the rank directory, so each query costs `O(lg n)` rank probes and the
/// index itself carries no tables at all.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bitrank::{BitSequence, RankIndex, SelectIndex};
///
/// let seq = BitSequence::from_binary_string("0100010001")?;
/// let rank = RankIndex::new(&seq);
/// let select = SelectIndex::new(&rank);
///
/// assert_eq!(select.select1(1)?, 1);
/// assert_eq!(select.select1(2)?, 5);
/// assert_eq!(select.select1(3)?, 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SelectIndex<'a> {
    rank: &'a RankIndex<'a>,
}

impl<'a> SelectIndex<'a> {
    /// Creates a new index over `rank`.
    pub const fn new(rank: &'a RankIndex<'a>) -> Self {
        Self { rank }
    }

    /// Returns the position of the `j`-th set bit, where `j` counts from 1.
    ///
    /// When several positions share the same rank, the search is steered to
    /// the one actually carrying a set bit.
    ///
    /// # Errors
    ///
    /// An error is returned if `j` is zero or greater than the number of set
    /// bits. The search exiting without an answer is reported as
    /// [`Error::Internal`]; it cannot happen while the rank tables match the
    /// sequence.
    ///
    /// # Complexity
    ///
    /// Logarithmic
    pub fn select1(&self, j: usize) -> Result<usize> {
        let total = self.rank.total_ones();
        if cfg!(not(feature = "unchecked")) && (j == 0 || total < j) {
            return Err(Error::invalid_argument(format!(
                "cannot select the {j}-th set bit in a sequence with {total} set bits."
            )));
        }

        let bits = self.rank.bit_sequence();
        let mut lo = 0;
        let mut hi = self.rank.len() - 1;
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let rank_at_mid = self.rank.rank1(mid)?;
            if rank_at_mid < j {
                lo = mid + 1;
            } else if j < rank_at_mid || !bits.get(mid) {
                if mid == 0 {
                    break;
                }
                hi = mid - 1;
            } else {
                return Ok(mid);
            }
        }
        Err(Error::internal(format!(
            "the binary search failed to locate the {j}-th set bit."
        )))
    }

    /// Returns the extra storage in bits, which is always zero.
    pub const fn overhead(&self) -> usize {
        0
    }

    /// Saves nothing; the index has no persistent state.
    pub fn save<W: Write>(&self, _writer: W) -> Result<usize> {
        Ok(0)
    }

    /// Loads nothing and binds a fresh index to `rank`.
    pub fn load<R: Read>(_reader: R, rank: &'a RankIndex<'a>) -> Result<Self> {
        Ok(Self::new(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    use crate::bit_sequence::BitSequence;

    fn gen_random_seq(len: usize, seed: u64) -> BitSequence {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        BitSequence::from_bits((0..len).map(|_| rng.gen::<bool>()))
    }

    fn test_against_naive(seq: &BitSequence) {
        let rank = RankIndex::new(seq);
        let select = SelectIndex::new(&rank);
        let mut j = 0;
        for pos in 0..seq.len() {
            if seq.get(pos) {
                j += 1;
                assert_eq!(select.select1(j).unwrap(), pos, "count {j}");
            }
        }
        assert_eq!(j, rank.total_ones());
    }

    #[test]
    fn test_small_example() {
        let seq = BitSequence::from_binary_string("1001011101001010").unwrap();
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);
        let positions = [0, 3, 5, 6, 7, 9, 12, 14];
        for (j, &pos) in positions.iter().enumerate() {
            assert_eq!(select.select1(j + 1).unwrap(), pos);
        }
    }

    #[test]
    fn test_select_bounds() {
        let seq = BitSequence::from_binary_string("1001011101001010").unwrap();
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);
        assert!(select.select1(0).is_err());
        assert!(select.select1(8).is_ok());
        let e = select.select1(9);
        assert_eq!(
            e.err().map(|x| x.to_string()),
            Some("invalid argument: cannot select the 9-th set bit in a sequence with 8 set bits.".to_string())
        );
    }

    #[test]
    fn test_shared_rank_guard() {
        // Consecutive zeros after a one give runs of equal rank; the search
        // must land on the set bit itself.
        let seq = BitSequence::from_binary_string("1000000001").unwrap();
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);
        assert_eq!(select.select1(1).unwrap(), 0);
        assert_eq!(select.select1(2).unwrap(), 9);
    }

    #[test]
    fn test_all_zeros() {
        let seq = BitSequence::new(10);
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);
        assert!(select.select1(1).is_err());
    }

    #[test]
    fn test_random_lengths() {
        for (seed, len) in [10, 65, 1024, 4096, 1000, 1001, 10057].into_iter().enumerate() {
            let seq = gen_random_seq(len, seed as u64);
            test_against_naive(&seq);
        }
    }

    #[test]
    fn test_sparse_random() {
        let mut rng = ChaChaRng::seed_from_u64(99);
        let seq = BitSequence::from_bits((0..10000).map(|_| rng.gen_bool(0.01)));
        test_against_naive(&seq);
    }

    #[test]
    fn test_save_load_are_empty() {
        let seq = gen_random_seq(100, 5);
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);

        let mut bytes = vec![];
        assert_eq!(select.save(&mut bytes).unwrap(), 0);
        assert!(bytes.is_empty());

        let other = SelectIndex::load(&bytes[..], &rank).unwrap();
        assert_eq!(other.select1(1).unwrap(), select.select1(1).unwrap());
    }
}
