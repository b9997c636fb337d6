//! Vector of fixed-width unsigned integers packed into a bit buffer.

pub mod iter;

use std::io::{Read, Write};

use num_traits::ToPrimitive;

use crate::bit_sequence::BitSequence;
use crate::error::{Error, Result};
use crate::utils;
use crate::Serializable;
use iter::Iter;

/// Vector of unsigned integers, each represented in a fixed number of bits.
///
/// Entry `i` occupies bits `i * width..(i + 1) * width` of an underlying
/// [`BitSequence`], so `len` values in `0..2^width` cost `len * width` bits.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bitrank::PackedIntVector;
///
/// let mut pv = PackedIntVector::new(2, 3)?;
///
/// assert_eq!(pv.len(), 2);
/// assert_eq!(pv.width(), 3);
///
/// pv.set_int(0, 7)?;
/// assert_eq!(pv.get_int(0), Some(7));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackedIntVector {
    chunks: BitSequence,
    len: usize,
    width: usize,
}

impl PackedIntVector {
    /// Creates a new zero-filled vector of `len` integers of `width` bits
    /// each.
    ///
    /// # Errors
    ///
    /// An error is returned if `width` is not in `1..=64` or `len * width`
    /// overflows.
    pub fn new(len: usize, width: usize) -> Result<Self> {
        if !(1..=64).contains(&width) {
            return Err(Error::invalid_argument(format!(
                "width must be in 1..=64, but got {width}."
            )));
        }
        let bits = len.checked_mul(width).ok_or_else(|| {
            Error::invalid_argument(format!("{len} entries of {width} bits overflow."))
        })?;
        Ok(Self {
            chunks: BitSequence::new(bits),
            len,
            width,
        })
    }

    /// Creates a new vector from a slice of integers, fitting the width to
    /// the largest value.
    ///
    /// # Errors
    ///
    /// An error is returned if some value cannot be cast to [`u64`].
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use bitrank::PackedIntVector;
    ///
    /// let pv = PackedIntVector::from_slice(&[7u32, 2])?;
    /// assert_eq!(pv.len(), 2);
    /// assert_eq!(pv.width(), 3);
    /// assert_eq!(pv.get_int(0), Some(7));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_slice<T>(values: &[T]) -> Result<Self>
    where
        T: ToPrimitive,
    {
        let mut ints = Vec::with_capacity(values.len());
        for x in values {
            ints.push(x.to_u64().ok_or_else(|| {
                Error::invalid_argument("values must be castable to u64.".to_string())
            })?);
        }
        let width = utils::needed_bits(ints.iter().copied().max().unwrap_or(0));
        let mut this = Self::new(ints.len(), width)?;
        for (i, &v) in ints.iter().enumerate() {
            this.set_int(i, v)?;
        }
        Ok(this)
    }

    /// Returns the `pos`-th integer, or [`None`] if out of bounds.
    ///
    /// # Complexity
    ///
    /// Constant
    #[inline(always)]
    pub fn get_int(&self, pos: usize) -> Option<u64> {
        if pos < self.len {
            self.chunks.get_bits(pos * self.width, self.width)
        } else {
            None
        }
    }

    /// Sets the `pos`-th integer to `value`.
    ///
    /// # Errors
    ///
    /// An error is returned if
    ///
    ///  - `pos` is out of bounds, or
    ///  - `value` does not fit in [`Self::width()`] bits.
    ///
    /// # Complexity
    ///
    /// Constant
    #[inline(always)]
    pub fn set_int(&mut self, pos: usize, value: u64) -> Result<()> {
        if cfg!(not(feature = "unchecked")) {
            if self.len <= pos {
                return Err(Error::out_of_range(pos, self.len));
            }
            if self.width < 64 && value >> self.width != 0 {
                return Err(Error::invalid_argument(format!(
                    "value must fit in width={} bits, but got {value}.",
                    self.width
                )));
            }
        }
        self.chunks.set_bits(pos * self.width, value, self.width)
    }

    /// Returns the number of integers stored.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the vector is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bits of each integer.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Creates a double-ended iterator for enumerating integers.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use bitrank::PackedIntVector;
    ///
    /// let pv = PackedIntVector::from_slice(&[5u32, 256, 0])?;
    /// let mut it = pv.iter();
    /// assert_eq!(it.next(), Some(5));
    /// assert_eq!(it.next_back(), Some(0));
    /// assert_eq!(it.next(), Some(256));
    /// assert_eq!(it.next(), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }
}

impl Serializable for PackedIntVector {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = self.chunks.serialize_into(&mut writer)?;
        mem += self.len.serialize_into(&mut writer)?;
        mem += self.width.serialize_into(&mut writer)?;
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let chunks = BitSequence::deserialize_from(&mut reader)?;
        let len = usize::deserialize_from(&mut reader)?;
        let width = usize::deserialize_from(&mut reader)?;
        Ok(Self { chunks, len, width })
    }

    fn size_in_bytes(&self) -> usize {
        self.chunks.size_in_bytes() + 2 * usize::size_of().unwrap()
    }
}
