//! Sparse array mapping a few occupied positions onto dense value storage.

pub mod iter;

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::bit_sequence::BitSequence;
use crate::error::{Error, Result};
use crate::rank_index::inner::RankDirectory;
use crate::utils;
use crate::Serializable;
use iter::Iter;

/// Magic number leading a persisted sparse array.
pub const MAGIC: u32 = 0xDEAD_BEEF;

/// Sparse array of `n` logical positions storing only the occupied entries.
///
/// Occupancy is tracked by a presence [`BitSequence`]; the values live in a
/// dense vector ordered by position. A [`RankDirectory`] over the presence
/// bits translates an occupied position `i` to its dense slot `rank1(i) - 1`
/// in constant time. [`Self::append()`] is the only mutator; each append
/// refreshes the directory from the containing superblock onward, since no
/// lower bit changes.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bitrank::SparseArray;
///
/// let mut array = SparseArray::new();
/// array.create(10);
/// array.append("foo".to_string(), 1)?;
/// array.append("bar".to_string(), 5)?;
/// array.append("baz".to_string(), 9)?;
///
/// assert_eq!(array.size(), 10);
/// assert_eq!(array.num_elem(), 3);
/// assert_eq!(array.get_at_rank(1), Some(&"bar".to_string()));
/// assert_eq!(array.get_at_index(5)?, Some(&"bar".to_string()));
/// assert_eq!(array.get_at_index(3)?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseArray<V> {
    presence: BitSequence,
    rank: RankDirectory,
    values: Vec<V>,
}

impl<V> SparseArray<V> {
    /// Creates a new empty array of logical size zero.
    pub fn new() -> Self {
        let presence = BitSequence::new(0);
        let rank = RankDirectory::new(&presence);
        Self {
            presence,
            rank,
            values: vec![],
        }
    }

    /// Resets the array to a fresh one of logical size `size` with no
    /// occupied positions.
    ///
    /// # Arguments
    ///
    /// - `size`: Number of logical positions.
    pub fn create(&mut self, size: usize) {
        self.presence = BitSequence::new(size);
        self.rank = RankDirectory::new(&self.presence);
        self.values.clear();
    }

    /// Stores `value` at the unoccupied logical position `pos`.
    ///
    /// # Errors
    ///
    /// An error is returned if
    ///
    ///  - `pos` is out of bounds, or
    ///  - `pos` is already occupied.
    ///
    /// # Complexity
    ///
    /// Linear in the logical size (the rank directory is refreshed from the
    /// superblock containing `pos` to the end).
    pub fn append(&mut self, value: V, pos: usize) -> Result<()> {
        if cfg!(not(feature = "unchecked")) {
            if self.presence.len() <= pos {
                return Err(Error::out_of_range(pos, self.presence.len()));
            }
            if self.presence.get(pos) {
                return Err(Error::invalid_argument(format!(
                    "position {pos} is already occupied."
                )));
            }
        }
        self.values.push(value);
        self.presence.set_bit(pos, true)?;
        self.rank.build(&self.presence, pos)
    }

    /// Returns the value of the `k`-th occupied position counting from zero
    /// in position order, or [`None`] if fewer than `k + 1` positions are
    /// occupied.
    ///
    /// # Complexity
    ///
    /// Constant
    pub fn get_at_rank(&self, k: usize) -> Option<&V> {
        self.values.get(k)
    }

    /// Returns the value at the logical position `pos`, or [`None`] if the
    /// position is unoccupied.
    ///
    /// # Errors
    ///
    /// An error is returned if `pos` is out of bounds.
    ///
    /// # Complexity
    ///
    /// Constant
    pub fn get_at_index(&self, pos: usize) -> Result<Option<&V>> {
        if cfg!(not(feature = "unchecked")) && self.presence.len() <= pos {
            return Err(Error::out_of_range(pos, self.presence.len()));
        }
        if !self.presence.get(pos) {
            return Ok(None);
        }
        // rank1(pos) >= 1 here because the bit at pos is set.
        let slot = self.rank.rank1(&self.presence, pos)? - 1;
        Ok(self.values.get(slot))
    }

    /// Counts the occupied positions in `0..=pos`.
    ///
    /// # Errors
    ///
    /// An error is returned if `pos` is out of bounds.
    pub fn num_elem_at(&self, pos: usize) -> Result<usize> {
        self.rank.rank1(&self.presence, pos)
    }

    /// Returns the number of logical positions.
    pub const fn size(&self) -> usize {
        self.presence.len()
    }

    /// Returns the number of occupied positions.
    pub fn num_elem(&self) -> usize {
        self.values.len()
    }

    /// Checks if no position is occupied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the presence bits.
    pub const fn presence(&self) -> &BitSequence {
        &self.presence
    }

    /// Returns the dense value storage in position order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Returns the storage in bits beyond a plain array of the occupied
    /// values: the values themselves, the rank tables, and the presence bits.
    pub fn overhead(&self) -> usize {
        8 * std::mem::size_of::<V>() * self.num_elem() + self.rank.overhead() + self.size()
    }

    /// Creates an iterator over `(position, value)` pairs of the occupied
    /// positions in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use bitrank::SparseArray;
    ///
    /// let mut array = SparseArray::new();
    /// array.create(8);
    /// array.append(7u64, 2)?;
    /// array.append(9u64, 6)?;
    ///
    /// let mut it = array.iter();
    /// assert_eq!(it.next(), Some((2, &7)));
    /// assert_eq!(it.next(), Some((6, &9)));
    /// assert_eq!(it.next(), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }
}

impl<V> Default for SparseArray<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SparseArray<V>
where
    V: Serializable,
{
    /// Saves the array into the writer, returning the number of written
    /// bytes.
    ///
    /// The layout is the magic number, a value-size tag, the logical size,
    /// the raw presence bytes, then the values; the rank tables follow iff
    /// `with_rank_tables` is set, sparing the loader a rebuild.
    ///
    /// # Arguments
    ///
    /// - `writer`: [`Write`] variable.
    /// - `with_rank_tables`: Flag to persist the rank directory tables.
    ///
    /// # Errors
    ///
    /// An error is returned if the logical size does not fit the format's
    /// 32-bit size field.
    pub fn save<W: Write>(&self, mut writer: W, with_rank_tables: bool) -> Result<usize> {
        let size = u32::try_from(self.size()).map_err(|_| {
            Error::invalid_argument(format!(
                "logical size {} does not fit the 32-bit size field.",
                self.size()
            ))
        })?;
        writer.write_u32::<LittleEndian>(MAGIC)?;
        writer.write_u32::<LittleEndian>(Self::value_size_tag())?;
        writer.write_u32::<LittleEndian>(size)?;
        writer.write_all(self.presence.bytes())?;
        writer.write_u64::<LittleEndian>(self.values.len() as u64)?;
        let mut mem = 12 + self.presence.bytes().len() + 8;
        for value in &self.values {
            mem += value.serialize_into(&mut writer)?;
        }
        if with_rank_tables {
            mem += self.rank.serialize_tables_into(&mut writer)?;
        }
        Ok(mem)
    }

    /// Loads an array persisted by [`Self::save()`].
    ///
    /// If the reader holds rank tables they are validated and installed;
    /// otherwise the directory is rebuilt from the presence bits.
    ///
    /// # Arguments
    ///
    /// - `reader`: [`Read`] variable.
    ///
    /// # Errors
    ///
    /// An error is returned if the magic number or the value-size tag does
    /// not match, or the payload is inconsistent.
    pub fn load<R: Read>(mut reader: R) -> Result<Self> {
        let magic = reader.read_u32::<LittleEndian>()?;
        if magic != MAGIC {
            return Err(Error::format(format!(
                "expected magic {MAGIC:#010x}, but got {magic:#010x}."
            )));
        }
        let tag = reader.read_u32::<LittleEndian>()?;
        if tag != Self::value_size_tag() {
            return Err(Error::format(format!(
                "value-size tag {tag} does not match the expected {}.",
                Self::value_size_tag()
            )));
        }
        let size = reader.read_u32::<LittleEndian>()? as usize;

        let mut this = Self::new();
        this.create(size);

        let mut raw = vec![0; utils::ceiled_divide(size, 8)];
        reader.read_exact(&mut raw)?;
        this.presence = BitSequence::from_bytes(raw, size)?;

        let num_values = reader.read_u64::<LittleEndian>()? as usize;
        if num_values != this.presence.popcount() {
            return Err(Error::format(format!(
                "{num_values} values do not match {} occupied positions.",
                this.presence.popcount()
            )));
        }
        this.values.reserve(num_values);
        for _ in 0..num_values {
            this.values.push(V::deserialize_from(&mut reader)?);
        }

        match Self::read_trailing_tables(&mut reader)? {
            Some((superblocks, blocks)) => {
                this.rank.install_tables(&this.presence, superblocks, blocks)?;
            }
            None => this.rank.build(&this.presence, 0)?,
        }
        Ok(this)
    }

    /// Reads the optional rank tables; a clean end of input right away means
    /// the array was saved without them.
    fn read_trailing_tables<R: Read>(mut reader: R) -> Result<Option<(Vec<u32>, Vec<u32>)>> {
        let mut prefix = [0; 8];
        match reader.read_exact(&mut prefix) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let k1 = u64::from_le_bytes(prefix) as usize;
        let mut superblocks = Vec::with_capacity(k1);
        for _ in 0..k1 {
            superblocks.push(reader.read_u32::<LittleEndian>()?);
        }
        let k2 = reader.read_u64::<LittleEndian>()? as usize;
        let mut blocks = Vec::with_capacity(k2);
        for _ in 0..k2 {
            blocks.push(reader.read_u32::<LittleEndian>()?);
        }
        Ok(Some((superblocks, blocks)))
    }

    /// The persisted size of one value: its fixed byte width, or zero for
    /// variable-size types.
    fn value_size_tag() -> u32 {
        V::size_of().unwrap_or(0) as u32
    }
}
