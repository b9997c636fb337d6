//! Utilities for serialization.
#![cfg(target_pointer_width = "64")]

use std::io::{Read, Write};
use std::mem::size_of;

use crate::error::{Error, Result};

/// Trait to serialize/deserialize data structures.
///
/// Integers are written in little-endian order; containers are written as a
/// length followed by their elements, recursively.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bitrank::{BitSequence, Serializable};
///
/// let seq = BitSequence::from_bits([true, false, false, true]);
///
/// let mut bytes = vec![];
/// let size = seq.serialize_into(&mut bytes)?;
/// let other = BitSequence::deserialize_from(&bytes[..])?;
///
/// assert_eq!(seq, other);
/// assert_eq!(size, bytes.len());
/// assert_eq!(size, seq.size_in_bytes());
/// # Ok(())
/// # }
/// ```
pub trait Serializable: Sized {
    /// Serializes the data structure into the writer,
    /// returning the number of serialized bytes.
    ///
    /// # Arguments
    ///
    /// - `writer`: [`Write`] variable.
    fn serialize_into<W: Write>(&self, writer: W) -> Result<usize>;

    /// Deserializes the data structure from the reader.
    ///
    /// # Arguments
    ///
    /// - `reader`: [`Read`] variable.
    fn deserialize_from<R: Read>(reader: R) -> Result<Self>;

    /// Returns the number of bytes to serialize the data structure.
    fn size_in_bytes(&self) -> usize;

    /// Returns the size of a primitive type in bytes (if the type is so).
    fn size_of() -> Option<usize> {
        None
    }
}

// Integer primitives are the leaves of every persisted structure: a
// fixed-width little-endian encoding, with size_of advertising the width so
// container impls can size their payloads without walking them.
macro_rules! int_serializable {
    ($($int:ty),* $(,)?) => {$(
        impl Serializable for $int {
            fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
                let encoded = self.to_le_bytes();
                writer.write_all(&encoded)?;
                Ok(encoded.len())
            }

            fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
                let mut encoded = [0u8; size_of::<$int>()];
                reader.read_exact(&mut encoded)?;
                Ok(<$int>::from_le_bytes(encoded))
            }

            fn size_in_bytes(&self) -> usize {
                size_of::<$int>()
            }

            fn size_of() -> Option<usize> {
                Some(size_of::<$int>())
            }
        }
    )*};
}

int_serializable!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Serializable for bool {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        writer.write_all(&[*self as u8])?;
        Ok(1)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut encoded = [0u8; 1];
        reader.read_exact(&mut encoded)?;
        Ok(encoded[0] != 0)
    }

    fn size_in_bytes(&self) -> usize {
        1
    }

    fn size_of() -> Option<usize> {
        Some(1)
    }
}

impl<S> Serializable for Option<S>
where
    S: Serializable,
{
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = 0;
        if let Some(x) = self {
            mem += true.serialize_into(&mut writer)?;
            mem += x.serialize_into(&mut writer)?;
        } else {
            mem += false.serialize_into(&mut writer)?;
        }
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let x = if bool::deserialize_from(&mut reader)? {
            Some(S::deserialize_from(&mut reader)?)
        } else {
            None
        };
        Ok(x)
    }

    fn size_in_bytes(&self) -> usize {
        self.as_ref().map_or(0, |x| x.size_in_bytes()) + bool::size_of().unwrap()
    }
}

impl<S> Serializable for Vec<S>
where
    S: Serializable,
{
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = self.len().serialize_into(&mut writer)?;
        for x in self {
            mem += x.serialize_into(&mut writer)?;
        }
        Ok(mem)
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = usize::deserialize_from(&mut reader)?;
        let mut vec = Self::with_capacity(len);
        for _ in 0..len {
            vec.push(S::deserialize_from(&mut reader)?);
        }
        Ok(vec)
    }

    fn size_in_bytes(&self) -> usize {
        S::size_of().map_or_else(
            || usize::size_of().unwrap() + self.iter().fold(0, |acc, x| acc + x.size_in_bytes()),
            |m| usize::size_of().unwrap() + m * self.len(),
        )
    }
}

impl<S, const N: usize> Serializable for [S; N]
where
    S: Serializable,
{
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut mem = self.len().serialize_into(&mut writer)?;
        for x in self {
            mem += x.serialize_into(&mut writer)?;
        }
        Ok(mem)
    }

    /// Deserializes the array, failing with [`Error::ResizeRequired`] if the
    /// persisted length differs from `N`.
    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = usize::deserialize_from(&mut reader)?;
        if len != N {
            return Err(Error::ResizeRequired {
                expected: len,
                actual: N,
            });
        }
        let mut vec = Vec::with_capacity(N);
        for _ in 0..N {
            vec.push(S::deserialize_from(&mut reader)?);
        }
        vec.try_into()
            .map_err(|_| Error::internal("array length changed during deserialization."))
    }

    fn size_in_bytes(&self) -> usize {
        S::size_of().map_or_else(
            || usize::size_of().unwrap() + self.iter().fold(0, |acc, x| acc + x.size_in_bytes()),
            |m| usize::size_of().unwrap() + m * N,
        )
    }
}

impl Serializable for String {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mem = self.len().serialize_into(&mut writer)?;
        writer.write_all(self.as_bytes())?;
        Ok(mem + self.len())
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let len = usize::deserialize_from(&mut reader)?;
        let mut buf = vec![0; len];
        reader.read_exact(&mut buf)?;
        Self::from_utf8(buf).map_err(|e| Error::format(format!("invalid utf-8 payload: {e}")))
    }

    fn size_in_bytes(&self) -> usize {
        usize::size_of().unwrap() + self.len()
    }
}
