use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::io::{Cursor, Write};

use crate::Error;

/// Decodes a record payload. The cursor holds exactly the bytes the record
/// header declared.
pub type DecodeFn<T> = fn(&mut Cursor<&[u8]>) -> Result<T, Error>;

/// A record layout that can be registered.
pub trait RecordVariant: Sized {
    /// Data format, unique within the family the record belongs to.
    const FORMAT: u32;

    /// Name used in logs and errors.
    const NAME: &'static str;

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, Error>;

    /// Writes the record header, format and length, followed by the payload.
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error>;
}

pub struct RecordEntry<T> {
    pub name: &'static str,
    pub decode: DecodeFn<T>,
}

/// Lookup table from data format to decoder, for one record family.
///
/// Flow records and counter records use separate registries, a format is only
/// meaningful inside its own family. A registry is built once and only read
/// afterwards.
pub struct Registry<T> {
    entries: HashMap<u32, RecordEntry<T>>,
}

impl<T> Registry<T> {
    /// A registry without any record, every format will be skipped.
    pub fn empty() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }

    /// Registers `V`, replacing any variant with the same format.
    pub fn register<V>(&mut self) -> &mut Self
    where
        V: RecordVariant + Into<T>,
    {
        self.entries.insert(
            V::FORMAT,
            RecordEntry {
                name: V::NAME,
                decode: decode_into::<V, T>,
            },
        );

        self
    }

    /// Returns `None` for formats nobody registered, which is expected for
    /// records newer than this crate.
    #[inline]
    pub fn get(&self, format: u32) -> Option<&RecordEntry<T>> {
        self.entries.get(&format)
    }

    pub fn name(&self, format: u32) -> Option<&'static str> {
        self.entries.get(&format).map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Debug for Registry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut entries = self
            .entries
            .iter()
            .map(|(format, entry)| (*format, entry.name))
            .collect::<Vec<_>>();
        entries.sort_unstable();

        f.debug_map().entries(entries).finish()
    }
}

fn decode_into<V, T>(buf: &mut Cursor<&[u8]>) -> Result<T, Error>
where
    V: RecordVariant + Into<T>,
{
    V::decode(buf).map(Into::into)
}
