//! Flow and counter records, according to https://sflow.org/SFLOW-STRUCTS5.txt

/// Declares a record whose payload is a flat list of fixed width fields.
///
/// The payload width, the decoder and the encoder are all generated from the
/// one field list, so they cannot disagree about the layout.
macro_rules! fixed_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($format:expr, $display:literal) {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident: $ty:ty,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, serde::Serialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl $name {
            /// Encoded payload width in bytes.
            pub const SIZE: u32 = (0 $(+ <$ty as xdr::Field>::WIDTH)+) as u32;
        }

        impl $crate::registry::RecordVariant for $name {
            const FORMAT: u32 = $format;
            const NAME: &'static str = $display;

            fn decode(buf: &mut std::io::Cursor<&[u8]>) -> Result<Self, $crate::Error> {
                let declared = buf.get_ref().len().saturating_sub(buf.position() as usize);
                if declared != Self::SIZE as usize {
                    return Err($crate::Error::InvalidRecordLength {
                        what: Self::NAME,
                        expected: Self::SIZE,
                        declared: declared as u32,
                    });
                }

                Ok($name {
                    $( $field: <$ty as xdr::Field>::read_from(buf)?, )+
                })
            }

            fn encode<W: std::io::Write + ?Sized>(
                &self,
                writer: &mut W,
            ) -> Result<(), $crate::Error> {
                xdr::XDRWriter::write_u32(writer, Self::FORMAT)?;
                xdr::XDRWriter::write_u32(writer, Self::SIZE)?;
                $( xdr::Field::write_to(&self.$field, writer)?; )+

                Ok(())
            }
        }
    };
}

/// Declares the enum of one record family, with conversions from every
/// variant and a [`Registry`](crate::Registry) default holding all of them.
macro_rules! record_family {
    (
        $(#[$meta:meta])*
        pub enum $family:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($record:ty),
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, serde::Serialize)]
        #[serde(tag = "type")]
        pub enum $family {
            $(
                $(#[$variant_meta])*
                $variant($record),
            )+
        }

        impl $family {
            /// Data format written in the record header.
            pub fn format(&self) -> u32 {
                match self {
                    $( $family::$variant(_) => <$record as $crate::registry::RecordVariant>::FORMAT, )+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $( $family::$variant(_) => <$record as $crate::registry::RecordVariant>::NAME, )+
                }
            }

            pub fn encode<W: std::io::Write + ?Sized>(
                &self,
                writer: &mut W,
            ) -> Result<(), $crate::Error> {
                match self {
                    $( $family::$variant(record) => $crate::registry::RecordVariant::encode(record, writer), )+
                }
            }
        }

        $(
            impl From<$record> for $family {
                fn from(record: $record) -> Self {
                    $family::$variant(record)
                }
            }
        )+

        impl Default for $crate::registry::Registry<$family> {
            fn default() -> Self {
                let mut registry = $crate::registry::Registry::empty();
                $( registry.register::<$record>(); )+
                registry
            }
        }
    };
}

mod counter;
mod flow;

pub use counter::*;
pub use flow::*;
