use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of data")]
    ShortRead,
    #[error("{what} declares {declared} bytes, but only {available} bytes left")]
    Truncated {
        what: &'static str,
        declared: u32,
        available: usize,
    },
    #[error("{what} declares {declared} bytes, but {consumed} bytes consumed")]
    LengthMismatch {
        what: &'static str,
        declared: u32,
        consumed: u64,
    },
    #[error("{what} is {expected} bytes, but {declared} bytes declared")]
    InvalidRecordLength {
        what: &'static str,
        expected: u32,
        declared: u32,
    },
    #[error("unsupported datagram version {0}")]
    UnsupportedVersion(u32),
    #[error("unknown address type {0}")]
    UnknownAddressType(u32),
    #[error("header size {header_size} exceeds the {available} bytes left in the record")]
    HeaderSizeExceedsRecord { header_size: u32, available: usize },
    #[error("{count} {what} need more than the {available} bytes left")]
    CountExceedsRecord {
        what: &'static str,
        count: u32,
        available: usize,
    },
    #[error("too many samples {0}")]
    TooManySamples(u32),
    #[error("too many records {0}")]
    TooManyRecords(u32),
    #[error("source index {0} does not fit in 24 bits")]
    SourceIndexOverflow(u32),
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::ShortRead,
            _ => Error::Io(err),
        }
    }
}
