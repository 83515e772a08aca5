//! Error type shared by every codec in this crate.

/// Error type for formatting, parsing and encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The output would run past the end of the supplied buffer.
    BufferOverflow,
    /// A template's directives disagree with the supplied arguments.
    TemplateMismatch,
    /// Input text could not be parsed (missing octets, empty fields,
    /// unsupported radix).
    Malformed,
    /// A numeric field parsed but does not fit its target width.
    OutOfRange,
    /// Persistent storage could not be read.
    Storage,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferOverflow => write!(f, "buffer overflow"),
            Self::TemplateMismatch => write!(f, "template does not match arguments"),
            Self::Malformed => write!(f, "malformed input"),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::Storage => write!(f, "storage read failed"),
        }
    }
}

#[cfg(feature = "embedded-io")]
impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            Self::TemplateMismatch | Self::Malformed | Self::OutOfRange => {
                embedded_io::ErrorKind::InvalidInput
            }
            Self::Storage => embedded_io::ErrorKind::Other,
        }
    }
}
