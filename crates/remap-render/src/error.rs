//! Construction-time errors.
//!
//! Drawing never fails: misuse produces undefined output and missing
//! resources turn draws into logged no-ops. Only loading an atlas or a font
//! can return an error.

use std::fmt;

/// Error type for [`Atlas`](crate::Atlas) construction.
#[derive(Debug)]
pub enum AtlasError {
    /// The image file could not be read.
    Io(std::io::Error),
    /// The image data could not be decoded.
    Decode(image::ImageError),
    /// A tile dimension was zero.
    ZeroTileSize { width: u32, height: u32 },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Io(e) => write!(f, "cannot read atlas image: {e}"),
            AtlasError::Decode(e) => write!(f, "cannot decode atlas image: {e}"),
            AtlasError::ZeroTileSize { width, height } => {
                write!(f, "invalid tile size {width}x{height}")
            }
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::Io(e) => Some(e),
            AtlasError::Decode(e) => Some(e),
            AtlasError::ZeroTileSize { .. } => None,
        }
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(e: std::io::Error) -> Self {
        AtlasError::Io(e)
    }
}

impl From<image::ImageError> for AtlasError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => AtlasError::Io(io),
            other => AtlasError::Decode(other),
        }
    }
}

/// Error type for [`TtfFace`](crate::TtfFace) construction.
#[derive(Debug)]
pub enum FontError {
    /// The font data could not be parsed.
    InvalidFont(&'static str),
    /// The requested pixel size was not a positive number.
    InvalidSize(f32),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::InvalidFont(reason) => write!(f, "invalid font data: {reason}"),
            FontError::InvalidSize(px) => write!(f, "invalid font size {px}"),
        }
    }
}

impl std::error::Error for FontError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = AtlasError::ZeroTileSize { width: 0, height: 16 };
        assert_eq!(e.to_string(), "invalid tile size 0x16");
        assert_eq!(FontError::InvalidSize(-1.0).to_string(), "invalid font size -1");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let e = AtlasError::from(io);
        assert!(matches!(e, AtlasError::Io(_)));
        assert!(std::error::Error::source(&e).is_some());
    }
}
