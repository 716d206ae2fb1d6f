use crate::Dims;
use std::fmt;

#[derive(Debug)]
pub struct InvalidArgument {
    pub name: &'static str,
    pub value: i64,
    pub reason: String,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' - value '{}' {}",
            self.name, self.value, self.reason
        )
    }
}

#[derive(Debug)]
pub struct ShapeMismatch {
    pub what: &'static str,
    pub expected: Dims,
    pub actual: Dims,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the {} size ({}x{}) must match the expected size ({}x{})",
            self.what,
            self.actual.width,
            self.actual.height,
            self.expected.width,
            self.expected.height
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// An error in the image library occurred, eg failed to load/save
    Image(image::ImageError),
    /// A pyramid depth, thread count or similar parameter was out of range
    InvalidArgument(InvalidArgument),
    /// Two images or pyramid levels that are combined element-wise did not
    /// have the same dimensions
    ShapeMismatch(ShapeMismatch),
    /// An element-wise operation produced a non-finite sample, which only
    /// happens if non-finite samples were fed in
    ArithmeticOverflow { op: &'static str },
    /// The session was built without one of its three input images
    MissingInput(&'static str),
    /// Io is notoriously error free with no problems, but we cover it just in case!
    Io(std::io::Error),
    /// The user specified an image format we don't support as the output
    UnsupportedOutputFormat(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: i64, reason: impl Into<String>) -> Self {
        Self::InvalidArgument(InvalidArgument {
            name,
            value,
            reason: reason.into(),
        })
    }

    pub(crate) fn shape(what: &'static str, expected: Dims, actual: Dims) -> Self {
        Self::ShapeMismatch(ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(ie) => write!(f, "{}", ie),
            Self::InvalidArgument(ia) => write!(f, "{}", ia),
            Self::ShapeMismatch(sm) => write!(f, "{}", sm),
            Self::ArithmeticOverflow { op } => {
                write!(f, "'{}' produced a sample that is not a finite number", op)
            }
            Self::MissingInput(which) => write!(f, "no {} image was provided", which),
            Self::Io(io) => write!(f, "{}", io),
            Self::UnsupportedOutputFormat(fmt) => {
                write!(f, "the output format '{}' is not supported", fmt)
            }
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(ie: image::ImageError) -> Self {
        Self::Image(ie)
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Io(io)
    }
}
