// error.rs
//
// Copyright (c) 2026  gifrec authors
//
use std::fmt;
use std::io;
use std::num::TryFromIntError;

/// Errors encountered while encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Integer out of bounds.
    TryFromInt(TryFromIntError),
    /// Encoding was started with no frames.
    EmptyAnimation,
    /// Frame raster does not match the animation width / height.
    InvalidFrameDimensions,
}

/// Gifrec result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::TryFromInt(err) => err.fmt(fmt),
            Error::EmptyAnimation => write!(fmt, "no frames added"),
            Error::InvalidFrameDimensions => {
                write!(fmt, "frame does not match screen dimensions")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::TryFromInt(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}
