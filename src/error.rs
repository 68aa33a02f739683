//! Types for error handling go here.

use quick_error::quick_error;
use std::fmt;
use std::io::Error as IOError;
use std::path::PathBuf;

/// The step of a conversion at which an error was raised.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    /// Reading and parsing the source MAT-file.
    Load,
    /// Extracting the affine parameters from the loaded variables.
    Decompose,
    /// Writing the converted matrix.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => f.write_str("load"),
            Stage::Decompose => f.write_str("decompose"),
            Stage::Write => f.write_str("write"),
        }
    }
}

quick_error! {
    /// Error type for all errors in this crate.
    #[derive(Debug)]
    pub enum ConvertError {
        /// The source is not a well formed MAT-file.
        InvalidFormat(reason: &'static str) {
            display("Invalid MAT-file: {}", reason)
        }
        /// The Level 4 machine code is not IEEE little or big endian,
        /// or it disagrees with the detected byte order.
        UnsupportedMachineFormat(code: i32) {
            display("Unsupported MAT-file machine format (type {})", code)
        }
        /// Unknown precision or data type code.
        UnsupportedPrecision(code: i32) {
            display("Unsupported MAT-file data type {}", code)
        }
        /// A required variable is not in the file.
        MissingVariable(name: String) {
            display("Variable `{}` not found", name)
        }
        /// A required variable does not have the expected number of elements.
        IncorrectLength(name: String, expected: usize, actual: usize) {
            display("Variable `{}` has {} elements, expected {}", name, actual, expected)
        }
        /// A required variable holds complex values.
        ComplexVariable(name: String) {
            display("Variable `{}` is complex", name)
        }
        /// The destination could not be written.
        Write(path: PathBuf, err: IOError) {
            display("Could not write `{}`: {}", path.display(), err)
            source(err)
        }
        /// I/O error while reading the source.
        Io(err: IOError) {
            from()
            display("{}", err)
            source(err)
        }
    }
}

impl ConvertError {
    /// The conversion stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ConvertError::MissingVariable(..)
            | ConvertError::IncorrectLength(..)
            | ConvertError::ComplexVariable(..) => Stage::Decompose,
            ConvertError::Write(..) => Stage::Write,
            _ => Stage::Load,
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, ConvertError>;
