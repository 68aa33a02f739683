//! This module defines the `MatFile` type, an in-memory view of the
//! numeric variables stored in a MATLAB MAT-file.
//!
//! Both the legacy Level 4 format (used by ITK and ANTs for transform
//! files) and the tagged Level 5 format are supported for reading. Every
//! numeric value is widened to `f64`. Files are only ever written in
//! the Level 4 format.
//!
//! # Example
//!
//! ```no_run
//! use ants2fsl::MatFile;
//! # use ants2fsl::Result;
//!
//! # fn run() -> Result<()> {
//! let mat = MatFile::from_file("0GenericAffine.mat")?;
//! for var in mat.variables() {
//!     println!("{} ({}x{})", var.name(), var.rows(), var.cols());
//! }
//! # Ok(())
//! # }
//! ```

pub mod typedef;
mod v4;
mod v5;

use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Result as IoResult, Write};
use std::path::Path;

/// The MAT-file format level a file was read from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatLevel {
    /// MATLAB v4 (and earlier) format.
    Level4,
    /// MATLAB v5 to v7 format.
    Level5,
}

/// A single named numeric matrix.
///
/// Values are kept in the file's column-major order.
#[derive(Debug, PartialEq, Clone)]
pub struct MatVariable {
    name: String,
    rows: usize,
    cols: usize,
    real: Vec<f64>,
    imag: Option<Vec<f64>>,
}

impl MatVariable {
    /// Create a real matrix out of its name, shape and column-major data.
    ///
    /// # Panics
    /// If `data.len()` is not `rows * cols`.
    pub fn new<N: Into<String>>(name: N, rows: usize, cols: usize, data: Vec<f64>) -> Self {
        if data.len() != rows * cols {
            panic!(
                "Illegal variable size: shape is {}x{}, but got {} values",
                rows,
                cols,
                data.len()
            );
        }
        MatVariable {
            name: name.into(),
            rows,
            cols,
            real: data,
            imag: None,
        }
    }

    /// Attach an imaginary part to this matrix.
    ///
    /// # Panics
    /// If `imag` does not have as many values as the real part.
    pub fn with_imaginary(mut self, imag: Vec<f64>) -> Self {
        if imag.len() != self.real.len() {
            panic!(
                "Illegal imaginary part: expected {} values, got {}",
                self.real.len(),
                imag.len()
            );
        }
        self.imag = Some(imag);
        self
    }

    pub(crate) fn from_parts(
        name: String,
        rows: usize,
        cols: usize,
        real: Vec<f64>,
        imag: Option<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(real.len(), rows * cols);
        MatVariable {
            name,
            rows,
            cols,
            real,
            imag,
        }
    }

    /// The variable's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Whether the matrix has no elements.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// The real part, in column-major order.
    pub fn data(&self) -> &[f64] {
        &self.real
    }

    /// The imaginary part, if the matrix is complex.
    pub fn imaginary(&self) -> Option<&[f64]> {
        self.imag.as_deref()
    }

    /// Whether the matrix has an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.imag.is_some()
    }

    /// Fetch the real value at the given position.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.real[col * self.rows + row])
        } else {
            None
        }
    }
}

/// The numeric contents of a MAT-file.
#[derive(Debug, PartialEq, Clone)]
pub struct MatFile {
    level: MatLevel,
    variables: Vec<MatVariable>,
}

impl MatFile {
    /// Create a Level 4 MAT-file out of the given variables.
    pub fn new(variables: Vec<MatVariable>) -> Self {
        MatFile {
            level: MatLevel::Level4,
            variables,
        }
    }

    /// Read a MAT-file from the file system.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Self::from_reader(file)
    }

    /// Read a MAT-file from the given byte source, until its end.
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self> {
        let mut data = Vec::new();
        let _ = source.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Read a MAT-file held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(ConvertError::InvalidFormat("empty file"));
        }
        if let Some(endianness) = v5::detect(data) {
            Ok(MatFile {
                level: MatLevel::Level5,
                variables: v5::read_variables(data, endianness)?,
            })
        } else {
            Ok(MatFile {
                level: MatLevel::Level4,
                variables: v4::read_variables(data)?,
            })
        }
    }

    /// The format level this file was read from.
    pub fn level(&self) -> MatLevel {
        self.level
    }

    /// All variables, in file order.
    pub fn variables(&self) -> &[MatVariable] {
        &self.variables
    }

    /// Look up a variable by name. When a name repeats, the last
    /// occurrence wins.
    pub fn variable(&self, name: &str) -> Option<&MatVariable> {
        self.variables.iter().rev().find(|v| v.name == name)
    }

    /// Write all variables in the Level 4 format, as little endian
    /// double precision matrices.
    pub fn write_v4<W: Write>(&self, writer: W) -> IoResult<()> {
        v4::write_variables(writer, &self.variables)
    }

    /// Write all variables to a Level 4 file in the file system.
    pub fn to_file_v4<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write = || -> IoResult<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_v4(&mut writer)?;
            writer.flush()
        };
        write().map_err(|e| ConvertError::Write(path.to_path_buf(), e))
    }
}
