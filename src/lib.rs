//! Conversion of ANTs/ITK affine transforms into FSL matrices.
//!
//! ANTs stores linear registrations as MATLAB MAT-files holding the ITK
//! parameters of an `AffineTransform` about a fixed center. FSL expects a
//! plain 4x4 matrix in its own convention. This crate reads the former,
//! decomposes it, and writes the latter.
//!
//! # Example
//!
//! ```no_run
//! # use ants2fsl::Result;
//! # fn run() -> Result<()> {
//! let matrix = ants2fsl::convert_file("0GenericAffine.mat", "affine.fsl.mat")?;
//! println!("{}", matrix);
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod convert;
pub mod error;
pub mod matfile;
pub mod transform;
pub mod writer;

pub use convert::{convert_file, to_fsl};
pub use error::{ConvertError, Result, Stage};
pub use matfile::{MatFile, MatLevel, MatVariable};
pub use transform::{AffineRecord, CenteredAffine};
