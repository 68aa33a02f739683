//! ITK affine transforms and their decomposition.
//!
//! ITK serializes a 3D `AffineTransform` as twelve parameters (the 3x3
//! matrix in row-major order followed by the translation) plus a fixed
//! center of rotation. The same point can be described with the center
//! folded into the translation, which is what the homogeneous form of
//! [`CenteredAffine::to_homogeneous`] is built from.

use crate::error::{ConvertError, Result};
use crate::matfile::{MatFile, MatVariable};
use log::debug;
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::path::Path;

/// Names under which ITK stores the twelve affine parameters, by preference.
pub const PARAMETER_KEYS: [&str; 4] = [
    "AffineTransform_double_3_3",
    "AffineTransform_float_3_3",
    "MatrixOffsetTransformBase_double_3_3",
    "MatrixOffsetTransformBase_float_3_3",
];

/// Name under which ITK stores the center of rotation.
pub const FIXED_KEY: &str = "fixed";

/// The raw parameters of an ITK affine transform, as found in a MAT-file.
#[derive(Debug, PartialEq, Clone)]
pub struct AffineRecord {
    parameters: [f64; 12],
    fixed: [f64; 3],
    key: String,
}

impl AffineRecord {
    /// Create a record from its parameters, stored under the default key.
    pub fn new(parameters: [f64; 12], fixed: [f64; 3]) -> Self {
        AffineRecord {
            parameters,
            fixed,
            key: PARAMETER_KEYS[0].to_string(),
        }
    }

    /// Load a record from a MAT-file in the file system.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mat = MatFile::from_file(path)?;
        debug!("loaded {:?}", mat);
        Self::from_mat_file(&mat)
    }

    /// Extract the record from the variables of a MAT-file.
    ///
    /// The parameter array must hold exactly 12 real values and the fixed
    /// point exactly 3. Values are taken in storage order, whatever the
    /// matrix shape.
    pub fn from_mat_file(mat: &MatFile) -> Result<Self> {
        let transform = PARAMETER_KEYS
            .iter()
            .find_map(|key| mat.variable(key))
            .ok_or_else(|| ConvertError::MissingVariable(PARAMETER_KEYS[0].to_string()))?;
        let fixed = mat
            .variable(FIXED_KEY)
            .ok_or_else(|| ConvertError::MissingVariable(FIXED_KEY.to_string()))?;

        let mut parameters = [0.; 12];
        parameters.copy_from_slice(checked_values(transform, 12)?);
        let mut center = [0.; 3];
        center.copy_from_slice(checked_values(fixed, 3)?);

        Ok(AffineRecord {
            parameters,
            fixed: center,
            key: transform.name().to_string(),
        })
    }

    /// The twelve transform parameters.
    pub fn parameters(&self) -> &[f64; 12] {
        &self.parameters
    }

    /// The fixed center of rotation.
    pub fn fixed(&self) -> &[f64; 3] {
        &self.fixed
    }

    /// The variable name the parameters were read from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Split the parameters into matrix, translation and center.
    pub fn decompose(&self) -> CenteredAffine {
        let p = &self.parameters;
        let matrix = Matrix3::from_row_slice(&p[..9]);
        let translation = Vector3::new(p[9], p[10], p[11]);
        let center = Vector3::from_column_slice(&self.fixed);
        CenteredAffine::new(matrix, translation, center)
    }

    /// Build a MAT-file holding this record, laid out the way ITK writes it.
    pub fn to_mat_file(&self) -> MatFile {
        MatFile::new(vec![
            MatVariable::new(self.key.clone(), 12, 1, self.parameters.to_vec()),
            MatVariable::new(FIXED_KEY, 3, 1, self.fixed.to_vec()),
        ])
    }
}

fn checked_values(var: &MatVariable, expected: usize) -> Result<&[f64]> {
    if var.is_complex() {
        return Err(ConvertError::ComplexVariable(var.name().to_string()));
    }
    if var.len() != expected {
        return Err(ConvertError::IncorrectLength(
            var.name().to_string(),
            expected,
            var.len(),
        ));
    }
    Ok(var.data())
}

/// An affine transform applied about a center point:
/// `y = matrix * (x - center) + translation + center`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CenteredAffine {
    matrix: Matrix3<f64>,
    translation: Vector3<f64>,
    center: Vector3<f64>,
}

impl CenteredAffine {
    /// Create a transform out of its components.
    pub fn new(matrix: Matrix3<f64>, translation: Vector3<f64>, center: Vector3<f64>) -> Self {
        CenteredAffine {
            matrix,
            translation,
            center,
        }
    }

    /// The linear part.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The translation, relative to the center.
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// The center of rotation and scaling.
    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    /// The translation once the center is folded in:
    /// `translation - matrix * center + center`.
    pub fn offset(&self) -> Vector3<f64> {
        self.translation - self.matrix * self.center + self.center
    }

    /// Pack the transform into a 4x4 matrix.
    ///
    /// The upper 3x4 block is `[matrix | offset]`. Unlike a plain
    /// homogeneous matrix, the bottom row carries the center in its first
    /// three entries, followed by 1.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let offset = self.offset();
        let mut out = Matrix4::identity();
        out.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.matrix);
        out.fixed_view_mut::<3, 1>(0, 3).copy_from(&offset);
        out.fixed_view_mut::<1, 3>(3, 0)
            .copy_from(&self.center.transpose());
        out
    }
}
