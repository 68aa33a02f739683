//! Conversion of ITK transforms to the FSL matrix convention.
//!
//! The packed homogeneous matrix of a [`CenteredAffine`] is first masked
//! element by element to swap between LPS and RAS axis signs, then moved
//! between voxel and physical space with two fixed affine maps. The maps
//! are calibrated for one specific acquisition geometry.

use crate::error::Result;
use crate::transform::{AffineRecord, CenteredAffine};
use crate::writer::write_matrix;
use approx::abs_diff_eq;
use log::{debug, info, warn};
use nalgebra::{Matrix4, RowVector4};
use std::path::Path;

#[rustfmt::skip]
const LPS_TO_RAS: [[f64; 4]; 4] = [
    [ 1.0, -1.0, 1.0,  1.0],
    [-1.0,  1.0, 1.0,  1.0],
    [ 1.0,  1.0, 1.0, -1.0],
    [ 1.0,  1.0, 1.0,  1.0],
];

#[rustfmt::skip]
const XYZ_TO_RAS: [[f64; 4]; 4] = [
    [ 0.4996, -0.0150, 0.0139, -82.7331],
    [ 0.0150,  0.4998, 0.0007, -89.2923],
    [-0.0139, -0.0003, 0.4998, -16.2598],
    [ 0.0,     0.0,    0.0,      1.0],
];

#[rustfmt::skip]
const RAS_TO_XYZ: [[f64; 4]; 4] = [
    [ 1.9983, 0.0598, -0.0555, 169.7678],
    [-0.0599, 1.9991, -0.0012, 173.5305],
    [ 0.0555, 0.0029,  1.9992,  37.3517],
    [ 0.0,    0.0,     0.0,      1.0],
];

/// Tolerance of the bottom row check on converted matrices.
const BOTTOM_ROW_EPSILON: f64 = 1e-6;

fn to_matrix(rows: &[[f64; 4]; 4]) -> Matrix4<f64> {
    Matrix4::from_fn(|r, c| rows[r][c])
}

/// Sign mask between the LPS and RAS conventions.
pub fn lps_to_ras() -> Matrix4<f64> {
    to_matrix(&LPS_TO_RAS)
}

/// Voxel to physical space map.
pub fn xyz_to_ras() -> Matrix4<f64> {
    to_matrix(&XYZ_TO_RAS)
}

/// Physical to voxel space map.
pub fn ras_to_xyz() -> Matrix4<f64> {
    to_matrix(&RAS_TO_XYZ)
}

/// Multiply each entry of `m` by the entry of `mask` at the same position.
///
/// This is not a matrix product.
pub fn apply_sign_mask(m: &Matrix4<f64>, mask: &Matrix4<f64>) -> Matrix4<f64> {
    m.component_mul(mask)
}

/// Compute `ras2xyz * m * xyz2ras`.
pub fn remap(m: &Matrix4<f64>, ras2xyz: &Matrix4<f64>, xyz2ras: &Matrix4<f64>) -> Matrix4<f64> {
    ras2xyz * m * xyz2ras
}

/// Convert a transform to an FSL matrix, using the calibrated constants.
pub fn to_fsl(transform: &CenteredAffine) -> Matrix4<f64> {
    let packed = transform.to_homogeneous();
    debug!("packed transform: {}", packed);
    let masked = apply_sign_mask(&packed, &lps_to_ras());
    debug!("after sign mask: {}", masked);
    let out = remap(&masked, &ras_to_xyz(), &xyz_to_ras());

    let bottom = out.row(3).into_owned();
    if !abs_diff_eq!(
        bottom,
        RowVector4::new(0., 0., 0., 1.),
        epsilon = BOTTOM_ROW_EPSILON
    ) {
        warn!(
            "converted matrix has bottom row {} instead of [0, 0, 0, 1]",
            bottom
        );
    }
    out
}

/// Convert the ITK transform file at `input` into an FSL matrix file at
/// `output`, returning the converted matrix.
///
/// Nothing is written unless loading and conversion succeed.
pub fn convert_file<P, Q>(input: P, output: Q) -> Result<Matrix4<f64>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    let record = AffineRecord::from_file(input)?;
    info!("read `{}` from {}", record.key(), input.display());

    let transform = record.decompose();
    debug!("decomposed: {:?}", transform);
    let fsl = to_fsl(&transform);

    write_matrix(output, &fsl)?;
    info!("wrote {}", output.display());
    Ok(fsl)
}
