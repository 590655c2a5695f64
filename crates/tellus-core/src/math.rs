//! Fixed-size 3×3 linear algebra used by the camera frame.
//!
//! Products and storage come from glam. Inversion goes through the explicit
//! cofactor/determinant route so a freshly composed rotation is inverted from
//! its own entries rather than by transposing an accumulated approximation.

use glam::{Mat3, Vec3};

/// Element at `row`, `col` (glam stores columns).
#[inline]
fn at(m: &Mat3, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

/// Determinant of the 2×2 minor left after striking out `row` and `col`.
fn minor(m: &Mat3, row: usize, col: usize) -> f32 {
    let mut rows = (0..3).filter(|&r| r != row);
    let mut cols = (0..3).filter(|&c| c != col);
    let (r0, r1) = (rows.next().unwrap_or(0), rows.next().unwrap_or(0));
    let (c0, c1) = (cols.next().unwrap_or(0), cols.next().unwrap_or(0));
    at(m, r0, c0) * at(m, r1, c1) - at(m, r0, c1) * at(m, r1, c0)
}

/// Signed cofactor of element (`row`, `col`).
fn cofactor(m: &Mat3, row: usize, col: usize) -> f32 {
    let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
    sign * minor(m, row, col)
}

/// Determinant by cofactor expansion along the first row.
pub fn determinant(m: &Mat3) -> f32 {
    (0..3).map(|col| at(m, 0, col) * cofactor(m, 0, col)).sum()
}

/// Inverse via adjugate / determinant. `None` for a singular matrix.
pub fn invert(m: &Mat3) -> Option<Mat3> {
    let det = determinant(m);
    if det.abs() <= f32::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    // Adjugate is the transposed cofactor matrix: inverse(r, c) = cofactor(c, r).
    let column = |c: usize| {
        Vec3::new(
            cofactor(m, c, 0) * inv_det,
            cofactor(m, c, 1) * inv_det,
            cofactor(m, c, 2) * inv_det,
        )
    };
    Some(Mat3::from_cols(column(0), column(1), column(2)))
}

/// Unit-length copy of `v`, or `None` when `v` has (near) zero length.
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let length = v.dot(v).sqrt();
    if length <= f32::EPSILON {
        None
    } else {
        Some(v / length)
    }
}

/// Rotation of `angle` radians about `axis` (Rodrigues form).
///
/// The axis is normalized first; a degenerate axis yields the identity.
pub fn rotation_about_axis(axis: Vec3, angle: f32) -> Mat3 {
    let Some(a) = normalize(axis) else {
        return Mat3::IDENTITY;
    };
    let (sin, cos) = angle.sin_cos();
    let ncos = 1.0 - cos;

    let row0 = [
        cos + a.x * a.x * ncos,
        a.x * a.y * ncos - a.z * sin,
        a.x * a.z * ncos + a.y * sin,
    ];
    let row1 = [
        a.x * a.y * ncos + a.z * sin,
        cos + a.y * a.y * ncos,
        a.y * a.z * ncos - a.x * sin,
    ];
    let row2 = [
        a.x * a.z * ncos - a.y * sin,
        a.y * a.z * ncos + a.x * sin,
        cos + a.z * a.z * ncos,
    ];

    Mat3::from_cols(
        Vec3::new(row0[0], row1[0], row2[0]),
        Vec3::new(row0[1], row1[1], row2[1]),
        Vec3::new(row0[2], row1[2], row2[2]),
    )
}

/// Element-wise comparison within `tolerance`.
pub fn approx_eq(a: &Mat3, b: &Mat3, tolerance: f32) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() <= tolerance)
}
