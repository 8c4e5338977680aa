//! Affine transform helpers: guarded inversion and TRS decomposition

use glam::{Mat4, Quat, Vec3};

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULAR_EPSILON: f32 = 1e-6;

/// Invert a matrix, falling back to identity when it is singular.
///
/// A singular parent world transform would otherwise leak NaN into every
/// descendant, so callers get the identity instead. The scene contract
/// (no zero scale components) makes this unreachable in practice.
pub fn invert_or_identity(m: Mat4) -> Mat4 {
    if m.determinant().abs() < SINGULAR_EPSILON {
        log::warn!("singular transform encountered, substituting identity");
        return Mat4::IDENTITY;
    }
    m.inverse()
}

/// Decompose an affine matrix into (scale, rotation, translation).
///
/// The rotation is re-normalized so downstream slerp always sees a unit
/// quaternion, even after accumulated floating-point drift.
pub fn decompose_trs(m: Mat4) -> (Vec3, Quat, Vec3) {
    let (scale, rotation, translation) = m.to_scale_rotation_translation();
    (scale, rotation.normalize(), translation)
}
