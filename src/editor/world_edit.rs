//! World-space widget edits mapped back to local space
//!
//! The manipulation widget hands back a proposed world transform for the
//! node under edit. Storage is local, so the proposal has to be pulled
//! back through the parent's world transform before it can be written.

use glam::Mat4;

use crate::math::{decompose_trs, invert_or_identity};
use crate::scene::LocalTransform;

/// Recover the local transform that realizes `proposed_world` under
/// `parent_world`.
///
/// Since world = parent_world * local, the new local is
/// inverse(parent_world) * proposed_world, decomposed back into TRS with
/// the rotation re-normalized. A singular parent (degenerate ancestor
/// scale) is treated as identity instead of producing NaN.
pub fn apply_world_edit(parent_world: Mat4, proposed_world: Mat4) -> LocalTransform {
    let new_local = invert_or_identity(parent_world) * proposed_world;
    let (scale, rotation, translation) = decompose_trs(new_local);
    LocalTransform {
        translation,
        rotation,
        scale,
    }
}
