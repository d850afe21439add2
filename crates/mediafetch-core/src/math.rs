/// Vector, matrix and quaternion types from [`glam`].
///
/// Scene graph transforms are expressed with these types.
///
/// ```
/// use mediafetch_core::math::{Quat, Vec3};
///
/// let flipped = Quat::from_rotation_y(std::f32::consts::PI) * Vec3::Z;
/// assert!((flipped - Vec3::NEG_Z).length() < 1e-5);
/// ```
pub use glam::*;
