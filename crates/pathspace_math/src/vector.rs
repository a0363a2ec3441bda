//! Vector helpers that glam does not provide directly.

use crate::{Float, Vec3f};

/// Squared length below which a vector is treated as degenerate.
pub const DEGENERATE_LENGTH_SQUARED: Float = 1e-24;

/// Normalized copy of `v`, or `None` if `v` is zero, tiny, or not finite.
///
/// Use this wherever the input comes from user data; `normalize()` on a
/// zero vector silently produces NaN.
#[inline]
pub fn try_unit(v: Vec3f) -> Option<Vec3f> {
    let len_sq = v.length_squared();
    if !len_sq.is_finite() || len_sq < DEGENERATE_LENGTH_SQUARED {
        return None;
    }
    Some(v / len_sq.sqrt())
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3f, n: Vec3f) -> Vec3f {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
///
/// `eta` is the ratio of indices of refraction (incident over transmitted).
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(uv: Vec3f, n: Vec3f, eta: Float) -> Option<Vec3f> {
    let cos_theta = (-uv).dot(n).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_theta * cos_theta);
    if k < 0.0 {
        return None;
    }
    Some(eta * uv + (eta * cos_theta - k.sqrt()) * n)
}

/// Flip `v` into the hemisphere around `normal`.
#[inline]
pub fn facing(v: Vec3f, normal: Vec3f) -> Vec3f {
    if v.dot(normal) < 0.0 {
        -v
    } else {
        v
    }
}
