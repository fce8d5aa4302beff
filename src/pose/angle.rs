//! Joint angle from three 2D landmarks
//!
//! The angle at vertex `b` between rays `b→a` and `b→c`, computed from the
//! dot product of the two unit vectors.

use super::landmarks::Point2;

/// Included angle at `b`, in degrees within [0, 180].
///
/// A zero-length ray is normalized by 1 instead of its length, so coincident
/// points yield a defined angle rather than NaN.
pub fn joint_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let n_ba = length_or_one(bax.hypot(bay));
    let n_bc = length_or_one(bcx.hypot(bcy));

    let cos = (bax / n_ba) * (bcx / n_bc) + (bay / n_ba) * (bcy / n_bc);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

fn length_or_one(length: f64) -> f64 {
    if length == 0.0 {
        1.0
    } else {
        length
    }
}
