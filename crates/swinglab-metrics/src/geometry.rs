//! Planar angle primitives over frame-pixel coordinates.

/// Limbs shorter than this are treated as degenerate.
const MIN_LIMB_LENGTH: f64 = 1e-6;

/// Interior angle at `vertex` between the limbs toward `a` and `b`, in
/// degrees within `[0, 180]`.
///
/// Returns `None` when either limb is (near) zero length.
pub fn interior_angle(a: (f64, f64), vertex: (f64, f64), b: (f64, f64)) -> Option<f64> {
    let va = (a.0 - vertex.0, a.1 - vertex.1);
    let vb = (b.0 - vertex.0, b.1 - vertex.1);
    let na = (va.0 * va.0 + va.1 * va.1).sqrt();
    let nb = (vb.0 * vb.0 + vb.1 * vb.1).sqrt();
    if na < MIN_LIMB_LENGTH || nb < MIN_LIMB_LENGTH {
        return None;
    }
    let cos = ((va.0 * vb.0 + va.1 * vb.1) / (na * nb)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Signed angle of the `a -> b` vector against the +x axis, in degrees
/// within `(-180, 180]`.
pub fn segment_angle(a: (f64, f64), b: (f64, f64)) -> Option<f64> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    if dx.abs() < MIN_LIMB_LENGTH && dy.abs() < MIN_LIMB_LENGTH {
        return None;
    }
    Some(dy.atan2(dx).to_degrees())
}

/// Shortest signed angular difference `to - from`, normalized to
/// `(-180, 180]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta <= -180.0 {
        delta += 360.0;
    } else if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_angle_right_angle() {
        let angle = interior_angle((1.0, 0.0), (0.0, 0.0), (0.0, 1.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_interior_angle_straight_limb() {
        let angle = interior_angle((-1.0, 0.0), (0.0, 0.0), (1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_interior_angle_degenerate_limb() {
        assert!(interior_angle((0.0, 0.0), (0.0, 0.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_segment_angle() {
        assert!((segment_angle((0.0, 0.0), (1.0, 0.0)).unwrap() - 0.0).abs() < 1e-9);
        assert!((segment_angle((0.0, 0.0), (0.0, 1.0)).unwrap() - 90.0).abs() < 1e-9);
        assert!((segment_angle((0.0, 0.0), (-1.0, 0.0)).unwrap() - 180.0).abs() < 1e-9);
        assert!(segment_angle((2.0, 3.0), (2.0, 3.0)).is_none());
    }

    #[test]
    fn test_angle_delta_takes_short_way() {
        assert!((angle_delta(10.0, 30.0) - 20.0).abs() < 1e-9);
        assert!((angle_delta(30.0, 10.0) + 20.0).abs() < 1e-9);
        // Crossing the ±180 seam.
        assert!((angle_delta(170.0, -170.0) - 20.0).abs() < 1e-9);
        assert!((angle_delta(-170.0, 170.0) + 20.0).abs() < 1e-9);
        // A half turn resolves to +180, not -180.
        assert!((angle_delta(0.0, 180.0) - 180.0).abs() < 1e-9);
    }
}
