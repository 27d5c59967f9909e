//! Tooth tip estimation from an oriented bounding box.
//!
//! Segment frames have no canonical "up", so the box face carrying the
//! biting edge is picked by looking at the signs of the box's z-axis
//! direction. The candidate point is
//!
//! ```text
//! origin + 0.5 * (ex * x_axis + ey * y_axis + k * ez * z_axis)
//! ```
//!
//! where the z multiplier `k` starts from a base value and is then
//! overwritten by every override rule whose condition holds, in order.
//! Later rules win. The two rule tables are not mirror images of each
//! other and the all-negative fallback differs between them (`-5` when
//! the position flag is set, `-2` otherwise); that asymmetry is part of
//! the measured output and must not be normalised away.

use homodonty_math::{Point3, Vec3};

use crate::segment::OrientedBox;

/// Condition on the box's z-axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisCondition {
    /// Third component is negative.
    ZComponentNegative,
    /// Second component is negative.
    YComponentNegative,
    /// All three components are negative.
    AllComponentsNegative,
}

impl AxisCondition {
    /// Whether the condition holds for `dir`.
    pub fn holds(self, dir: &Vec3) -> bool {
        match self {
            Self::ZComponentNegative => dir.z < 0.0,
            Self::YComponentNegative => dir.y < 0.0,
            Self::AllComponentsNegative => dir.iter().all(|&c| c < 0.0),
        }
    }
}

/// Override of the z multiplier, applied when `when` holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentRule {
    /// Trigger.
    pub when: AxisCondition,
    /// Replacement multiplier.
    pub z_scale: f64,
}

const fn rule(when: AxisCondition, z_scale: f64) -> ExtentRule {
    ExtentRule { when, z_scale }
}

/// Ordered rule table for choosing the z multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipEstimator {
    /// Multiplier before any override.
    pub base_scale: f64,
    /// Overrides, applied in order, last match wins.
    pub rules: &'static [ExtentRule],
}

/// Rules used when the position flag is set.
pub const FLAGGED: TipEstimator = TipEstimator {
    base_scale: -2.0,
    rules: &[
        rule(AxisCondition::ZComponentNegative, 5.0),
        rule(AxisCondition::YComponentNegative, -2.0),
        rule(AxisCondition::AllComponentsNegative, -2.0),
        rule(AxisCondition::AllComponentsNegative, -5.0),
    ],
};

/// Rules used when the position flag is clear.
pub const UNFLAGGED: TipEstimator = TipEstimator {
    base_scale: 5.0,
    rules: &[
        rule(AxisCondition::ZComponentNegative, -2.0),
        rule(AxisCondition::YComponentNegative, 5.0),
        rule(AxisCondition::AllComponentsNegative, 5.0),
        rule(AxisCondition::AllComponentsNegative, -2.0),
    ],
};

impl TipEstimator {
    /// Rule table for a position flag value.
    pub fn for_flag(position_flag: bool) -> Self {
        if position_flag {
            FLAGGED
        } else {
            UNFLAGGED
        }
    }

    /// The z multiplier for a box z-axis direction.
    pub fn z_scale(&self, z_axis: &Vec3) -> f64 {
        self.rules
            .iter()
            .fold(self.base_scale, |k, r| if r.when.holds(z_axis) { r.z_scale } else { k })
    }

    /// Candidate tip point for `obb`, before surface snapping.
    pub fn estimate(&self, obb: &OrientedBox) -> Point3 {
        let [ex, ey, ez] = obb.extents;
        let [ax, ay, _] = &obb.axes;
        let az = obb.z_axis();
        let k = self.z_scale(az);
        obb.origin + 0.5 * (ex * ax + ey * ay + k * ez * az)
    }
}

/// Candidate tip point for `obb` under `position_flag`.
pub fn estimate_tip(obb: &OrientedBox, position_flag: bool) -> Point3 {
    TipEstimator::for_flag(position_flag).estimate(obb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scale(flag: bool, x: f64, y: f64, z: f64) -> f64 {
        TipEstimator::for_flag(flag).z_scale(&Vec3::new(x, y, z))
    }

    #[test]
    fn test_base_scale() {
        assert_eq!(scale(false, 0.0, 0.0, 1.0), 5.0);
        assert_eq!(scale(true, 0.0, 0.0, 1.0), -2.0);
    }

    #[test]
    fn test_negative_x_alone_changes_nothing() {
        assert_eq!(scale(false, -1.0, 0.0, 0.0), 5.0);
        assert_eq!(scale(true, -1.0, 0.0, 0.0), -2.0);
    }

    #[test]
    fn test_z_negative_flips() {
        assert_eq!(scale(false, 0.0, 0.0, -1.0), -2.0);
        assert_eq!(scale(true, 0.0, 0.0, -1.0), 5.0);
    }

    #[test]
    fn test_y_negative_restores_base() {
        assert_eq!(scale(false, 0.0, -1.0, 0.0), 5.0);
        assert_eq!(scale(true, 0.0, -1.0, 0.0), -2.0);
    }

    #[test]
    fn test_y_override_beats_z_override() {
        // Both single-component rules fire; the later y rule wins.
        assert_eq!(scale(false, 0.6, -0.6, -0.5), 5.0);
        assert_eq!(scale(true, 0.6, -0.6, -0.5), -2.0);
    }

    #[test]
    fn test_all_negative_fallback_is_asymmetric() {
        // Known quirk: the flagged table falls back to -5, a value the
        // other rules never produce, while the unflagged one uses -2.
        let d = -1.0 / 3f64.sqrt();
        assert_eq!(scale(true, d, d, d), -5.0);
        assert_eq!(scale(false, d, d, d), -2.0);
    }

    #[test]
    fn test_zero_components_are_not_negative() {
        assert_eq!(scale(false, 0.0, -0.0, -0.0), 5.0);
    }

    #[test]
    fn test_estimate_identity_box() {
        let obb = OrientedBox::axis_aligned(Point3::origin(), [2.0, 2.0, 2.0]);
        assert_relative_eq!(
            estimate_tip(&obb, false),
            Point3::new(1.0, 1.0, 5.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            estimate_tip(&obb, true),
            Point3::new(1.0, 1.0, -2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_estimate_flipped_box() {
        // z axis pointing down: the unflagged table switches to -2,
        // which lands above the box in scene space.
        let obb = OrientedBox {
            origin: Point3::new(0.0, 0.0, 4.0),
            extents: [2.0, 2.0, 4.0],
            axes: [Vec3::x(), Vec3::y(), -Vec3::z()],
        };
        assert_relative_eq!(
            estimate_tip(&obb, false),
            Point3::new(1.0, 1.0, 8.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_estimate_uses_box_axes() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let obb = OrientedBox {
            origin: Point3::new(10.0, 0.0, 0.0),
            extents: [2.0, 4.0, 1.0],
            axes: [Vec3::new(s, s, 0.0), Vec3::new(-s, s, 0.0), Vec3::z()],
        };
        let p = estimate_tip(&obb, false);
        let expected = Point3::new(10.0, 0.0, 0.0)
            + 0.5 * (2.0 * Vec3::new(s, s, 0.0) + 4.0 * Vec3::new(-s, s, 0.0) + 5.0 * Vec3::z());
        assert_relative_eq!(p, expected, epsilon = 1e-12);
    }
}
