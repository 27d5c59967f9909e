//! Tooth segments and landmark points.

use homodonty_math::{is_finite_point, Point3, Vec3};
use homodonty_mesh::WorldMesh;
use serde::{Deserialize, Serialize};

use crate::error::{HomodontyError, Result};

/// Oriented bounding box of a segment, as reported by surface statistics.
///
/// `origin` is a box corner; the box spans `extents[i] * axes[i]` from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    /// Box corner in scene coordinates.
    pub origin: Point3,
    /// Full edge length along each axis (mm).
    pub extents: [f64; 3],
    /// Box axes, orthonormal, in scene coordinates.
    pub axes: [Vec3; 3],
}

impl OrientedBox {
    /// Axis-aligned box with identity axes.
    pub fn axis_aligned(origin: Point3, extents: [f64; 3]) -> Self {
        Self {
            origin,
            extents,
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
        }
    }

    /// The box's third axis, the one the tip heuristic inspects.
    pub fn z_axis(&self) -> &Vec3 {
        &self.axes[2]
    }

    /// Reject non-finite values and negative extents.
    pub fn validate(&self) -> Result<()> {
        let finite = is_finite_point(&self.origin)
            && self.extents.iter().all(|e| e.is_finite())
            && self.axes.iter().all(|a| a.iter().all(|c| c.is_finite()));
        if !finite {
            return Err(HomodontyError::InvalidInput(
                "bounding box has non-finite values".into(),
            ));
        }
        if self.extents.iter().any(|&e| e < 0.0) {
            return Err(HomodontyError::InvalidInput(format!(
                "bounding box has negative extent: {:?}",
                self.extents
            )));
        }
        Ok(())
    }
}

/// One tooth: identity, world-frame surface and surface statistics.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Unique segment id.
    pub id: String,
    /// Display name, reported as the tooth id.
    pub name: String,
    /// Surface in scene coordinates.
    pub surface: WorldMesh,
    /// Surface area (mm²).
    pub area_mm2: f64,
    /// Oriented bounding box.
    pub obb: OrientedBox,
}

impl Segment {
    /// Create a segment.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        surface: WorldMesh,
        area_mm2: f64,
        obb: OrientedBox,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            surface,
            area_mm2,
            obb,
        }
    }
}

/// Role of a user-placed landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmarkRole {
    /// Jaw joint (fulcrum).
    JawJoint,
    /// Anterior tip of the jaw.
    JawTip,
    /// Insertion of the jaw-closing muscle.
    MuscleInsertion,
}

/// A role-tagged landmark point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// What the point marks.
    pub role: LandmarkRole,
    /// Position in scene coordinates.
    pub point: Point3,
}

impl Landmark {
    /// Create a landmark.
    pub fn new(role: LandmarkRole, point: Point3) -> Self {
        Self { role, point }
    }
}

/// The three landmarks a run needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    /// Jaw joint.
    pub jaw_joint: Point3,
    /// Jaw tip.
    pub jaw_tip: Point3,
    /// Muscle insertion.
    pub muscle_insertion: Point3,
}

impl Landmarks {
    /// Create a landmark set.
    pub fn new(jaw_joint: Point3, jaw_tip: Point3, muscle_insertion: Point3) -> Self {
        Self {
            jaw_joint,
            jaw_tip,
            muscle_insertion,
        }
    }

    /// Build from tagged points; each role must appear exactly once.
    pub fn from_tagged(landmarks: &[Landmark]) -> Result<Self> {
        let pick = |role: LandmarkRole| -> Result<Point3> {
            let mut matching = landmarks.iter().filter(|l| l.role == role);
            match (matching.next(), matching.next()) {
                (Some(l), None) => Ok(l.point),
                (None, _) => Err(HomodontyError::InvalidInput(format!(
                    "missing {role:?} landmark"
                ))),
                (Some(_), Some(_)) => Err(HomodontyError::InvalidInput(format!(
                    "more than one {role:?} landmark"
                ))),
            }
        };
        Ok(Self {
            jaw_joint: pick(LandmarkRole::JawJoint)?,
            jaw_tip: pick(LandmarkRole::JawTip)?,
            muscle_insertion: pick(LandmarkRole::MuscleInsertion)?,
        })
    }

    /// Reject non-finite coordinates.
    pub fn validate(&self) -> Result<()> {
        for (role, point) in [
            (LandmarkRole::JawJoint, &self.jaw_joint),
            (LandmarkRole::JawTip, &self.jaw_tip),
            (LandmarkRole::MuscleInsertion, &self.muscle_insertion),
        ] {
            if !is_finite_point(point) {
                return Err(HomodontyError::InvalidInput(format!(
                    "{role:?} landmark has non-finite coordinates"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged() -> Vec<Landmark> {
        vec![
            Landmark::new(LandmarkRole::MuscleInsertion, Point3::new(1.0, 0.0, 0.0)),
            Landmark::new(LandmarkRole::JawJoint, Point3::origin()),
            Landmark::new(LandmarkRole::JawTip, Point3::new(10.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn test_from_tagged_any_order() {
        let landmarks = Landmarks::from_tagged(&tagged()).unwrap();
        assert_eq!(landmarks.jaw_joint, Point3::origin());
        assert_eq!(landmarks.jaw_tip, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(landmarks.muscle_insertion, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_tagged_missing_role() {
        let mut points = tagged();
        points.retain(|l| l.role != LandmarkRole::JawTip);
        let err = Landmarks::from_tagged(&points).unwrap_err();
        assert!(matches!(err, HomodontyError::InvalidInput(msg) if msg.contains("JawTip")));
    }

    #[test]
    fn test_from_tagged_repeated_role() {
        let mut points = tagged();
        points.push(Landmark::new(LandmarkRole::JawJoint, Point3::new(0.0, 1.0, 0.0)));
        let err = Landmarks::from_tagged(&points).unwrap_err();
        assert!(matches!(err, HomodontyError::InvalidInput(msg) if msg.contains("more than one")));
    }

    #[test]
    fn test_landmarks_reject_nan() {
        let landmarks = Landmarks::new(
            Point3::origin(),
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        assert!(landmarks.validate().is_err());
    }

    #[test]
    fn test_obb_validation() {
        let obb = OrientedBox::axis_aligned(Point3::origin(), [2.0, 2.0, 2.0]);
        assert!(obb.validate().is_ok());
        assert_eq!(obb.z_axis(), &Vec3::z());

        let negative = OrientedBox::axis_aligned(Point3::origin(), [2.0, -1.0, 2.0]);
        assert!(negative.validate().is_err());

        let mut nan_axis = obb.clone();
        nan_axis.axes[1] = Vec3::new(0.0, f64::NAN, 0.0);
        assert!(nan_axis.validate().is_err());
    }
}
