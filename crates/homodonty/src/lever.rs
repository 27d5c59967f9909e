//! Jaw lever lengths.

use homodonty_math::{distance, Point3, Tolerance};
use homodonty_mesh::WorldMesh;
use serde::{Deserialize, Serialize};

use crate::error::{HomodontyError, Result};
use crate::segment::{Landmarks, OrientedBox};
use crate::tip::estimate_tip;

/// Run-level lever lengths, measured once from the landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunLevers {
    /// Jaw joint to jaw tip (mm).
    pub jaw_length: f64,
    /// Jaw joint to muscle insertion (mm).
    pub in_lever: f64,
}

impl RunLevers {
    /// Measure jaw length and in-lever.
    ///
    /// Fails with [`HomodontyError::ZeroJawLength`] when joint and tip
    /// coincide, since every relative position divides by jaw length.
    pub fn measure(landmarks: &Landmarks) -> Result<Self> {
        let jaw_length = distance(&landmarks.jaw_joint, &landmarks.jaw_tip);
        if Tolerance::DEFAULT.is_zero(jaw_length) {
            return Err(HomodontyError::ZeroJawLength);
        }
        Ok(Self {
            jaw_length,
            in_lever: distance(&landmarks.jaw_joint, &landmarks.muscle_insertion),
        })
    }

    /// Out-lever as a fraction of jaw length.
    pub fn position_ratio(&self, out_lever: f64) -> f64 {
        out_lever / self.jaw_length
    }
}

/// Tip location and out-lever of one tooth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToothLever {
    /// Tip point on the tooth surface.
    pub tip_point: Point3,
    /// Jaw joint to tip (mm).
    pub out_lever: f64,
}

/// Estimate a tooth's tip, snap it onto the surface and measure its out-lever.
///
/// `segment` only names the tooth in errors.
pub fn measure_tooth(
    segment: &str,
    surface: &WorldMesh,
    obb: &OrientedBox,
    jaw_joint: &Point3,
    position_flag: bool,
) -> Result<ToothLever> {
    let candidate = estimate_tip(obb, position_flag);
    let tip_point = surface
        .closest_point(&candidate)
        .map_err(|_| HomodontyError::DegenerateMesh {
            segment: segment.to_string(),
        })?;
    Ok(ToothLever {
        tip_point,
        out_lever: distance(jaw_joint, &tip_point),
    })
}
