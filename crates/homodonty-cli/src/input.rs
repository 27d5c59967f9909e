//! JSON run descriptions.

use anyhow::{Context, Result};
use homodonty::{Landmark, Landmarks, OrientedBox, RunSettings, Segment};
use homodonty_mesh::ModelSurface;
use serde::Deserialize;

/// Landmarks either as role-tagged points or as a named triple.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LandmarkInput {
    /// `[{"role": "JawJoint", "point": [x, y, z]}, ...]`
    Tagged(Vec<Landmark>),
    /// `{"jaw_joint": [..], "jaw_tip": [..], "muscle_insertion": [..]}`
    Named(Landmarks),
}

impl LandmarkInput {
    pub fn resolve(&self) -> homodonty::Result<Landmarks> {
        match self {
            Self::Tagged(points) => Landmarks::from_tagged(points),
            Self::Named(landmarks) => Ok(*landmarks),
        }
    }
}

/// One tooth as exported by the segmentation side.
#[derive(Debug, Deserialize)]
pub struct SegmentInput {
    pub id: String,
    pub name: String,
    pub surface: ModelSurface,
    /// Filled from the surface when absent.
    #[serde(default)]
    pub area_mm2: Option<f64>,
    pub obb: OrientedBox,
}

impl SegmentInput {
    pub fn into_segment(self) -> Result<Segment> {
        let surface = self
            .surface
            .resolve()
            .with_context(|| format!("segment {} has an invalid surface", self.name))?;
        let area = self.area_mm2.unwrap_or_else(|| surface.surface_area());
        Ok(Segment::new(self.id, self.name, surface, area, self.obb))
    }
}

/// A complete run description.
#[derive(Debug, Deserialize)]
pub struct RunInput {
    pub landmarks: LandmarkInput,
    pub segments: Vec<SegmentInput>,
    #[serde(default)]
    pub settings: Option<RunSettings>,
}

impl RunInput {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse run description")
    }

    /// Split into core inputs; segment order is kept.
    pub fn into_parts(self) -> Result<(Vec<Segment>, Landmarks, Option<RunSettings>)> {
        let landmarks = self.landmarks.resolve()?;
        let segments = self
            .segments
            .into_iter()
            .map(SegmentInput::into_segment)
            .collect::<Result<Vec<_>>>()?;
        Ok((segments, landmarks, self.settings))
    }
}
