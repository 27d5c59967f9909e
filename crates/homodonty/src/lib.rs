#![warn(missing_docs)]

//! Functional homodonty: per-tooth lever mechanics.
//!
//! Given tooth segments (world-frame surface, area, oriented bounding
//! box) and three landmarks (jaw joint, jaw tip, muscle insertion), a
//! run estimates each tooth's tip, snaps it onto the tooth surface and
//! derives out-lever, mechanical advantage, bite force and stress.
//!
//! # Example
//!
//! ```
//! use homodonty::{compute_homodonty, Landmarks, OrientedBox, RunSettings, Segment};
//! use homodonty_math::Point3;
//! use homodonty_mesh::TriangleMesh;
//!
//! let surface = TriangleMesh::axis_box(Point3::new(8.0, 0.0, 0.0), Point3::new(10.0, 2.0, 2.0))
//!     .assume_world()
//!     .unwrap();
//! let obb = OrientedBox::axis_aligned(Point3::new(8.0, 0.0, 0.0), [2.0, 2.0, 2.0]);
//! let tooth = Segment::new("Segment_1", "incisor", surface, 4.0, obb);
//!
//! let landmarks = Landmarks::new(
//!     Point3::origin(),
//!     Point3::new(10.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//! );
//! let report = compute_homodonty(&[tooth], &landmarks, &RunSettings::default()).unwrap();
//!
//! assert_eq!(report.rows.len(), 1);
//! assert_eq!(report.levers.jaw_length, 10.0);
//! ```

pub mod error;
pub mod lever;
pub mod metrics;
pub mod segment;
pub mod settings;
pub mod table;
pub mod tip;

pub use error::{HomodontyError, Result};
pub use lever::{measure_tooth, RunLevers, ToothLever};
pub use segment::{Landmark, LandmarkRole, Landmarks, OrientedBox, Segment};
pub use settings::{FaceSide, JawSide, RunSettings, SPECIES_PLACEHOLDER};
pub use table::{Column, ColumnData, ColumnLayout, ResultRow, ResultTable};
pub use tip::{estimate_tip, TipEstimator};

use homodonty_math::{distance, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Derived measurements of one tooth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToothMeasurement {
    /// Tip point on the tooth surface.
    pub tip_point: Point3,
    /// Jaw joint to tip (mm).
    pub out_lever: f64,
    /// Out-lever over jaw length.
    pub position_ratio: f64,
    /// In-lever over out-lever.
    pub mechanical_advantage: f64,
    /// Force at the tooth (N).
    pub tooth_force: f64,
    /// Tooth force over surface area (N/m²).
    pub stress: f64,
}

impl ToothMeasurement {
    /// Derive the metrics for a measured tooth lever.
    pub fn derive(
        segment: &Segment,
        lever: ToothLever,
        levers: &RunLevers,
        muscle_force: f64,
    ) -> Result<Self> {
        let mechanical_advantage = metrics::mechanical_advantage(levers.in_lever, lever.out_lever)
            .ok_or_else(|| HomodontyError::DegenerateLever {
                segment: segment.name.clone(),
            })?;
        let tooth_force = metrics::tooth_force(muscle_force, mechanical_advantage);
        let stress = metrics::stress(tooth_force, segment.area_mm2).ok_or_else(|| {
            HomodontyError::DegenerateArea {
                segment: segment.name.clone(),
                area: segment.area_mm2,
            }
        })?;
        Ok(Self {
            tip_point: lever.tip_point,
            out_lever: lever.out_lever,
            position_ratio: levers.position_ratio(lever.out_lever),
            mechanical_advantage,
            tooth_force,
            stress,
        })
    }
}

/// A labelled line between two scene points, for display sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverLine {
    /// Label (`JawLength`, `InLever` or the tooth name).
    pub label: String,
    /// Start point (always the jaw joint).
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl LeverLine {
    fn new(label: impl Into<String>, start: Point3, end: Point3) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Line length (mm).
    pub fn length(&self) -> f64 {
        distance(&self.start, &self.end)
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomodontyReport {
    /// Run-level lever lengths.
    pub levers: RunLevers,
    /// One row per segment, in segment order.
    pub rows: Vec<ResultRow>,
    /// Columnar form of `rows`.
    pub table: ResultTable,
    /// Jaw length, in-lever and per-tooth out-lever lines.
    pub lines: Vec<LeverLine>,
}

/// Run the lever pipeline over `segments`.
///
/// Jaw length and in-lever are measured once and shared by every row.
/// Any error aborts the run; no partial report is returned.
pub fn compute_homodonty(
    segments: &[Segment],
    landmarks: &Landmarks,
    settings: &RunSettings,
) -> Result<HomodontyReport> {
    settings.validate()?;
    landmarks.validate()?;
    if segments.is_empty() {
        return Err(HomodontyError::NoVisibleSegments);
    }

    let levers = RunLevers::measure(landmarks)?;
    let layout = ColumnLayout::from_settings(settings);

    info!(
        segments = segments.len(),
        jaw_length = levers.jaw_length,
        in_lever = levers.in_lever,
        position_flag = settings.position_flag,
        "Starting homodonty run"
    );

    let mut rows = Vec::with_capacity(segments.len());
    let mut lines = Vec::with_capacity(segments.len() + 2);
    lines.push(LeverLine::new("JawLength", landmarks.jaw_joint, landmarks.jaw_tip));
    lines.push(LeverLine::new("InLever", landmarks.jaw_joint, landmarks.muscle_insertion));

    for segment in segments {
        segment.obb.validate()?;
        let lever = measure_tooth(
            &segment.name,
            &segment.surface,
            &segment.obb,
            &landmarks.jaw_joint,
            settings.position_flag,
        )?;
        let measurement = ToothMeasurement::derive(segment, lever, &levers, settings.muscle_force)?;

        debug!(
            segment = %segment.name,
            tip = ?measurement.tip_point,
            out_lever = measurement.out_lever,
            mechanical_advantage = measurement.mechanical_advantage,
            "Measured tooth"
        );

        lines.push(LeverLine::new(
            segment.name.clone(),
            landmarks.jaw_joint,
            measurement.tip_point,
        ));
        rows.push(ResultRow {
            segment_id: segment.id.clone(),
            tooth_id: segment.name.clone(),
            species: layout.species.clone(),
            jaw_id: layout.jaw_id.map(str::to_string),
            side: layout.side.map(str::to_string),
            jaw_length: levers.jaw_length,
            in_lever: levers.in_lever,
            muscle_force: settings.muscle_force,
            area_mm2: segment.area_mm2,
            measurement,
        });
    }

    let table = ResultTable::assemble(&rows, &layout)?;

    info!(rows = rows.len(), "Homodonty run complete");

    Ok(HomodontyReport {
        levers,
        rows,
        table,
        lines,
    })
}
