//! Columnar result table.
//!
//! One row per tooth, in segment order. Metadata columns (species, jaw
//! id, side) are only present when the run supplied them.

use homodonty_math::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{HomodontyError, Result};
use crate::settings::RunSettings;
use crate::ToothMeasurement;

/// Per-tooth output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Segment id.
    pub segment_id: String,
    /// Segment display name.
    pub tooth_id: String,
    /// Species label, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Jaw id label, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jaw_id: Option<String>,
    /// Face side label, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Jaw length (mm), same for every row of a run.
    pub jaw_length: f64,
    /// In-lever (mm), same for every row of a run.
    pub in_lever: f64,
    /// Muscle force (N).
    pub muscle_force: f64,
    /// Tooth surface area (mm²).
    pub area_mm2: f64,
    /// Tooth measurement.
    #[serde(flatten)]
    pub measurement: ToothMeasurement,
}

impl ResultRow {
    /// Distance from jaw joint to tooth tip (mm).
    pub fn position(&self) -> f64 {
        self.measurement.out_lever
    }

    /// Tip point on the tooth surface.
    pub fn tip_point(&self) -> Point3 {
        self.measurement.tip_point
    }
}

/// Which optional columns a run reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Species label.
    pub species: Option<String>,
    /// Jaw id label.
    pub jaw_id: Option<&'static str>,
    /// Face side label.
    pub side: Option<&'static str>,
    /// Include the relative position column.
    pub relative_position: bool,
}

impl ColumnLayout {
    /// Layout for a run's settings.
    pub fn from_settings(settings: &RunSettings) -> Self {
        Self {
            species: settings.species_label().map(str::to_string),
            jaw_id: settings.jaw_side.label(),
            side: settings.face_side.label(),
            relative_position: settings.include_relative_position,
        }
    }
}

/// Cell values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    /// Text cells.
    Text(Vec<String>),
    /// Numeric cells.
    Number(Vec<f64>),
}

impl ColumnData {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Number(v) => v.len(),
        }
    }

    /// Whether the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, described column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Header name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Unit label, when the quantity has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Cells.
    pub data: ColumnData,
}

impl Column {
    fn text(name: &str, description: &str, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit: None,
            data: ColumnData::Text(values),
        }
    }

    fn number(name: &str, description: &str, unit: Option<&str>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit: unit.map(str::to_string),
            data: ColumnData::Number(values),
        }
    }

    fn cell(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Text(v) => v[row].clone(),
            ColumnData::Number(v) => v[row].to_string(),
        }
    }
}

/// Column names, in output order.
pub mod names {
    /// Species.
    pub const SPECIES: &str = "Species";
    /// Upper/lower jaw.
    pub const JAW_ID: &str = "Jaw ID";
    /// Left/right side.
    pub const SIDE: &str = "Side of Face";
    /// Jaw length.
    pub const JAW_LENGTH: &str = "Jaw Length";
    /// Segment name.
    pub const TOOTH_ID: &str = "Tooth ID";
    /// Out-lever.
    pub const POSITION: &str = "Position";
    /// Out-lever over jaw length.
    pub const REL_POSITION: &str = "Rel Position";
    /// Surface area.
    pub const SURFACE_AREA: &str = "Surface Area (mm^2)";
    /// Mechanical advantage.
    pub const MECH_ADV: &str = "Mechanical Advantage";
    /// Tooth force.
    pub const TOOTH_FORCE: &str = "F-Tooth (N)";
    /// Stress.
    pub const STRESS: &str = "Stress (N/m^2)";
}

/// Columnar table of a run's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Columns in output order.
    pub columns: Vec<Column>,
}

impl ResultTable {
    /// Assemble the table from rows, keeping row order.
    pub fn assemble(rows: &[ResultRow], layout: &ColumnLayout) -> Result<Self> {
        if rows.is_empty() {
            return Err(HomodontyError::NoVisibleSegments);
        }

        let mut columns = Vec::with_capacity(11);
        if layout.species.is_some() {
            columns.push(Column::text(
                names::SPECIES,
                "Species",
                text_cells(rows, |r| r.species.as_ref()),
            ));
        }
        if layout.jaw_id.is_some() {
            columns.push(Column::text(
                names::JAW_ID,
                "If upper or lower jaw",
                text_cells(rows, |r| r.jaw_id.as_ref()),
            ));
        }
        if layout.side.is_some() {
            columns.push(Column::text(
                names::SIDE,
                "Side of face that the jaw is on",
                text_cells(rows, |r| r.side.as_ref()),
            ));
        }
        columns.push(Column::number(
            names::JAW_LENGTH,
            "Jaw Length",
            Some("mm"),
            number_cells(rows, |r| r.jaw_length),
        ));
        columns.push(Column::text(
            names::TOOTH_ID,
            "Tooth segment name",
            rows.iter().map(|r| r.tooth_id.clone()).collect(),
        ));
        columns.push(Column::number(
            names::POSITION,
            "Distance between the jaw joint and the tooth",
            Some("mm"),
            number_cells(rows, |r| r.measurement.out_lever),
        ));
        if layout.relative_position {
            columns.push(Column::number(
                names::REL_POSITION,
                "Relative position of the tooth",
                None,
                number_cells(rows, |r| r.measurement.position_ratio),
            ));
        }
        columns.push(Column::number(
            names::SURFACE_AREA,
            "Tooth surface area",
            Some("mm^2"),
            number_cells(rows, |r| r.area_mm2),
        ));
        columns.push(Column::number(
            names::MECH_ADV,
            "Tooth mechanical advantage",
            None,
            number_cells(rows, |r| r.measurement.mechanical_advantage),
        ));
        columns.push(Column::number(
            names::TOOTH_FORCE,
            "The force acting on a tooth (muscle force * mechanical advantage)",
            Some("N"),
            number_cells(rows, |r| r.measurement.tooth_force),
        ));
        columns.push(Column::number(
            names::STRESS,
            "Tooth stress (tooth force / surface area)",
            Some("N/m^2"),
            number_cells(rows, |r| r.measurement.stress),
        ));

        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render as CSV with a header row.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(self.column_names())?;
        for row in 0..self.num_rows() {
            wtr.write_record(self.columns.iter().map(|c| c.cell(row)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| HomodontyError::Table(e.error().to_string()))?;
        String::from_utf8(bytes).map_err(|e| HomodontyError::Table(e.to_string()))
    }
}

fn text_cells(rows: &[ResultRow], f: fn(&ResultRow) -> Option<&String>) -> Vec<String> {
    rows.iter().map(|r| f(r).cloned().unwrap_or_default()).collect()
}

fn number_cells(rows: &[ResultRow], f: fn(&ResultRow) -> f64) -> Vec<f64> {
    rows.iter().map(f).collect()
}
