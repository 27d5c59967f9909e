//! Run-scoped parameters.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{HomodontyError, Result};

/// Species text that counts as "no species entered".
pub const SPECIES_PLACEHOLDER: &str = "Enter species name";

/// Which jaw the teeth belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JawSide {
    /// Not recorded; the jaw id column is omitted.
    #[default]
    None,
    /// Lower jaw (mandible).
    Lower,
    /// Upper jaw.
    Upper,
}

impl JawSide {
    /// Table label, or `None` when the column is omitted.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Lower => Some("Lower Jaw"),
            Self::Upper => Some("Upper Jaw"),
        }
    }
}

/// Which side of the face the jaw is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    /// Not recorded; the side column is omitted.
    #[default]
    None,
    /// Left side.
    Left,
    /// Right side.
    Right,
}

impl FaceSide {
    /// Table label, or `None` when the column is omitted.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("Left"),
            Self::Right => Some("Right"),
        }
    }
}

/// Immutable configuration for one run.
///
/// Passed explicitly into [`compute_homodonty`](crate::compute_homodonty);
/// nothing in a run reads ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Force exerted by the jaw-closing muscles (N).
    pub muscle_force: f64,
    /// Species label for the table.
    pub species: Option<String>,
    /// Jaw id metadata.
    pub jaw_side: JawSide,
    /// Face side metadata.
    pub face_side: FaceSide,
    /// Selects the other half of the bounding box along its up axis.
    pub position_flag: bool,
    /// Add the `Rel Position` column.
    pub include_relative_position: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            muscle_force: 1.0,
            species: None,
            jaw_side: JawSide::None,
            face_side: FaceSide::None,
            position_flag: false,
            include_relative_position: false,
        }
    }
}

impl RunSettings {
    /// Parse settings from TOML; missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.muscle_force.is_finite() || self.muscle_force < 0.0 {
            return Err(HomodontyError::InvalidInput(format!(
                "muscle force must be a finite non-negative number, got {}",
                self.muscle_force
            )));
        }
        Ok(())
    }

    /// Species to report, verbatim; `None` for empty text or the placeholder.
    pub fn species_label(&self) -> Option<&str> {
        match self.species.as_deref() {
            None | Some("") => None,
            Some(SPECIES_PLACEHOLDER) => {
                warn!("species left at placeholder text; omitting species column");
                None
            }
            Some(species) => Some(species),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RunSettings::default();
        assert_eq!(settings.muscle_force, 1.0);
        assert!(!settings.position_flag);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_species_placeholder_is_absent() {
        let mut settings = RunSettings::default();
        assert_eq!(settings.species_label(), None);
        settings.species = Some(String::new());
        assert_eq!(settings.species_label(), None);
        settings.species = Some(SPECIES_PLACEHOLDER.into());
        assert_eq!(settings.species_label(), None);
        settings.species = Some("Piranha natteri".into());
        assert_eq!(settings.species_label(), Some("Piranha natteri"));
    }

    #[test]
    fn test_species_reported_verbatim() {
        let mut settings = RunSettings {
            species: Some(" Esox ".into()),
            ..Default::default()
        };
        assert_eq!(settings.species_label(), Some(" Esox "));
        settings.species = Some(format!(" {SPECIES_PLACEHOLDER}"));
        assert_eq!(settings.species_label(), Some(" Enter species name"));
    }

    #[test]
    fn test_side_labels() {
        assert_eq!(JawSide::None.label(), None);
        assert_eq!(JawSide::Lower.label(), Some("Lower Jaw"));
        assert_eq!(JawSide::Upper.label(), Some("Upper Jaw"));
        assert_eq!(FaceSide::None.label(), None);
        assert_eq!(FaceSide::Left.label(), Some("Left"));
        assert_eq!(FaceSide::Right.label(), Some("Right"));
    }

    #[test]
    fn test_invalid_force() {
        for force in [-1.0, f64::NAN, f64::INFINITY] {
            let settings = RunSettings {
                muscle_force: force,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(HomodontyError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = RunSettings::from_toml(
            r#"
            muscle_force = 12.5
            species = "Serrasalmus"
            jaw_side = "lower"
            position_flag = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.muscle_force, 12.5);
        assert_eq!(settings.jaw_side, JawSide::Lower);
        assert_eq!(settings.face_side, FaceSide::None);
        assert!(settings.position_flag);
        assert!(!settings.include_relative_position);
    }

    #[test]
    fn test_from_toml_rejects_unknown_side() {
        let err = RunSettings::from_toml("face_side = \"middle\"").unwrap_err();
        assert!(matches!(err, HomodontyError::Settings(_)));
    }
}
