// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines beam modifiers: grids, diffusers, softboxes and other accessories.
//!
//! A [`Modifier`] is immutable once built. Its constructor validates the
//! attenuation and shaping values, so every modifier that reaches a light
//! instance is physically meaningful.

use crate::error::PhotometricError;
use crate::photometry::MAX_BEAM_ANGLE_DEGREES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The family a modifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    /// A honeycomb grid that narrows the beam to a fixed angle.
    Grid,
    /// A diffusion layer that widens the beam.
    Diffuser,
    /// A softbox that replaces the beam with a soft, fixed-angle source.
    Softbox,
    /// Any other accessory. Attenuates but never shapes.
    Other,
}

impl ModifierKind {
    /// Parses the `type` string of a modifier record.
    ///
    /// Unknown strings map to [`ModifierKind::Other`].
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "grid" => ModifierKind::Grid,
            "diffuser" => ModifierKind::Diffuser,
            "softbox" => ModifierKind::Softbox,
            _ => ModifierKind::Other,
        }
    }

    /// The lowercase type name used in records and listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::Grid => "grid",
            ModifierKind::Diffuser => "diffuser",
            ModifierKind::Softbox => "softbox",
            ModifierKind::Other => "other",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The kind-specific shaping fields of a modifier.
///
/// Optional fields fall back to the defaults in [`crate::photometry`] when the
/// modifier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModifierShape {
    /// Overrides the beam angle and sets the edge falloff.
    Grid {
        /// The beam angle leaving the grid. Falls back to the light's base angle.
        output_beam_angle_degrees: Option<f32>,
        /// Softness of the cutoff edge.
        edge_falloff: Option<f32>,
    },
    /// Widens the base beam angle additively.
    Diffuser {
        /// Degrees added to the light's base beam angle.
        beam_angle_modifier_degrees: f32,
        /// Softness of the cutoff edge.
        softness: Option<f32>,
    },
    /// Replaces the beam with the softbox's own spread.
    Softbox {
        /// The beam angle leaving the softbox.
        output_beam_angle_degrees: Option<f32>,
        /// Softness of the cutoff edge.
        softness: Option<f32>,
    },
    /// No shaping.
    Other,
}

impl ModifierShape {
    /// The kind this shape belongs to.
    pub fn kind(&self) -> ModifierKind {
        match self {
            ModifierShape::Grid { .. } => ModifierKind::Grid,
            ModifierShape::Diffuser { .. } => ModifierKind::Diffuser,
            ModifierShape::Softbox { .. } => ModifierKind::Softbox,
            ModifierShape::Other => ModifierKind::Other,
        }
    }

    fn validate(&self) -> Result<(), PhotometricError> {
        match *self {
            ModifierShape::Grid {
                output_beam_angle_degrees,
                edge_falloff,
            } => {
                check_angle("output_beam_angle_degrees", output_beam_angle_degrees)?;
                check_blend("edge_falloff", edge_falloff)
            }
            ModifierShape::Diffuser {
                beam_angle_modifier_degrees,
                softness,
            } => {
                if !beam_angle_modifier_degrees.is_finite() {
                    return Err(PhotometricError::invalid(
                        "beam_angle_modifier_degrees",
                        beam_angle_modifier_degrees,
                        "must be finite",
                    ));
                }
                check_blend("softness", softness)
            }
            ModifierShape::Softbox {
                output_beam_angle_degrees,
                softness,
            } => {
                check_angle("output_beam_angle_degrees", output_beam_angle_degrees)?;
                check_blend("softness", softness)
            }
            ModifierShape::Other => Ok(()),
        }
    }
}

fn check_angle(field: &'static str, value: Option<f32>) -> Result<(), PhotometricError> {
    match value {
        Some(angle) if !angle.is_finite() || angle <= 0.0 || angle > MAX_BEAM_ANGLE_DEGREES => {
            Err(PhotometricError::invalid(field, angle, "must be in (0, 180]"))
        }
        _ => Ok(()),
    }
}

fn check_blend(field: &'static str, value: Option<f32>) -> Result<(), PhotometricError> {
    match value {
        Some(blend) if !(0.0..=1.0).contains(&blend) => {
            Err(PhotometricError::invalid(field, blend, "must be in [0, 1]"))
        }
        _ => Ok(()),
    }
}

/// A named, immutable beam modifier.
///
/// # Examples
///
/// ```
/// use simstudio_core::{Modifier, ModifierKind, ModifierShape};
///
/// let grid = Modifier::new(
///     "Grid 40",
///     20.0,
///     ModifierShape::Grid {
///         output_beam_angle_degrees: Some(40.0),
///         edge_falloff: None,
///     },
/// )
/// .unwrap();
/// assert_eq!(grid.kind(), ModifierKind::Grid);
/// assert_eq!(grid.light_loss_percent(), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModifierRecord")]
pub struct Modifier {
    name: String,
    description: Option<String>,
    light_loss_percent: f32,
    shape: ModifierShape,
}

#[derive(Deserialize)]
struct ModifierRecord {
    name: String,
    description: Option<String>,
    light_loss_percent: f32,
    shape: ModifierShape,
}

impl TryFrom<ModifierRecord> for Modifier {
    type Error = PhotometricError;

    fn try_from(record: ModifierRecord) -> Result<Self, Self::Error> {
        let modifier = Modifier::new(record.name, record.light_loss_percent, record.shape)?;
        Ok(match record.description {
            Some(description) => modifier.with_description(description),
            None => modifier,
        })
    }
}

impl Modifier {
    /// Builds a modifier, validating its attenuation and shaping values.
    ///
    /// # Errors
    /// Returns [`PhotometricError::InvalidSpec`] when `light_loss_percent` is
    /// outside `[0, 100]`, an output angle is outside `(0, 180]`, or a
    /// softness value is outside `[0, 1]`.
    pub fn new(
        name: impl Into<String>,
        light_loss_percent: f32,
        shape: ModifierShape,
    ) -> Result<Self, PhotometricError> {
        if !(0.0..=100.0).contains(&light_loss_percent) {
            return Err(PhotometricError::invalid(
                "light_loss_percent",
                light_loss_percent,
                "must be in [0, 100]",
            ));
        }
        shape.validate()?;

        Ok(Self {
            name: name.into(),
            description: None,
            light_loss_percent,
            shape,
        })
    }

    /// Attaches a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The name identifying this modifier in stacks and listings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// An optional human-readable description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The percentage of light absorbed by this modifier, in `[0, 100]`.
    pub fn light_loss_percent(&self) -> f32 {
        self.light_loss_percent
    }

    /// The kind-specific shaping fields.
    pub fn shape(&self) -> &ModifierShape {
        &self.shape
    }

    /// The family this modifier belongs to.
    pub fn kind(&self) -> ModifierKind {
        self.shape.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_name() {
        assert_eq!(ModifierKind::from_type_name("grid"), ModifierKind::Grid);
        assert_eq!(
            ModifierKind::from_type_name("diffuser"),
            ModifierKind::Diffuser
        );
        assert_eq!(
            ModifierKind::from_type_name("softbox"),
            ModifierKind::Softbox
        );
        assert_eq!(ModifierKind::from_type_name("snoot"), ModifierKind::Other);
        // Matching is case-sensitive, like the records themselves.
        assert_eq!(ModifierKind::from_type_name("Grid"), ModifierKind::Other);
    }

    #[test]
    fn test_loss_out_of_range_rejected() {
        for loss in [-0.5, 100.5, f32::NAN] {
            let result = Modifier::new("Bad", loss, ModifierShape::Other);
            assert!(result.is_err(), "loss {loss} should be rejected");
        }
        assert!(Modifier::new("Opaque", 100.0, ModifierShape::Other).is_ok());
        assert!(Modifier::new("Clear", 0.0, ModifierShape::Other).is_ok());
    }

    #[test]
    fn test_shape_validation() {
        let wide_grid = Modifier::new(
            "Grid",
            10.0,
            ModifierShape::Grid {
                output_beam_angle_degrees: Some(200.0),
                edge_falloff: None,
            },
        );
        assert!(matches!(
            wide_grid,
            Err(PhotometricError::InvalidSpec {
                field: "output_beam_angle_degrees",
                ..
            })
        ));

        let hard_softbox = Modifier::new(
            "Softbox",
            30.0,
            ModifierShape::Softbox {
                output_beam_angle_degrees: Some(90.0),
                softness: Some(1.5),
            },
        );
        assert!(hard_softbox.is_err());
    }

    #[test]
    fn test_kind_follows_shape() {
        let diffuser = Modifier::new(
            "Diffusion 1/2",
            15.0,
            ModifierShape::Diffuser {
                beam_angle_modifier_degrees: 30.0,
                softness: None,
            },
        )
        .unwrap()
        .with_description("Half-stop diffusion");

        assert_eq!(diffuser.kind(), ModifierKind::Diffuser);
        assert_eq!(diffuser.name(), "Diffusion 1/2");
        assert_eq!(diffuser.description(), Some("Half-stop diffusion"));
        assert_eq!(diffuser.kind().to_string(), "diffuser");
    }

    #[test]
    fn test_deserialized_modifier_is_validated() {
        let grid = Modifier::new(
            "Grid 40",
            20.0,
            ModifierShape::Grid {
                output_beam_angle_degrees: Some(40.0),
                edge_falloff: Some(0.5),
            },
        )
        .unwrap()
        .with_description("40 degree honeycomb");

        let mut value = serde_json::to_value(&grid).unwrap();
        let restored: Modifier = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, grid);

        value["light_loss_percent"] = serde_json::json!(140.0);
        let err = serde_json::from_value::<Modifier>(value).unwrap_err();
        assert!(err.to_string().contains("light_loss_percent"));
    }
}
