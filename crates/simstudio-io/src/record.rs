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

//! The persisted preset record format.
//!
//! Presets are stored one per JSON file. A light record looks like:
//!
//! ```json
//! {
//!   "name": "COB 300D",
//!   "description": "300W daylight COB",
//!   "specs": { "lumens": 26000, "beam_angle_deg": 55, "cct_kelvin": 5600, "power_watts": 300 }
//! }
//! ```
//!
//! and a modifier record like:
//!
//! ```json
//! {
//!   "name": "Softbox 90",
//!   "type": "softbox",
//!   "specs": { "light_loss_percent": 30, "output_beam_angle_deg": 90, "softness": 0.75 }
//! }
//! ```
//!
//! Missing numeric fields take the engine defaults. A missing `name` falls
//! back to the file stem. A record without `specs` is malformed.

use serde::Deserialize;
use simstudio_core::spec::{
    DEFAULT_BEAM_ANGLE_DEGREES, DEFAULT_COLOR_TEMPERATURE_KELVIN, DEFAULT_LUMENS,
    DEFAULT_POWER_WATTS,
};
use simstudio_core::{LightSpec, Modifier, ModifierKind, ModifierShape, PhotometricError};
use std::fmt;
use thiserror::Error;

/// The two preset families kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCategory {
    /// Light fixtures.
    Light,
    /// Beam modifiers.
    Modifier,
}

impl PresetCategory {
    /// The sub-directory holding this category's records.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PresetCategory::Light => "lights",
            PresetCategory::Modifier => "modifiers",
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetCategory::Light => f.write_str("light"),
            PresetCategory::Modifier => f.write_str("modifier"),
        }
    }
}

/// One unparsed record as read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Where the record came from, usually its file name.
    pub origin: String,
    /// The JSON text.
    pub contents: String,
}

impl RawRecord {
    /// Creates a record from its origin and JSON text.
    pub fn new(origin: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            contents: contents.into(),
        }
    }

    /// The origin without its `.json` extension.
    ///
    /// Records without a `name` are listed under their stem, so `grid_40.json`
    /// is looked up as `grid_40`, not by its full file name.
    pub fn stem(&self) -> &str {
        self.origin
            .strip_suffix(".json")
            .unwrap_or(self.origin.as_str())
    }
}

/// Why a record could not be turned into a preset.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The text is not valid JSON for the record schema.
    #[error("invalid preset JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The record has no `specs` section.
    #[error("record has no 'specs' section")]
    MissingSpecs,
    /// A value in `specs` is out of its physical range.
    #[error(transparent)]
    Invalid(#[from] PhotometricError),
}

/// A light preset ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LightPreset {
    /// Display name, unique key for lookups.
    pub name: String,
    /// The record's file stem.
    pub file_stem: String,
    /// Optional description.
    pub description: Option<String>,
    /// The fully-populated spec.
    pub spec: LightSpec,
}

/// A modifier preset ready to be stacked.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierPreset {
    /// Display name, unique key for lookups.
    pub name: String,
    /// The record's file stem.
    pub file_stem: String,
    /// The validated modifier.
    pub modifier: Modifier,
}

impl ModifierPreset {
    /// The modifier's family.
    pub fn kind(&self) -> ModifierKind {
        self.modifier.kind()
    }
}

#[derive(Debug, Deserialize)]
struct LightRecord {
    name: Option<String>,
    description: Option<String>,
    specs: Option<LightSpecsRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct LightSpecsRecord {
    lumens: Option<f32>,
    beam_angle_deg: Option<f32>,
    cct_kelvin: Option<f32>,
    power_watts: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ModifierRecord {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    specs: Option<ModifierSpecsRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ModifierSpecsRecord {
    light_loss_percent: Option<f32>,
    output_beam_angle_deg: Option<f32>,
    edge_falloff: Option<f32>,
    beam_angle_modifier_deg: Option<f32>,
    softness: Option<f32>,
}

/// Parses a light record into a validated preset.
pub fn parse_light(raw: &RawRecord) -> Result<LightPreset, RecordError> {
    let record: LightRecord = serde_json::from_str(&raw.contents)?;
    let specs = record.specs.ok_or(RecordError::MissingSpecs)?;

    let spec = LightSpec {
        base_lumens: specs.lumens.unwrap_or(DEFAULT_LUMENS),
        base_beam_angle_degrees: specs.beam_angle_deg.unwrap_or(DEFAULT_BEAM_ANGLE_DEGREES),
        color_temperature_kelvin: specs
            .cct_kelvin
            .unwrap_or(DEFAULT_COLOR_TEMPERATURE_KELVIN),
        power_watts: specs.power_watts.unwrap_or(DEFAULT_POWER_WATTS),
    };
    spec.validate()?;

    Ok(LightPreset {
        name: record.name.unwrap_or_else(|| raw.stem().to_string()),
        file_stem: raw.stem().to_string(),
        description: record.description,
        spec,
    })
}

/// Parses a modifier record into a validated preset.
pub fn parse_modifier(raw: &RawRecord) -> Result<ModifierPreset, RecordError> {
    let record: ModifierRecord = serde_json::from_str(&raw.contents)?;
    let specs = record.specs.ok_or(RecordError::MissingSpecs)?;
    let kind = record
        .kind
        .as_deref()
        .map(ModifierKind::from_type_name)
        .unwrap_or(ModifierKind::Other);

    let shape = match kind {
        ModifierKind::Grid => ModifierShape::Grid {
            output_beam_angle_degrees: specs.output_beam_angle_deg,
            edge_falloff: specs.edge_falloff,
        },
        ModifierKind::Diffuser => ModifierShape::Diffuser {
            beam_angle_modifier_degrees: specs.beam_angle_modifier_deg.unwrap_or(0.0),
            softness: specs.softness,
        },
        ModifierKind::Softbox => ModifierShape::Softbox {
            output_beam_angle_degrees: specs.output_beam_angle_deg,
            softness: specs.softness,
        },
        ModifierKind::Other => ModifierShape::Other,
    };

    let name = record.name.unwrap_or_else(|| raw.stem().to_string());
    let mut modifier = Modifier::new(name.clone(), specs.light_loss_percent.unwrap_or(0.0), shape)?;
    if let Some(description) = record.description {
        modifier = modifier.with_description(description);
    }

    Ok(ModifierPreset {
        name,
        file_stem: raw.stem().to_string(),
        modifier,
    })
}
