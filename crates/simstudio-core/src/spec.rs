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

//! Defines the physical identity of a studio light.
//!
//! A [`LightSpec`] is the manufacturer-rated description of a fixture, as read
//! from a light preset. It is applied to a light instance as a whole: applying
//! a new preset overwrites every field, it never merges.

use crate::error::PhotometricError;
use crate::photometry::MAX_BEAM_ANGLE_DEGREES;
use serde::{Deserialize, Serialize};

/// Rated output used when a preset does not specify one.
pub const DEFAULT_LUMENS: f32 = 12000.0;
/// Native beam spread used when a preset does not specify one.
pub const DEFAULT_BEAM_ANGLE_DEGREES: f32 = 120.0;
/// Color temperature used when a preset does not specify one.
pub const DEFAULT_COLOR_TEMPERATURE_KELVIN: f32 = 5600.0;
/// Nameplate electrical draw used when a preset does not specify one.
pub const DEFAULT_POWER_WATTS: f32 = 200.0;

/// The physical identity of a light, as rated by its manufacturer.
///
/// # Examples
///
/// ```
/// use simstudio_core::LightSpec;
///
/// // A 5600K COB fixture with a 55 degree reflector.
/// let spec = LightSpec {
///     base_lumens: 26000.0,
///     base_beam_angle_degrees: 55.0,
///     ..Default::default()
/// };
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LightSpecRecord")]
pub struct LightSpec {
    /// Manufacturer-rated output in lumens. Must be `>= 0`.
    pub base_lumens: f32,

    /// Native beam spread in degrees, in `(0, 180]`.
    pub base_beam_angle_degrees: f32,

    /// Correlated color temperature in Kelvin. Must be `> 0`.
    pub color_temperature_kelvin: f32,

    /// Nameplate electrical draw in watts. Informational only.
    pub power_watts: f32,
}

#[derive(Deserialize)]
struct LightSpecRecord {
    base_lumens: f32,
    base_beam_angle_degrees: f32,
    color_temperature_kelvin: f32,
    power_watts: f32,
}

impl TryFrom<LightSpecRecord> for LightSpec {
    type Error = PhotometricError;

    fn try_from(record: LightSpecRecord) -> Result<Self, Self::Error> {
        let spec = LightSpec {
            base_lumens: record.base_lumens,
            base_beam_angle_degrees: record.base_beam_angle_degrees,
            color_temperature_kelvin: record.color_temperature_kelvin,
            power_watts: record.power_watts,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl Default for LightSpec {
    fn default() -> Self {
        Self {
            base_lumens: DEFAULT_LUMENS,
            base_beam_angle_degrees: DEFAULT_BEAM_ANGLE_DEGREES,
            color_temperature_kelvin: DEFAULT_COLOR_TEMPERATURE_KELVIN,
            power_watts: DEFAULT_POWER_WATTS,
        }
    }
}

impl LightSpec {
    /// Checks every field against its physical range.
    ///
    /// # Errors
    /// Returns [`PhotometricError::InvalidSpec`] naming the first field that is
    /// non-finite or out of range.
    pub fn validate(&self) -> Result<(), PhotometricError> {
        if !self.base_lumens.is_finite() || self.base_lumens < 0.0 {
            return Err(PhotometricError::invalid(
                "base_lumens",
                self.base_lumens,
                "must be a finite value >= 0",
            ));
        }

        let angle = self.base_beam_angle_degrees;
        if !angle.is_finite() || angle <= 0.0 || angle > MAX_BEAM_ANGLE_DEGREES {
            return Err(PhotometricError::invalid(
                "base_beam_angle_degrees",
                angle,
                "must be in (0, 180]",
            ));
        }

        if !self.color_temperature_kelvin.is_finite() || self.color_temperature_kelvin <= 0.0 {
            return Err(PhotometricError::invalid(
                "color_temperature_kelvin",
                self.color_temperature_kelvin,
                "must be a finite value > 0",
            ));
        }

        if !self.power_watts.is_finite() || self.power_watts < 0.0 {
            return Err(PhotometricError::invalid(
                "power_watts",
                self.power_watts,
                "must be a finite value >= 0",
            ));
        }

        Ok(())
    }
}
