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

//! Electrical-to-photometric conversion by emitter technology.

use crate::spec::LightSpec;
use serde::{Deserialize, Serialize};

/// The light-producing technology of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmitterTechnology {
    /// Xenon flash tube.
    #[default]
    Flash,
    /// LED, including COB panels.
    Led,
    /// Tungsten-halogen lamp.
    Tungsten,
}

impl EmitterTechnology {
    /// Approximate luminous efficacy in lumens per watt.
    pub fn luminous_efficacy(&self) -> f32 {
        match self {
            EmitterTechnology::Flash => 35.0,
            EmitterTechnology::Led => 90.0,
            EmitterTechnology::Tungsten => 15.0,
        }
    }
}

/// Converts electrical watts to lumens for the given technology.
pub fn watts_to_lumens(watts: f32, technology: EmitterTechnology) -> f32 {
    watts * technology.luminous_efficacy()
}

impl LightSpec {
    /// Builds a spec rated from its electrical draw.
    ///
    /// Beam angle and color temperature take their defaults.
    pub fn from_wattage(watts: f32, technology: EmitterTechnology) -> Self {
        Self {
            base_lumens: watts_to_lumens(watts, technology),
            power_watts: watts,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficacy_table() {
        assert_eq!(watts_to_lumens(100.0, EmitterTechnology::Flash), 3500.0);
        assert_eq!(watts_to_lumens(100.0, EmitterTechnology::Led), 9000.0);
        assert_eq!(watts_to_lumens(100.0, EmitterTechnology::Tungsten), 1500.0);
    }

    #[test]
    fn test_spec_from_wattage() {
        let spec = LightSpec::from_wattage(200.0, EmitterTechnology::Led);
        assert_eq!(spec.base_lumens, 18000.0);
        assert_eq!(spec.power_watts, 200.0);
        assert_eq!(spec.base_beam_angle_degrees, 120.0);
        assert!(spec.validate().is_ok());
    }
}
