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

//! Per-light dimming state and the derived output written to the scene.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

/// The mutable dimming state of one light.
///
/// Deserialized values are clamped the same way as [`PowerState::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PowerStateRecord")]
pub struct PowerState {
    power_percent: f32,
}

#[derive(Deserialize)]
struct PowerStateRecord {
    power_percent: f32,
}

impl From<PowerStateRecord> for PowerState {
    fn from(record: PowerStateRecord) -> Self {
        Self::new(record.power_percent)
    }
}

impl Default for PowerState {
    fn default() -> Self {
        Self {
            power_percent: 100.0,
        }
    }
}

impl PowerState {
    /// Creates a power state, clamping `percent` into `[0, 100]`.
    ///
    /// NaN is treated as full power.
    pub fn new(percent: f32) -> Self {
        let power_percent = if percent.is_nan() {
            100.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        Self { power_percent }
    }

    /// The dimmer level in `[0, 100]`.
    pub fn power_percent(&self) -> f32 {
        self.power_percent
    }

    /// The dimmer level as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        self.power_percent / 100.0
    }
}

/// Output derived from a light's spec, dimming state and modifier stack.
///
/// This is never stored on its own; a light instance recomputes it after every
/// operation and hands it to the scene adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveOutput {
    /// Output after dimming and modifier attenuation, in lumens.
    pub effective_lumens: f32,
    /// The host energy value, `effective_lumens / 100`.
    pub effective_energy: f32,
    /// The current beam spread in degrees.
    pub current_beam_angle_degrees: f32,
    /// Softness of the beam edge.
    pub current_blend: f32,
}

impl AbsDiffEq for EffectiveOutput {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.effective_lumens
            .abs_diff_eq(&other.effective_lumens, epsilon)
            && self
                .effective_energy
                .abs_diff_eq(&other.effective_energy, epsilon)
            && self
                .current_beam_angle_degrees
                .abs_diff_eq(&other.current_beam_angle_degrees, epsilon)
            && self.current_blend.abs_diff_eq(&other.current_blend, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state_defaults_to_full() {
        let power = PowerState::default();
        assert_eq!(power.power_percent(), 100.0);
        assert_eq!(power.fraction(), 1.0);
    }

    #[test]
    fn test_power_state_clamps() {
        assert_eq!(PowerState::new(150.0).power_percent(), 100.0);
        assert_eq!(PowerState::new(-20.0).power_percent(), 0.0);
        assert_eq!(PowerState::new(42.5).power_percent(), 42.5);
        assert_eq!(PowerState::new(f32::NAN).power_percent(), 100.0);
    }

    #[test]
    fn test_deserialized_power_state_is_clamped() {
        let over: PowerState = serde_json::from_str(r#"{ "power_percent": 500.0 }"#).unwrap();
        let under: PowerState = serde_json::from_str(r#"{ "power_percent": -5.0 }"#).unwrap();
        assert_eq!(over.power_percent(), 100.0);
        assert_eq!(under.power_percent(), 0.0);
    }

    #[test]
    fn test_output_abs_diff_eq() {
        let a = EffectiveOutput {
            effective_lumens: 8400.0,
            effective_energy: 84.0,
            current_beam_angle_degrees: 90.0,
            current_blend: 0.75,
        };
        let b = EffectiveOutput {
            effective_lumens: 8400.0005,
            ..a
        };
        assert!(a.abs_diff_eq(&b, 1e-3));
        assert!(!a.abs_diff_eq(&b, 1e-6));
    }
}
