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

//! The boundary between the simulator and whatever scene displays it.

use serde::Serialize;
use simstudio_core::{EffectiveOutput, EmitterKind, LightInstance, LightSpec};

/// Everything a scene needs to display one simulated light.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightSnapshot {
    /// Name of the preset last applied.
    pub preset_name: String,
    /// The applied spec.
    pub spec: LightSpec,
    /// Dimmer level in percent.
    pub power_percent: f32,
    /// Emitter type of the light.
    pub emitter: EmitterKind,
    /// Names of the stacked modifiers, oldest first.
    pub modifier_names: Vec<String>,
    /// Derived output.
    pub output: EffectiveOutput,
    /// Electrical draw at the current dimmer level.
    pub power_draw_watts: f32,
}

impl LightSnapshot {
    /// Captures the current state of `light`.
    pub fn capture(preset_name: &str, light: &LightInstance) -> Self {
        Self {
            preset_name: preset_name.to_string(),
            spec: *light.spec(),
            power_percent: light.power().power_percent(),
            emitter: light.emitter(),
            modifier_names: light.modifier_names().map(str::to_string).collect(),
            output: light.output(),
            power_draw_watts: light.power_draw_watts(),
        }
    }
}

/// Receives every change the studio makes.
///
/// Implementations translate snapshots into their own scene representation.
pub trait SceneAdapter {
    /// A light was configured or its output changed.
    fn write_light(&mut self, light_id: &str, snapshot: &LightSnapshot);

    /// A light was removed from the studio.
    fn remove_light(&mut self, light_id: &str);

    /// The scene exposure changed.
    fn write_exposure(&mut self, exposure: f32);
}

/// Logs writes instead of applying them to a scene.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAdapter;

impl SceneAdapter for LogAdapter {
    fn write_light(&mut self, light_id: &str, snapshot: &LightSnapshot) {
        log::info!(
            "[{light_id}] {} @ {}%: {:.0} lm, {:.1} energy, {:.1} deg, blend {:.2}",
            snapshot.preset_name,
            snapshot.power_percent,
            snapshot.output.effective_lumens,
            snapshot.output.effective_energy,
            snapshot.output.current_beam_angle_degrees,
            snapshot.output.current_blend
        );
    }

    fn remove_light(&mut self, light_id: &str) {
        log::info!("[{light_id}] removed");
    }

    fn write_exposure(&mut self, exposure: f32) {
        log::info!("Scene exposure set to {exposure:.2}");
    }
}
