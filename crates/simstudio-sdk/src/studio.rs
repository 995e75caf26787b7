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

//! The [`Studio`] facade: named lights driven by named presets.

use crate::adapter::{LightSnapshot, LogAdapter, SceneAdapter};
use crate::config::StudioConfig;
use simstudio_core::exposure::NEUTRAL_SCENE_EXPOSURE;
use simstudio_core::{CameraExposure, EffectiveOutput, EmitterKind, LightInstance, PhotometricError};
use simstudio_io::{DirectorySource, PresetSource, PresetStore, PresetWatcher};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by [`Studio`] operations.
#[derive(Debug, Error, PartialEq)]
pub enum StudioError {
    /// No light with this id has been configured.
    #[error("Light '{light_id}' is not configured")]
    UnknownLight {
        /// The requested id.
        light_id: String,
    },
    /// A preset lookup or photometric validation failed.
    #[error(transparent)]
    Photometric(#[from] PhotometricError),
}

/// A configured light and the preset it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioLight {
    preset_name: String,
    instance: LightInstance,
}

impl StudioLight {
    /// Name of the preset last applied.
    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    /// The light's photometric state.
    pub fn instance(&self) -> &LightInstance {
        &self.instance
    }

    /// Captures a snapshot for a [`SceneAdapter`].
    pub fn snapshot(&self) -> LightSnapshot {
        LightSnapshot::capture(&self.preset_name, &self.instance)
    }
}

/// Resolves presets by name, drives one [`LightInstance`] per light id and
/// forwards every change to a [`SceneAdapter`].
///
/// A failing operation changes nothing and writes nothing.
pub struct Studio<S: PresetSource, A: SceneAdapter> {
    config: StudioConfig,
    store: PresetStore<S>,
    adapter: A,
    watcher: Option<PresetWatcher>,
    lights: BTreeMap<String, StudioLight>,
}

impl Studio<DirectorySource, LogAdapter> {
    /// Builds a studio over `config.assets_root` that logs its output.
    ///
    /// Starts a watcher when `config.watch_assets` is set. A watcher that
    /// cannot start is logged and skipped.
    pub fn from_config(config: StudioConfig) -> Self {
        let store = PresetStore::new(DirectorySource::new(&config.assets_root));
        let mut studio = Self::new(config, store, LogAdapter);
        if studio.config.watch_assets {
            match PresetWatcher::new(&studio.config.assets_root) {
                Ok(watcher) => studio.watcher = Some(watcher),
                Err(e) => log::warn!("Hot-reload disabled: {e:#}"),
            }
        }
        studio
    }
}

impl<S: PresetSource, A: SceneAdapter> Studio<S, A> {
    /// Creates a studio without a watcher.
    pub fn new(config: StudioConfig, store: PresetStore<S>, adapter: A) -> Self {
        Self {
            config,
            store,
            adapter,
            watcher: None,
            lights: BTreeMap::new(),
        }
    }

    /// Attaches a watcher used by [`Studio::refresh_assets`].
    pub fn with_watcher(mut self, watcher: PresetWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Applies the light preset `preset_name` to `light_id`.
    ///
    /// An unknown id configures a new light at full power. A known id keeps
    /// its dimmer level and modifier stack.
    pub fn apply_preset(
        &mut self,
        light_id: &str,
        preset_name: &str,
    ) -> Result<EffectiveOutput, StudioError> {
        let spec = self.store.light_spec(preset_name)?;

        let emitter = self.config.emitter_for_new_lights();
        let convert_to_spot = self.config.convert_to_spot;
        let light = match self.lights.entry(light_id.to_string()) {
            Entry::Occupied(entry) => {
                let light = entry.into_mut();
                light.instance.apply_preset(spec)?;
                if convert_to_spot {
                    light.instance.set_emitter(EmitterKind::Spot);
                }
                light.preset_name = preset_name.to_string();
                light
            }
            Entry::Vacant(entry) => {
                let instance = LightInstance::configure(spec, emitter)?;
                entry.insert(StudioLight {
                    preset_name: preset_name.to_string(),
                    instance,
                })
            }
        };

        log::info!("Applied preset '{preset_name}' to '{light_id}'");
        self.adapter.write_light(light_id, &light.snapshot());
        Ok(light.instance.output())
    }

    /// Stacks the modifier preset `modifier_name` on `light_id`.
    pub fn add_modifier(
        &mut self,
        light_id: &str,
        modifier_name: &str,
    ) -> Result<EffectiveOutput, StudioError> {
        let light = self
            .lights
            .get_mut(light_id)
            .ok_or_else(|| unknown(light_id))?;
        let modifier = self.store.modifier(modifier_name)?;

        let output = light.instance.apply_modifier(modifier);
        self.adapter.write_light(light_id, &light.snapshot());
        Ok(output)
    }

    /// Empties the modifier stack of `light_id`.
    pub fn clear_modifiers(&mut self, light_id: &str) -> Result<EffectiveOutput, StudioError> {
        self.update_light(light_id, LightInstance::clear_modifiers)
    }

    /// Sets the dimmer of `light_id`.
    pub fn set_power_percent(
        &mut self,
        light_id: &str,
        percent: f32,
    ) -> Result<EffectiveOutput, StudioError> {
        self.update_light(light_id, |light| light.set_power_percent(percent))
    }

    /// Removes `light_id` from the studio.
    pub fn remove_light(&mut self, light_id: &str) -> Result<(), StudioError> {
        self.lights
            .remove(light_id)
            .ok_or_else(|| unknown(light_id))?;
        self.adapter.remove_light(light_id);
        Ok(())
    }

    /// The light configured under `light_id`.
    pub fn light(&self, light_id: &str) -> Option<&StudioLight> {
        self.lights.get(light_id)
    }

    /// All configured lights, ordered by id.
    pub fn lights(&self) -> impl Iterator<Item = (&str, &StudioLight)> {
        self.lights.iter().map(|(id, light)| (id.as_str(), light))
    }

    /// Drops cached presets. Configured lights keep their applied values.
    pub fn reload_assets(&mut self) {
        self.store.reload();
    }

    /// Reloads presets if the watcher saw changes. Returns whether it did.
    pub fn refresh_assets(&mut self) -> bool {
        match &self.watcher {
            Some(watcher) => self.store.reload_if_changed(watcher),
            None => false,
        }
    }

    /// Derives the scene exposure from camera settings and writes it.
    pub fn apply_exposure(&mut self, camera: &CameraExposure) -> f32 {
        let exposure = camera.scene_exposure(self.config.exposure_calibration);
        log::debug!(
            "Camera ISO {} f/{} {}s -> EV {:.2}",
            camera.iso,
            camera.f_stop,
            camera.shutter_seconds,
            camera.exposure_value()
        );
        self.adapter.write_exposure(exposure);
        exposure
    }

    /// Writes the neutral scene exposure.
    pub fn reset_exposure(&mut self) {
        self.adapter.write_exposure(NEUTRAL_SCENE_EXPOSURE);
    }

    /// The preset store.
    pub fn store(&mut self) -> &mut PresetStore<S> {
        &mut self.store
    }

    /// The scene adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The active configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn update_light(
        &mut self,
        light_id: &str,
        update: impl FnOnce(&mut LightInstance) -> EffectiveOutput,
    ) -> Result<EffectiveOutput, StudioError> {
        let light = self
            .lights
            .get_mut(light_id)
            .ok_or_else(|| unknown(light_id))?;
        let output = update(&mut light.instance);
        self.adapter.write_light(light_id, &light.snapshot());
        Ok(output)
    }
}

fn unknown(light_id: &str) -> StudioError {
    StudioError::UnknownLight {
        light_id: light_id.to_string(),
    }
}
