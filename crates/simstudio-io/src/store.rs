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

//! The cached preset store.
//!
//! Listings are built lazily from a [`PresetSource`] and kept until
//! [`PresetStore::reload`] is called. The store is an ordinary value owned by
//! whoever composes the application; there is no process-wide cache.

use crate::record::{
    parse_light, parse_modifier, LightPreset, ModifierPreset, PresetCategory, RawRecord,
    RecordError,
};
use crate::source::PresetSource;
use crate::watch::PresetWatcher;
use simstudio_core::{LightSpec, Modifier, PhotometricError};

/// The payload returned by [`PresetStore::load_by_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresetData {
    /// A light preset.
    Light(LightPreset),
    /// A modifier preset.
    Modifier(ModifierPreset),
}

/// A cached, name-sorted view over a [`PresetSource`].
#[derive(Debug)]
pub struct PresetStore<S: PresetSource> {
    source: S,
    lights: Option<Vec<LightPreset>>,
    modifiers: Option<Vec<ModifierPreset>>,
}

impl<S: PresetSource> PresetStore<S> {
    /// Creates a store with empty caches.
    pub fn new(source: S) -> Self {
        Self {
            source,
            lights: None,
            modifiers: None,
        }
    }

    /// All valid light presets, sorted by name (case-sensitive).
    ///
    /// Malformed records are skipped with a warning.
    pub fn list_light_presets(&mut self) -> &[LightPreset] {
        let source = &self.source;
        self.lights.get_or_insert_with(|| {
            let mut presets = collect(source, PresetCategory::Light, parse_light);
            presets.sort_by(|a, b| a.name.cmp(&b.name));
            presets
        })
    }

    /// All valid modifier presets, sorted by name (case-sensitive).
    ///
    /// Malformed records are skipped with a warning.
    pub fn list_modifier_presets(&mut self) -> &[ModifierPreset] {
        let source = &self.source;
        self.modifiers.get_or_insert_with(|| {
            let mut presets = collect(source, PresetCategory::Modifier, parse_modifier);
            presets.sort_by(|a, b| a.name.cmp(&b.name));
            presets
        })
    }

    /// Looks up a preset of `category` by exact name.
    pub fn load_by_name(&mut self, name: &str, category: PresetCategory) -> Option<PresetData> {
        match category {
            PresetCategory::Light => self
                .list_light_presets()
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .map(PresetData::Light),
            PresetCategory::Modifier => self
                .list_modifier_presets()
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .map(PresetData::Modifier),
        }
    }

    /// The [`LightSpec`] of the light preset called `name`.
    ///
    /// # Errors
    /// Returns [`PhotometricError::PresetNotFound`] if no such preset is loaded.
    pub fn light_spec(&mut self, name: &str) -> Result<LightSpec, PhotometricError> {
        self.list_light_presets()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.spec)
            .ok_or_else(|| PhotometricError::PresetNotFound {
                name: name.to_string(),
            })
    }

    /// The modifier preset called `name`.
    ///
    /// # Errors
    /// Returns [`PhotometricError::ModifierNotFound`] if no such modifier is loaded.
    pub fn modifier(&mut self, name: &str) -> Result<Modifier, PhotometricError> {
        self.list_modifier_presets()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.modifier.clone())
            .ok_or_else(|| PhotometricError::ModifierNotFound {
                name: name.to_string(),
            })
    }

    /// Drops both caches so the next listing reads the source again.
    pub fn reload(&mut self) {
        self.lights = None;
        self.modifiers = None;
        log::info!("Preset caches invalidated ({})", self.source.describe());
    }

    /// Reloads if `watcher` has seen changes since the last call.
    ///
    /// Returns whether the caches were invalidated.
    pub fn reload_if_changed(&mut self, watcher: &PresetWatcher) -> bool {
        if watcher.has_changes() {
            self.reload();
            true
        } else {
            false
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the underlying source. Caches are not invalidated.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn collect<S, T>(
    source: &S,
    category: PresetCategory,
    parse: fn(&RawRecord) -> Result<T, RecordError>,
) -> Vec<T>
where
    S: PresetSource,
{
    let records = match source.read_records(category) {
        Ok(records) => records,
        Err(e) => {
            log::warn!(
                "Failed to read {category} presets from {}: {e:#}",
                source.describe()
            );
            return Vec::new();
        }
    };

    let presets: Vec<T> = records
        .iter()
        .filter_map(|raw| match parse(raw) {
            Ok(preset) => Some(preset),
            Err(e) => {
                log::warn!("Skipping malformed {category} preset '{}': {e}", raw.origin);
                None
            }
        })
        .collect();

    log::info!(
        "Loaded {} {category} preset(s) from {}",
        presets.len(),
        source.describe()
    );
    presets
}
