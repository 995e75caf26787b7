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

//! Studio configuration, read from a TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use simstudio_core::EmitterKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a [`crate::Studio`].
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// assets_root = "assets"
/// watch_assets = true
/// convert_to_spot = true
/// exposure_calibration = 0.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Directory holding the `lights/` and `modifiers/` preset folders.
    pub assets_root: PathBuf,
    /// Reload presets when files under `assets_root` change.
    pub watch_assets: bool,
    /// Turn lights into spots when a preset is applied, so modifiers can
    /// shape the beam.
    pub convert_to_spot: bool,
    /// Added to the scene exposure derived from camera settings.
    /// Clamped into `[-20, 20]` when applied.
    pub exposure_calibration: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            watch_assets: false,
            convert_to_spot: true,
            exposure_calibration: 0.0,
        }
    }
}

impl StudioConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse studio configuration")
    }

    /// Loads a configuration file.
    ///
    /// A relative `assets_root` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;

        if config.assets_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.assets_root = parent.join(&config.assets_root);
            }
        }
        log::debug!("Loaded studio config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// The emitter a newly configured light gets.
    pub fn emitter_for_new_lights(&self) -> EmitterKind {
        if self.convert_to_spot {
            EmitterKind::Spot
        } else {
            EmitterKind::Point
        }
    }
}
