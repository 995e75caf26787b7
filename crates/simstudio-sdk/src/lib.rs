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

//! # SimStudio SDK
//!
//! Ties the photometric engine to the preset store. A [`Studio`] is built
//! from a [`StudioConfig`], resolves presets by name and reports every
//! change through a [`SceneAdapter`].

#![warn(missing_docs)]

pub mod adapter;
pub mod config;
pub mod studio;

pub use adapter::{LightSnapshot, LogAdapter, SceneAdapter};
pub use config::StudioConfig;
pub use studio::{Studio, StudioError, StudioLight};

/// Common imports for applications built on the studio.
pub mod prelude {
    pub use crate::{LightSnapshot, SceneAdapter, Studio, StudioConfig, StudioError};
    pub use simstudio_core::{CameraExposure, EffectiveOutput, EmitterKind, LightSpec, Modifier};
    pub use simstudio_io::{DirectorySource, MemorySource, PresetCategory, PresetStore};
}
