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

//! # SimStudio IO
//!
//! The preset store. Light and modifier presets are JSON records read from
//! a [`PresetSource`], validated into core types, cached by name and
//! optionally hot-reloaded when a [`PresetWatcher`] sees files change.

#![warn(missing_docs)]

pub mod record;
pub mod source;
pub mod store;
pub mod watch;

pub use record::{
    parse_light, parse_modifier, LightPreset, ModifierPreset, PresetCategory, RawRecord,
    RecordError,
};
pub use source::{DirectorySource, MemorySource, PresetSource};
pub use store::{PresetData, PresetStore};
pub use watch::PresetWatcher;
