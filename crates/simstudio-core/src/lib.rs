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

//! # SimStudio Core
//!
//! Foundational crate containing the photometric data model and the
//! calculation engine for simulated studio lights: light specs, beam
//! modifiers, dimming, derived output and camera exposure. It performs no I/O.

#![warn(missing_docs)]

pub mod emitter;
pub mod engine;
pub mod error;
pub mod exposure;
pub mod modifier;
pub mod output;
pub mod photometry;
pub mod spec;

pub use emitter::{watts_to_lumens, EmitterTechnology};
pub use engine::{EmitterKind, LightInstance};
pub use error::PhotometricError;
pub use exposure::CameraExposure;
pub use modifier::{Modifier, ModifierKind, ModifierShape};
pub use output::{EffectiveOutput, PowerState};
pub use spec::LightSpec;
