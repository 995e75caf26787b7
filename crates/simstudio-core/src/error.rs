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

//! Defines the error types reported by the photometric layer.
//!
//! Every variant is a local, recoverable condition. Callers surface a message
//! to the user and leave the light untouched; nothing here is fatal.

use std::fmt;

/// An error raised while validating specs or resolving presets by name.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotometricError {
    /// A numeric field of a light or modifier spec is outside its physical range.
    InvalidSpec {
        /// The name of the offending field (e.g. `base_lumens`).
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// A short description of the accepted range.
        reason: &'static str,
    },
    /// A modifier name could not be resolved to a loaded modifier preset.
    ModifierNotFound {
        /// The name that was looked up.
        name: String,
    },
    /// A light preset name could not be resolved to a loaded light preset.
    PresetNotFound {
        /// The name that was looked up.
        name: String,
    },
}

impl PhotometricError {
    pub(crate) fn invalid(field: &'static str, value: f32, reason: &'static str) -> Self {
        PhotometricError::InvalidSpec {
            field,
            value,
            reason,
        }
    }
}

impl fmt::Display for PhotometricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotometricError::InvalidSpec {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid spec: '{field}' = {value} ({reason})")
            }
            PhotometricError::ModifierNotFound { name } => {
                write!(f, "Modifier '{name}' not found")
            }
            PhotometricError::PresetNotFound { name } => {
                write!(f, "Preset '{name}' not found")
            }
        }
    }
}

impl std::error::Error for PhotometricError {}
