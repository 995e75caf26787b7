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

//! Pure photometric derivations.
//!
//! These functions hold no state. [`crate::engine::LightInstance`] combines
//! them into the per-light operations; scene adapters may call them directly
//! to preview a value without touching an instance.

use crate::modifier::{Modifier, ModifierShape};
use crate::output::{EffectiveOutput, PowerState};

/// The widest beam a spot can produce.
pub const MAX_BEAM_ANGLE_DEGREES: f32 = 180.0;

/// Edge softness of a light with no shaping modifier.
pub const UNMODIFIED_BLEND: f32 = 0.15;

/// Edge falloff of a grid that does not specify one.
pub const DEFAULT_GRID_EDGE_FALLOFF: f32 = 0.5;

/// Softness of a diffuser that does not specify one.
pub const DEFAULT_DIFFUSER_SOFTNESS: f32 = 0.5;

/// Softness of a softbox that does not specify one.
pub const DEFAULT_SOFTBOX_SOFTNESS: f32 = 0.75;

/// Beam angle of a softbox that does not specify one.
pub const DEFAULT_SOFTBOX_BEAM_ANGLE_DEGREES: f32 = 90.0;

/// Flat per-modifier loss used by the power-change estimate.
pub const ESTIMATED_LOSS_PER_MODIFIER: f32 = 0.15;

/// Lumens per unit of host energy.
pub const LUMENS_PER_ENERGY_UNIT: f32 = 100.0;

/// A beam angle and edge softness pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamShape {
    /// Beam spread in degrees.
    pub beam_angle_degrees: f32,
    /// Edge softness.
    pub blend: f32,
}

/// Base output scaled by the dimmer.
#[inline]
pub fn dimmed_lumens(base_lumens: f32, power: PowerState) -> f32 {
    base_lumens * power.fraction()
}

/// Converts lumens to the host energy unit.
#[inline]
pub fn energy_from_lumens(lumens: f32) -> f32 {
    lumens / LUMENS_PER_ENERGY_UNIT
}

/// Base output attenuated by a single modifier's rated loss.
///
/// Only this modifier's loss is applied; the dimmer and the rest of the stack
/// are ignored.
#[inline]
pub fn attenuated_lumens(base_lumens: f32, modifier: &Modifier) -> f32 {
    let light_loss = modifier.light_loss_percent() / 100.0;
    base_lumens * (1.0 - light_loss)
}

/// The coarse aggregate loss of a stack of `count` modifiers.
///
/// Every modifier counts for [`ESTIMATED_LOSS_PER_MODIFIER`] regardless of
/// its rated loss. The sum saturates at `1.0` so output never goes negative.
#[inline]
pub fn estimated_stack_loss(count: usize) -> f32 {
    (count as f32 * ESTIMATED_LOSS_PER_MODIFIER).min(1.0)
}

/// The beam of a light with no shaping modifier.
pub fn unmodified_beam(base_beam_angle_degrees: f32) -> BeamShape {
    BeamShape {
        beam_angle_degrees: base_beam_angle_degrees.min(MAX_BEAM_ANGLE_DEGREES),
        blend: UNMODIFIED_BLEND,
    }
}

/// The beam produced by placing `modifier` in front of a light whose native
/// spread is `base_beam_angle_degrees`.
///
/// Returns `None` for modifiers that do not shape the beam.
pub fn shape_beam(base_beam_angle_degrees: f32, modifier: &Modifier) -> Option<BeamShape> {
    match *modifier.shape() {
        ModifierShape::Grid {
            output_beam_angle_degrees,
            edge_falloff,
        } => Some(BeamShape {
            beam_angle_degrees: output_beam_angle_degrees.unwrap_or(base_beam_angle_degrees),
            blend: edge_falloff.unwrap_or(DEFAULT_GRID_EDGE_FALLOFF),
        }),
        ModifierShape::Diffuser {
            beam_angle_modifier_degrees,
            softness,
        } => Some(BeamShape {
            beam_angle_degrees: (base_beam_angle_degrees + beam_angle_modifier_degrees)
                .clamp(0.0, MAX_BEAM_ANGLE_DEGREES),
            blend: softness.unwrap_or(DEFAULT_DIFFUSER_SOFTNESS),
        }),
        ModifierShape::Softbox {
            output_beam_angle_degrees,
            softness,
        } => Some(BeamShape {
            beam_angle_degrees: output_beam_angle_degrees
                .unwrap_or(DEFAULT_SOFTBOX_BEAM_ANGLE_DEGREES),
            blend: softness.unwrap_or(DEFAULT_SOFTBOX_SOFTNESS),
        }),
        ModifierShape::Other => None,
    }
}

/// Assembles an [`EffectiveOutput`] from a lumen value and a beam.
pub fn output_for(lumens: f32, beam: BeamShape) -> EffectiveOutput {
    EffectiveOutput {
        effective_lumens: lumens,
        effective_energy: energy_from_lumens(lumens),
        current_beam_angle_degrees: beam.beam_angle_degrees,
        current_blend: beam.blend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(angle: Option<f32>, falloff: Option<f32>) -> Modifier {
        Modifier::new(
            "Grid",
            20.0,
            ModifierShape::Grid {
                output_beam_angle_degrees: angle,
                edge_falloff: falloff,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_dimmed_lumens() {
        assert_relative_eq!(dimmed_lumens(12000.0, PowerState::new(50.0)), 6000.0);
        assert_relative_eq!(dimmed_lumens(12000.0, PowerState::default()), 12000.0);
        assert_eq!(dimmed_lumens(12000.0, PowerState::new(0.0)), 0.0);
    }

    #[test]
    fn test_energy_is_hundredth_of_lumens() {
        assert_relative_eq!(energy_from_lumens(12000.0), 120.0);
        assert_relative_eq!(energy_from_lumens(8400.0), 84.0);
    }

    #[test]
    fn test_attenuated_lumens_uses_single_loss() {
        let softbox = Modifier::new(
            "Softbox",
            30.0,
            ModifierShape::Softbox {
                output_beam_angle_degrees: Some(90.0),
                softness: Some(0.75),
            },
        )
        .unwrap();
        assert_relative_eq!(
            attenuated_lumens(12000.0, &softbox),
            8400.0,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_estimated_stack_loss_saturates() {
        assert_eq!(estimated_stack_loss(0), 0.0);
        assert_relative_eq!(estimated_stack_loss(2), 0.3);
        assert_eq!(estimated_stack_loss(7), 1.0);
        assert_eq!(estimated_stack_loss(100), 1.0);
    }

    #[test]
    fn test_grid_overrides_angle() {
        let shape = shape_beam(120.0, &grid(Some(40.0), None)).unwrap();
        assert_eq!(shape.beam_angle_degrees, 40.0);
        assert_eq!(shape.blend, DEFAULT_GRID_EDGE_FALLOFF);

        // Without an output angle the grid keeps the native spread.
        let shape = shape_beam(75.0, &grid(None, Some(0.2))).unwrap();
        assert_eq!(shape.beam_angle_degrees, 75.0);
        assert_eq!(shape.blend, 0.2);
    }

    #[test]
    fn test_diffuser_adds_and_caps() {
        let diffuser = Modifier::new(
            "Diffuser",
            10.0,
            ModifierShape::Diffuser {
                beam_angle_modifier_degrees: 30.0,
                softness: None,
            },
        )
        .unwrap();
        let shape = shape_beam(170.0, &diffuser).unwrap();
        assert_eq!(shape.beam_angle_degrees, 180.0);
        assert_eq!(shape.blend, DEFAULT_DIFFUSER_SOFTNESS);

        let shape = shape_beam(60.0, &diffuser).unwrap();
        assert_eq!(shape.beam_angle_degrees, 90.0);
    }

    #[test]
    fn test_softbox_defaults() {
        let softbox = Modifier::new(
            "Softbox",
            30.0,
            ModifierShape::Softbox {
                output_beam_angle_degrees: None,
                softness: None,
            },
        )
        .unwrap();
        let shape = shape_beam(45.0, &softbox).unwrap();
        assert_eq!(shape.beam_angle_degrees, DEFAULT_SOFTBOX_BEAM_ANGLE_DEGREES);
        assert_eq!(shape.blend, DEFAULT_SOFTBOX_SOFTNESS);
    }

    #[test]
    fn test_other_does_not_shape() {
        let flag = Modifier::new("Flag", 50.0, ModifierShape::Other).unwrap();
        assert!(shape_beam(120.0, &flag).is_none());
    }

    #[test]
    fn test_unmodified_beam() {
        let beam = unmodified_beam(120.0);
        assert_eq!(beam.beam_angle_degrees, 120.0);
        assert_eq!(beam.blend, UNMODIFIED_BLEND);
    }
}
