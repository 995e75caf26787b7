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

//! The per-light photometric engine.
//!
//! A [`LightInstance`] owns one light's spec, dimming state and modifier stack,
//! and recomputes the [`EffectiveOutput`] after every operation. A light that
//! never had a preset applied has no instance at all; the first
//! [`LightInstance::configure`] call is the transition to the configured
//! state, which every later operation keeps.
//!
//! Two accumulation paths coexist and are kept distinct:
//! - [`LightInstance::apply_modifier`] attenuates the base output by the loss
//!   of the modifier just added, ignoring the dimmer and the rest of the stack.
//! - [`LightInstance::update_power_with_modifier_estimate`] (used on power
//!   changes) applies the dimmer and a flat loss per stacked modifier.
//!
//! [`LightInstance::clear_modifiers`] restores the undimmed base output.

use crate::error::PhotometricError;
use crate::modifier::Modifier;
use crate::output::{EffectiveOutput, PowerState};
use crate::photometry::{self, BeamShape};
use crate::spec::LightSpec;
use serde::{Deserialize, Serialize};

/// The emission shape of the host light carrying an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmitterKind {
    /// A cone-shaped spot. The only shape a modifier can reshape.
    #[default]
    Spot,
    /// An omni-directional point.
    Point,
    /// A flat emitting area.
    Area,
    /// An infinitely distant directional source.
    Sun,
}

impl EmitterKind {
    /// Whether beam angle and blend changes have any meaning for this shape.
    pub fn supports_beam_shaping(&self) -> bool {
        matches!(self, EmitterKind::Spot)
    }
}

/// The photometric state of one configured light.
///
/// # Examples
///
/// ```
/// use simstudio_core::{EmitterKind, LightInstance, LightSpec};
///
/// let mut light = LightInstance::configure(LightSpec::default(), EmitterKind::Spot).unwrap();
/// assert_eq!(light.output().effective_lumens, 12000.0);
///
/// let dimmed = light.set_power_percent(50.0);
/// assert_eq!(dimmed.effective_lumens, 6000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LightInstanceRecord")]
pub struct LightInstance {
    spec: LightSpec,
    power: PowerState,
    emitter: EmitterKind,
    modifiers: Vec<Modifier>,
    output: EffectiveOutput,
}

// Spec, power and modifiers validate themselves; the stored output is checked
// against the ranges the operations can produce.
#[derive(Deserialize)]
struct LightInstanceRecord {
    spec: LightSpec,
    power: PowerState,
    emitter: EmitterKind,
    modifiers: Vec<Modifier>,
    output: EffectiveOutput,
}

impl TryFrom<LightInstanceRecord> for LightInstance {
    type Error = PhotometricError;

    fn try_from(record: LightInstanceRecord) -> Result<Self, Self::Error> {
        let output = record.output;
        let lumens = output.effective_lumens;
        if !(0.0..=record.spec.base_lumens).contains(&lumens) {
            return Err(PhotometricError::invalid(
                "effective_lumens",
                lumens,
                "must be in [0, base_lumens]",
            ));
        }
        let angle = output.current_beam_angle_degrees;
        if !(0.0..=photometry::MAX_BEAM_ANGLE_DEGREES).contains(&angle) {
            return Err(PhotometricError::invalid(
                "current_beam_angle_degrees",
                angle,
                "must be in [0, 180]",
            ));
        }
        if !(0.0..=1.0).contains(&output.current_blend) {
            return Err(PhotometricError::invalid(
                "current_blend",
                output.current_blend,
                "must be in [0, 1]",
            ));
        }

        Ok(Self {
            spec: record.spec,
            power: record.power,
            emitter: record.emitter,
            modifiers: record.modifiers,
            output,
        })
    }
}

impl LightInstance {
    /// Applies a preset to a light for the first time.
    ///
    /// The dimmer starts at 100% and the modifier stack is empty.
    ///
    /// # Errors
    /// Returns [`PhotometricError::InvalidSpec`] if `spec` fails validation.
    pub fn configure(spec: LightSpec, emitter: EmitterKind) -> Result<Self, PhotometricError> {
        spec.validate()?;

        let power = PowerState::default();
        let output = Self::preset_output(&spec, power);
        log::debug!(
            "Configured {:?} light: {} lm, {} deg",
            emitter,
            spec.base_lumens,
            spec.base_beam_angle_degrees
        );

        Ok(Self {
            spec,
            power,
            emitter,
            modifiers: Vec::new(),
            output,
        })
    }

    /// Applies a new preset, overwriting the whole spec.
    ///
    /// The current dimmer level is kept. The modifier stack is left untouched
    /// but is not reflected in the returned output until the next stack or
    /// power operation.
    ///
    /// # Errors
    /// Returns [`PhotometricError::InvalidSpec`] if `spec` fails validation;
    /// the instance is left unchanged.
    pub fn apply_preset(
        &mut self,
        spec: LightSpec,
    ) -> Result<(LightSpec, PowerState, EffectiveOutput), PhotometricError> {
        spec.validate()?;

        self.spec = spec;
        self.output = Self::preset_output(&self.spec, self.power);
        Ok((self.spec, self.power, self.output))
    }

    /// Sets the dimmer level, clamped into `[0, 100]`, and recomputes output
    /// with the stack-wide loss estimate.
    pub fn set_power_percent(&mut self, percent: f32) -> EffectiveOutput {
        self.power = PowerState::new(percent);
        self.update_power_with_modifier_estimate()
    }

    /// Pushes `modifier` onto the stack and recomputes output.
    ///
    /// Lumens are the base output attenuated by this modifier's loss alone.
    /// Beam angle and blend follow the modifier's kind when the emitter can be
    /// shaped; otherwise they are left as they are.
    pub fn apply_modifier(&mut self, modifier: Modifier) -> EffectiveOutput {
        let lumens = photometry::attenuated_lumens(self.spec.base_lumens, &modifier);

        let shaped = if self.emitter.supports_beam_shaping() {
            photometry::shape_beam(self.spec.base_beam_angle_degrees, &modifier)
        } else {
            None
        };
        let beam = shaped.unwrap_or_else(|| self.current_beam());

        log::debug!(
            "Stacked {} modifier '{}' ({}% loss)",
            modifier.kind(),
            modifier.name(),
            modifier.light_loss_percent()
        );
        self.modifiers.push(modifier);
        self.output = photometry::output_for(lumens, beam);
        self.output
    }

    /// Empties the stack and restores the unmodified beam and base output.
    ///
    /// The dimmer level is kept in [`PowerState`] but not reapplied here.
    pub fn clear_modifiers(&mut self) -> EffectiveOutput {
        self.modifiers.clear();
        self.output = photometry::output_for(
            self.spec.base_lumens,
            photometry::unmodified_beam(self.spec.base_beam_angle_degrees),
        );
        self.output
    }

    /// Recomputes lumens from the dimmer and a flat loss per stacked modifier.
    ///
    /// Beam angle and blend are left as they are.
    pub fn update_power_with_modifier_estimate(&mut self) -> EffectiveOutput {
        let modifier_loss = photometry::estimated_stack_loss(self.modifiers.len());
        let lumens =
            photometry::dimmed_lumens(self.spec.base_lumens, self.power) * (1.0 - modifier_loss);

        self.output = photometry::output_for(lumens, self.current_beam());
        self.output
    }

    /// Changes the emission shape reported by the host.
    pub fn set_emitter(&mut self, emitter: EmitterKind) {
        self.emitter = emitter;
    }

    /// The light's current spec.
    pub fn spec(&self) -> &LightSpec {
        &self.spec
    }

    /// The light's dimming state.
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// The emission shape of the host light.
    pub fn emitter(&self) -> EmitterKind {
        self.emitter
    }

    /// The modifiers stacked on this light, in application order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// The names of the stacked modifiers, in application order.
    pub fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.iter().map(Modifier::name)
    }

    /// The most recently computed output.
    pub fn output(&self) -> EffectiveOutput {
        self.output
    }

    /// The electrical draw at the current dimmer level, in watts.
    pub fn power_draw_watts(&self) -> f32 {
        self.spec.power_watts * self.power.fraction()
    }

    fn current_beam(&self) -> BeamShape {
        BeamShape {
            beam_angle_degrees: self.output.current_beam_angle_degrees,
            blend: self.output.current_blend,
        }
    }

    fn preset_output(spec: &LightSpec, power: PowerState) -> EffectiveOutput {
        photometry::output_for(
            photometry::dimmed_lumens(spec.base_lumens, power),
            photometry::unmodified_beam(spec.base_beam_angle_degrees),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::ModifierShape;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn studio_cob() -> LightInstance {
        LightInstance::configure(LightSpec::default(), EmitterKind::Spot).unwrap()
    }

    fn softbox() -> Modifier {
        Modifier::new(
            "Softbox 90",
            30.0,
            ModifierShape::Softbox {
                output_beam_angle_degrees: Some(90.0),
                softness: Some(0.75),
            },
        )
        .unwrap()
    }

    fn grid_40() -> Modifier {
        Modifier::new(
            "Grid 40",
            20.0,
            ModifierShape::Grid {
                output_beam_angle_degrees: Some(40.0),
                edge_falloff: Some(0.3),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_configure_starts_at_full_power() {
        let light = studio_cob();
        assert_eq!(light.power().power_percent(), 100.0);
        assert!(light.modifiers().is_empty());

        let output = light.output();
        assert_relative_eq!(output.effective_lumens, 12000.0);
        assert_relative_eq!(output.effective_energy, 120.0);
        assert_eq!(output.current_beam_angle_degrees, 120.0);
        assert_eq!(output.current_blend, 0.15);
    }

    #[test]
    fn test_configure_rejects_invalid_spec() {
        let spec = LightSpec {
            base_beam_angle_degrees: 0.0,
            ..Default::default()
        };
        assert!(LightInstance::configure(spec, EmitterKind::Spot).is_err());
    }

    #[test]
    fn test_reapplying_preset_keeps_dimmer() {
        let mut light = studio_cob();
        light.set_power_percent(25.0);

        let spec = LightSpec {
            base_lumens: 20000.0,
            base_beam_angle_degrees: 60.0,
            color_temperature_kelvin: 3200.0,
            power_watts: 300.0,
        };
        let (applied, power, output) = light.apply_preset(spec).unwrap();

        assert_eq!(applied, spec);
        assert_eq!(power.power_percent(), 25.0);
        assert_relative_eq!(output.effective_lumens, 5000.0);
        assert_relative_eq!(output.effective_energy, 50.0);
        assert_eq!(output.current_beam_angle_degrees, 60.0);
        assert_eq!(output.current_blend, 0.15);
    }

    #[test]
    fn test_failed_preset_leaves_instance_untouched() {
        let mut light = studio_cob();
        light.apply_modifier(grid_40());
        let before = light.clone();

        let bad = LightSpec {
            base_lumens: -10.0,
            ..Default::default()
        };
        assert!(light.apply_preset(bad).is_err());
        assert_eq!(light, before);
    }

    #[test]
    fn test_set_power_clamps() {
        let mut light = studio_cob();
        let output = light.set_power_percent(250.0);
        assert_eq!(light.power().power_percent(), 100.0);
        assert_relative_eq!(output.effective_lumens, 12000.0);

        let output = light.set_power_percent(-5.0);
        assert_eq!(light.power().power_percent(), 0.0);
        assert_eq!(output.effective_lumens, 0.0);
        assert_eq!(output.effective_energy, 0.0);
    }

    #[test]
    fn test_modifier_loss_ignores_earlier_stack() {
        let mut light = studio_cob();
        light.apply_modifier(softbox());
        let output = light.apply_modifier(grid_40());

        // Only the grid's 20% counts; the softbox's 30% is not compounded.
        assert_relative_eq!(output.effective_lumens, 9600.0, max_relative = 1e-5);
        assert_eq!(output.current_beam_angle_degrees, 40.0);
        assert_eq!(output.current_blend, 0.3);
        assert_eq!(
            light.modifier_names().collect::<Vec<_>>(),
            vec!["Softbox 90", "Grid 40"]
        );
    }

    #[test]
    fn test_modifier_loss_ignores_dimmer() {
        let mut light = studio_cob();
        light.set_power_percent(50.0);
        let output = light.apply_modifier(softbox());
        assert_relative_eq!(output.effective_lumens, 8400.0, max_relative = 1e-5);
        assert_eq!(light.power().power_percent(), 50.0);
    }

    #[test]
    fn test_duplicate_modifiers_are_kept() {
        let mut light = studio_cob();
        light.apply_modifier(grid_40());
        light.apply_modifier(grid_40());
        assert_eq!(light.modifiers().len(), 2);
    }

    #[test]
    fn test_non_spot_ignores_shaping_but_keeps_loss() {
        let mut light = LightInstance::configure(LightSpec::default(), EmitterKind::Point).unwrap();
        let output = light.apply_modifier(grid_40());

        assert_relative_eq!(output.effective_lumens, 9600.0, max_relative = 1e-5);
        assert_eq!(output.current_beam_angle_degrees, 120.0);
        assert_eq!(output.current_blend, 0.15);
    }

    #[test]
    fn test_other_modifier_keeps_previous_shape() {
        let mut light = studio_cob();
        light.apply_modifier(grid_40());
        let flag = Modifier::new("Flag", 50.0, ModifierShape::Other).unwrap();
        let output = light.apply_modifier(flag);

        assert_relative_eq!(output.effective_lumens, 6000.0);
        assert_eq!(output.current_beam_angle_degrees, 40.0);
        assert_eq!(output.current_blend, 0.3);
    }

    #[test]
    fn test_power_estimate_uses_flat_loss() {
        let mut light = studio_cob();
        light.apply_modifier(softbox());
        light.apply_modifier(grid_40());

        let output = light.set_power_percent(50.0);
        // 12000 * 0.5 * (1 - 2 * 0.15)
        assert_relative_eq!(output.effective_lumens, 4200.0, max_relative = 1e-5);
        assert_relative_eq!(output.effective_energy, 42.0, max_relative = 1e-5);
        // Shaping from the last modifier survives a power change.
        assert_eq!(output.current_beam_angle_degrees, 40.0);
    }

    #[test]
    fn test_power_estimate_never_negative() {
        let mut light = studio_cob();
        for _ in 0..8 {
            light.apply_modifier(grid_40());
        }
        let output = light.update_power_with_modifier_estimate();
        assert_eq!(output.effective_lumens, 0.0);
    }

    #[test]
    fn test_clear_restores_undimmed_base() {
        let mut light = studio_cob();
        light.set_power_percent(50.0);
        light.apply_modifier(softbox());

        let output = light.clear_modifiers();
        assert!(light.modifiers().is_empty());
        assert_relative_eq!(output.effective_lumens, 12000.0);
        assert_eq!(output.current_beam_angle_degrees, 120.0);
        assert_eq!(output.current_blend, 0.15);
        // The dimmer is remembered even though it is not reapplied.
        assert_eq!(light.power().power_percent(), 50.0);
    }

    #[test]
    fn test_clear_after_configure_is_identity() {
        let mut light = studio_cob();
        let baseline = light.output();
        let cleared = light.clear_modifiers();
        assert_abs_diff_eq!(cleared, baseline);
    }

    #[test]
    fn test_power_draw() {
        let mut light = studio_cob();
        assert_relative_eq!(light.power_draw_watts(), 200.0);
        light.set_power_percent(30.0);
        assert_relative_eq!(light.power_draw_watts(), 60.0, max_relative = 1e-5);
    }

    #[test]
    fn test_deserialized_instance_rejects_impossible_output() {
        let light = LightInstance::configure(LightSpec::default(), EmitterKind::Spot).unwrap();
        let mut value = serde_json::to_value(&light).unwrap();

        value["output"]["effective_lumens"] = serde_json::json!(-4800.0);
        let err = serde_json::from_value::<LightInstance>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("effective_lumens"));

        value["output"]["effective_lumens"] = serde_json::json!(12000.0);
        value["power"]["power_percent"] = serde_json::json!(500.0);
        let restored: LightInstance = serde_json::from_value(value).unwrap();
        assert_eq!(restored.power().power_percent(), 100.0);
    }
}
