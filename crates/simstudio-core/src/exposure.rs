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

//! Physical camera exposure.
//!
//! Converts ISO, aperture and shutter settings to an exposure value (EV) and
//! from there to the scene exposure offset the renderer applies. A lower EV
//! means a brighter image, so the scene exposure is the negated EV plus a
//! user calibration offset.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted ISO range.
pub const ISO_RANGE: RangeInclusive<u32> = 10..=128_000;
/// Accepted f-number range.
pub const F_STOP_RANGE: RangeInclusive<f32> = 0.1..=128.0;
/// Accepted shutter range in seconds.
pub const SHUTTER_RANGE: RangeInclusive<f32> = 0.0001..=300.0;
/// Accepted calibration offset range in EV.
pub const CALIBRATION_RANGE: RangeInclusive<f32> = -20.0..=20.0;

/// Scene exposure after a reset.
pub const NEUTRAL_SCENE_EXPOSURE: f32 = 0.0;

const FALLBACK_ISO: u32 = 100;
const FALLBACK_F_STOP: f32 = 1.4;
const FALLBACK_SHUTTER_SECONDS: f32 = 0.001;

/// The exposure triangle of a physical camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraExposure {
    /// Sensor sensitivity.
    pub iso: u32,
    /// Aperture f-number.
    pub f_stop: f32,
    /// Shutter duration in seconds.
    pub shutter_seconds: f32,
}

impl Default for CameraExposure {
    fn default() -> Self {
        Self {
            iso: 100,
            f_stop: 2.8,
            shutter_seconds: 0.02,
        }
    }
}

impl CameraExposure {
    /// Creates camera settings, clamping each value into its accepted range.
    pub fn new(iso: u32, f_stop: f32, shutter_seconds: f32) -> Self {
        Self {
            iso: iso.clamp(*ISO_RANGE.start(), *ISO_RANGE.end()),
            f_stop: clamp_or(f_stop, &F_STOP_RANGE, FALLBACK_F_STOP),
            shutter_seconds: clamp_or(shutter_seconds, &SHUTTER_RANGE, FALLBACK_SHUTTER_SECONDS),
        }
    }

    /// The exposure value, `log2(N² / t) - log2(ISO / 100)`.
    ///
    /// Non-positive settings are replaced by safe fallbacks instead of
    /// producing infinities.
    pub fn exposure_value(&self) -> f32 {
        let shutter = if self.shutter_seconds > 0.0 {
            self.shutter_seconds
        } else {
            FALLBACK_SHUTTER_SECONDS
        };
        let iso = if self.iso > 0 { self.iso } else { FALLBACK_ISO };
        let aperture = if self.f_stop > 0.0 {
            self.f_stop
        } else {
            FALLBACK_F_STOP
        };

        let ev_100 = (aperture * aperture / shutter).log2();
        let iso_shift = (iso as f32 / 100.0).log2();
        ev_100 - iso_shift
    }

    /// The renderer exposure offset for these settings.
    ///
    /// `calibration` is clamped into [`CALIBRATION_RANGE`].
    pub fn scene_exposure(&self, calibration: f32) -> f32 {
        -self.exposure_value() + clamp_or(calibration, &CALIBRATION_RANGE, 0.0)
    }

    /// The `N` of a `1/N` shutter readout, or `None` for shutters of one
    /// second or longer.
    pub fn shutter_fraction_denominator(&self) -> Option<u32> {
        if self.shutter_seconds > 0.0 && self.shutter_seconds < 1.0 {
            Some((1.0 / self.shutter_seconds) as u32)
        } else {
            None
        }
    }
}

fn clamp_or(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_exposures() {
        // f/1, 1s, ISO 100 is EV 0 by definition.
        assert_relative_eq!(CameraExposure::new(100, 1.0, 1.0).exposure_value(), 0.0);
        assert_relative_eq!(CameraExposure::new(100, 2.0, 1.0).exposure_value(), 2.0);
        // Two stops of gain cancel two stops of aperture.
        assert_relative_eq!(CameraExposure::new(400, 2.0, 1.0).exposure_value(), 0.0);
    }

    #[test]
    fn test_default_exposure() {
        let camera = CameraExposure::default();
        assert_relative_eq!(
            camera.exposure_value(),
            392.0_f32.log2(),
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_scene_exposure_negates_and_calibrates() {
        let camera = CameraExposure::new(100, 2.0, 1.0);
        assert_relative_eq!(camera.scene_exposure(0.0), -2.0);
        assert_relative_eq!(camera.scene_exposure(1.5), -0.5);
        // Calibration saturates at +20 EV.
        assert_relative_eq!(camera.scene_exposure(50.0), 18.0);
    }

    #[test]
    fn test_new_clamps_settings() {
        let camera = CameraExposure::new(1, 500.0, 0.0);
        assert_eq!(camera.iso, 10);
        assert_eq!(camera.f_stop, 128.0);
        assert_eq!(camera.shutter_seconds, 0.0001);
    }

    #[test]
    fn test_fallbacks_for_direct_field_writes() {
        let camera = CameraExposure {
            iso: 0,
            f_stop: 0.0,
            shutter_seconds: -1.0,
        };
        let expected = (1.4_f32 * 1.4 / 0.001).log2();
        assert_relative_eq!(camera.exposure_value(), expected, max_relative = 1e-5);
        assert!(camera.exposure_value().is_finite());
    }

    #[test]
    fn test_shutter_readout() {
        assert_eq!(
            CameraExposure::default().shutter_fraction_denominator(),
            Some(50)
        );
        assert_eq!(
            CameraExposure::new(100, 2.8, 2.0).shutter_fraction_denominator(),
            None
        );
    }
}
