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

// Studio light simulator
// Run with: simstudio <command>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use simstudio_core::{CameraExposure, EffectiveOutput};
use simstudio_io::{PresetSource, PresetStore};
use simstudio_sdk::{SceneAdapter, Studio, StudioConfig};
use std::path::PathBuf;

const LIGHT_ID: &str = "light";

#[derive(Parser)]
#[command(name = "simstudio", version, about = "Photometric studio light simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Studio configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Assets directory holding `lights/` and `modifiers/`
    #[arg(long, global = true)]
    assets: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available presets
    List {
        /// Only list one category
        #[arg(value_enum)]
        category: Option<Category>,
    },
    /// Apply a preset to a light and print its output after each step
    Simulate {
        /// Light preset name
        preset: String,
        /// Modifier preset to stack, in order (repeatable)
        #[arg(long = "modifier", short = 'm')]
        modifiers: Vec<String>,
        /// Dimmer level in percent, applied before modifiers
        #[arg(long)]
        power: Option<f32>,
        /// Clear the modifier stack at the end
        #[arg(long)]
        clear: bool,
    },
    /// Compute the scene exposure for camera settings
    Exposure {
        /// Sensor sensitivity
        #[arg(long, default_value_t = 100)]
        iso: u32,
        /// Aperture f-number
        #[arg(long, default_value_t = 2.8)]
        f_stop: f32,
        /// Shutter time in seconds
        #[arg(long, default_value_t = 0.02)]
        shutter: f32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Category {
    Lights,
    Modifiers,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StudioConfig::load(path)?,
        None => StudioConfig::default(),
    };
    if let Some(assets) = cli.assets {
        config.assets_root = assets;
    }
    // A one-shot run has nothing to hot-reload.
    config.watch_assets = false;

    let mut studio = Studio::from_config(config);
    match cli.command {
        Commands::List { category } => list(&mut studio, category),
        Commands::Simulate {
            preset,
            modifiers,
            power,
            clear,
        } => simulate(&mut studio, &preset, &modifiers, power, clear)?,
        Commands::Exposure {
            iso,
            f_stop,
            shutter,
        } => exposure(&mut studio, CameraExposure::new(iso, f_stop, shutter)),
    }
    Ok(())
}

fn list<S: PresetSource, A: SceneAdapter>(studio: &mut Studio<S, A>, category: Option<Category>) {
    let store: &mut PresetStore<S> = studio.store();

    if !matches!(category, Some(Category::Modifiers)) {
        println!("Lights:");
        for preset in store.list_light_presets() {
            let spec = &preset.spec;
            println!(
                "  {:<24} {:>8.0} lm {:>5.0} deg {:>6.0} K {:>6.0} W",
                preset.name,
                spec.base_lumens,
                spec.base_beam_angle_degrees,
                spec.color_temperature_kelvin,
                spec.power_watts
            );
        }
    }

    if !matches!(category, Some(Category::Lights)) {
        println!("Modifiers:");
        for preset in store.list_modifier_presets() {
            println!(
                "  {:<24} {:<9} {:>5.1}% loss",
                preset.name,
                preset.kind(),
                preset.modifier.light_loss_percent()
            );
        }
    }
}

fn simulate<S: PresetSource, A: SceneAdapter>(
    studio: &mut Studio<S, A>,
    preset: &str,
    modifiers: &[String],
    power: Option<f32>,
    clear: bool,
) -> Result<()> {
    let output = studio
        .apply_preset(LIGHT_ID, preset)
        .with_context(|| format!("Failed to apply preset '{preset}'"))?;
    print_step(&format!("preset {preset}"), &output);

    if let Some(percent) = power {
        let output = studio.set_power_percent(LIGHT_ID, percent)?;
        print_step(&format!("power {percent}%"), &output);
    }

    for name in modifiers {
        let output = studio
            .add_modifier(LIGHT_ID, name)
            .with_context(|| format!("Failed to add modifier '{name}'"))?;
        print_step(&format!("+ {name}"), &output);
    }

    if clear {
        let output = studio.clear_modifiers(LIGHT_ID)?;
        print_step("clear", &output);
    }

    if let Some(light) = studio.light(LIGHT_ID) {
        println!(
            "Draw: {:.1} W at {}%",
            light.instance().power_draw_watts(),
            light.instance().power().power_percent()
        );
    }
    Ok(())
}

fn exposure<S: PresetSource, A: SceneAdapter>(studio: &mut Studio<S, A>, camera: CameraExposure) {
    let scene = studio.apply_exposure(&camera);
    let shutter = match camera.shutter_fraction_denominator() {
        Some(denominator) => format!("1/{denominator}"),
        None => format!("{}s", camera.shutter_seconds),
    };
    println!(
        "ISO {} f/{} {shutter}: EV {:.2}, scene exposure {:.2}",
        camera.iso,
        camera.f_stop,
        camera.exposure_value(),
        scene
    );
}

fn print_step(label: &str, output: &EffectiveOutput) {
    println!(
        "{:<28} {:>8.0} lm {:>7.1} energy {:>5.1} deg blend {:.2}",
        label,
        output.effective_lumens,
        output.effective_energy,
        output.current_beam_angle_degrees,
        output.current_blend
    );
}
