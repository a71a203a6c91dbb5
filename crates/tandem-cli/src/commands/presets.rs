//! Preset management commands.

use super::common::load_preset;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tandem_config::{Preset, factory_presets, list_user_presets, preset_name_from_path};
use tandem_core::ParamIndex;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory and user presets
    List,

    /// Show every value in a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Write a preset to a TOML file for editing
    Export {
        /// Preset name or path
        name: String,

        /// Destination file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Export { name, path, force } => export_preset(&name, &path, force),
    }
}

fn list_presets() -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:20} - {}", preset.name, desc);
    }
    println!();

    println!("User Presets:");
    println!("=============");
    let user_presets = list_user_presets();
    if user_presets.is_empty() {
        println!("  (none)");
    }
    for path in user_presets {
        let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
        match Preset::load(&path) {
            Ok(preset) => {
                println!("  {:20} - {}", name, preset.description.as_deref().unwrap_or(""));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable preset");
                println!("  {:20} - (error loading)", name);
            }
        }
    }
    println!();

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    if let Some(desc) = &preset.description {
        println!("{}", desc);
    }
    println!();

    for (index, value) in preset.values() {
        let desc = index.descriptor();
        if matches!(index, ParamIndex::GateEnabled | ParamIndex::CompressorEnabled) {
            println!();
            let state = if value > 0.5 { "on" } else { "off" };
            println!("  {:24} {}", desc.string_id, state);
        } else {
            println!("  {:24} {}{}", desc.string_id, value, desc.unit.suffix());
        }
    }

    Ok(())
}

fn export_preset(name: &str, path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let preset = load_preset(name)?;
    preset.save(path)?;
    tracing::info!(preset = %preset.name, path = %path.display(), "exported preset");
    println!("Exported '{}' to {}", preset.name, path.display());
    Ok(())
}
