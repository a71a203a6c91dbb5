//! tandem CLI - gate and compressor processing for WAV files.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(author, version, about = "Gate and compressor dynamics processor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the gate and compressor
    Process(commands::process::ProcessArgs),

    /// List all parameters with ranges and defaults
    Params(commands::params::ParamsArgs),

    /// List, show and export presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_flags() {
        let cli = Cli::try_parse_from([
            "tandem",
            "process",
            "in.wav",
            "out.wav",
            "--preset",
            "vocal",
            "--param",
            "gate_hold=80",
            "--param",
            "compressor_ratio=3",
            "--no-gate",
            "--bit-depth",
            "24",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Process(_)));

        assert!(
            Cli::try_parse_from(["tandem", "process", "in.wav", "out.wav", "--bit-depth", "12"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_presets_export() {
        let cli =
            Cli::try_parse_from(["tandem", "presets", "export", "drums", "drums.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Presets(_)));
    }
}
