//! File-based gate and compressor processing.

use super::common::{apply_param_overrides, load_preset, parse_key_val};
use crate::wav::{WavSpec, read_wav_planar, write_wav_planar};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tandem_core::{DEFAULT_MAX_BLOCK_SIZE, DynamicsEngine, level_db};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (any channel count)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or path (TOML)
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides applied after the preset (e.g., "gate_hold=120")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size
    #[arg(long, default_value_t = DEFAULT_MAX_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = ["16", "24", "32"])]
    bit_depth: String,

    /// Bypass the gate
    #[arg(long)]
    no_gate: bool,

    /// Bypass the compressor
    #[arg(long)]
    no_compressor: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    let bit_depth: u16 = args.bit_depth.parse()?;

    println!("Reading {}...", args.input.display());
    let (mut channels, spec) = read_wav_planar(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    let num_channels = channels.len();
    let frames = channels.first().map_or(0, Vec::len);

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        num_channels,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let mut engine = DynamicsEngine::new(sample_rate, num_channels);
    {
        let params = engine.params_mut();
        if let Some(name) = &args.preset {
            let preset = load_preset(name)?;
            println!("Loading preset: {}", preset.name);
            preset.apply_to(params)?;
        }
        apply_param_overrides(params, &args.param)?;
        if args.no_gate {
            params.set_gate_enabled(false);
        }
        if args.no_compressor {
            params.set_compressor_enabled(false);
        }
    }
    engine.prepare(sample_rate, args.block_size, num_channels);

    let params = engine.params();
    tracing::info!(
        gate = params.gate_enabled(),
        compressor = params.compressor_enabled(),
        block_size = args.block_size,
        "processing"
    );
    if !params.gate_enabled() && !params.compressor_enabled() {
        tracing::warn!("both stages disabled; output will equal input");
    }

    let input_stats = Stats::measure(&channels);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut start = 0;
    while start < frames {
        let end = (start + args.block_size).min(frames);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|buf| &mut buf[start..end])
            .collect();
        engine.process_block(&mut block);
        pb.set_position(end as u64);
        start = end;
    }

    pb.finish_with_message("done");

    let output_stats = Stats::measure(&channels);
    println!("\nStats:");
    println!("  Input:  {input_stats}");
    println!("  Output: {output_stats}");
    println!(
        "  Final gate {}, compressor reduction {:.1} dB",
        if engine.gate_is_open() { "open" } else { "closed" },
        engine.compressor_gain_reduction_db()
    );

    let out_spec = WavSpec {
        channels: num_channels as u16,
        sample_rate: spec.sample_rate,
        bits_per_sample: bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav_planar(&args.output, &channels, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Peak and RMS across all channels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stats {
    peak: f32,
    rms: f32,
}

impl Stats {
    fn measure(channels: &[Vec<f32>]) -> Self {
        let count: usize = channels.iter().map(Vec::len).sum();
        if count == 0 {
            return Self { peak: 0.0, rms: 0.0 };
        }

        let samples = channels.iter().flatten();
        let peak = samples.clone().map(|s| s.abs()).fold(0.0, f32::max);
        let sum: f64 = samples.map(|&s| f64::from(s) * f64::from(s)).sum();
        let rms = (sum / count as f64).sqrt() as f32;
        Self { peak, rms }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RMS {:.1} dB, Peak {:.1} dB",
            level_db(self.rms),
            level_db(self.peak)
        )
    }
}
