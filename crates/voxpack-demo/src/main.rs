//! Demo binary that fills one chunk section and reports how its storage repacks.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p voxpack-demo -- --distinct 40` to stay paletted.

mod workload;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use voxpack_array::{ArrayError, BlockArray, LightArray, SectionArray};
use voxpack_config::{CliArgs, Config, default_config_dir};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .unwrap_or_else(|| config_dir.join("logs"));
    voxpack_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), ArrayError> {
    let mut blocks = BlockArray::with_limits(config.limits)?;
    info!(
        bits = blocks.bits_per_value(),
        bytes = blocks.storage_bytes(),
        "Created empty block array"
    );

    let (written, transitions) =
        workload::fill_blocks(&mut blocks, config.demo.distinct_values, config.demo.seed)?;
    for t in &transitions {
        info!(
            index = t.index,
            bits = t.bits,
            direct = t.direct,
            "Block array repacked"
        );
    }

    let mismatches = workload::count_mismatches(&blocks, &written)?;
    if mismatches > 0 {
        warn!(mismatches, "Read-back differs from written values");
    }
    info!(
        bits = blocks.bits_per_value(),
        palette_len = blocks.palette().map_or(0, <[u64]>::len),
        distinct = blocks.count_distinct()?,
        bytes = blocks.storage_bytes(),
        "Section filled"
    );

    // Overwrite most of the section with one value, then compact.
    let keep = blocks.get(0)?;
    for index in 1..blocks.len() {
        blocks.set(index, keep)?;
    }
    blocks.compact()?;
    info!(
        bits = blocks.bits_per_value(),
        palette = ?blocks.palette(),
        bytes = blocks.storage_bytes(),
        "Compacted after flattening"
    );

    let mut light = LightArray::new();
    workload::fill_sky_light(&mut light, config.demo.light_falloff)?;
    let mut lit = 0usize;
    for level in light.values() {
        if level? > 0 {
            lit += 1;
        }
    }
    info!(lit, bytes = light.to_bytes().len(), "Sky light filled");

    Ok(())
}
