// vidbatch-cli/src/config.rs
//
// Resolves the effective BatchConfig: configuration file first, then
// command-line overrides, then validation.

use crate::cli::RunArgs;
use crate::error::CliResult;

use vidbatch_core::config::{BatchConfig, BatchConfigBuilder};

/// Builds and validates the configuration for a run.
pub fn resolve_config(args: &RunArgs) -> CliResult<BatchConfig> {
    let base = match &args.config {
        Some(path) => BatchConfig::from_file(path)?,
        None => BatchConfig::default(),
    };

    let mut builder = BatchConfigBuilder::from_config(base);
    if let Some(encoder) = &args.encoder {
        builder = builder.encoder_path(encoder);
    }
    if let Some(mask) = &args.input_mask {
        builder = builder.input_mask(mask);
    }
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(codec) = &args.codec {
        builder = builder.video_codec(codec);
    }
    if let Some(quality) = args.quality {
        builder = builder.quality(quality);
    }
    if args.overwrite {
        builder = builder.overwrite_existing(true);
    }
    if args.no_hwaccel {
        builder = builder.hwaccel(false);
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}
