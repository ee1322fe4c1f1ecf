use anyhow::{Context, Result};
use clap::Parser;
use parkeervakken_regimes::{
    dedup::SeenIds,
    import::{ImportOutput, import_shard},
    records::list_shards,
    sign_types::SignTypes,
    sink::{JsonFileSink, RecordSink},
};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
struct Args {
    /// Directory holding the `*.jsonl` shards of one survey export
    #[clap(long)]
    input_dir_path: PathBuf,
    #[clap(long)]
    output_directory: PathBuf,
    /// Directory holding `sign_types.toml`
    #[clap(long, default_value = "./config")]
    config_path: PathBuf,
    /// Import shards in parallel. Every shard then skips only its own duplicates.
    #[clap(long)]
    parallel_shards: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkeervakken_regimes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let sign_types = SignTypes::load(&args.config_path).context("Failed to load sign types")?;
    let shards = list_shards(&args.input_dir_path)?;
    info!("Found {} shards in {}", shards.len(), args.input_dir_path.display());

    let output = if args.parallel_shards {
        shards
            .par_iter()
            .map(|path| import_shard(path, &mut SeenIds::new(), &sign_types))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .fold(ImportOutput::default(), |mut output, shard| {
                output.merge(shard);
                output
            })
    } else {
        let mut seen = SeenIds::new();
        let mut output = ImportOutput::default();
        for path in &shards {
            output.merge(import_shard(path, &mut seen, &sign_types)?);
        }
        output
    };

    let mut sink = JsonFileSink::new(&args.output_directory)?;
    sink.write(&output.emitted, &output.duplicates)?;
    info!("{}", output.report());

    Ok(())
}
