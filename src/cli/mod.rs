pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use yolo_dataset_split::config::SplitterConfig;
use yolo_dataset_split::logging::setup_logging;

#[derive(Parser)]
#[command(name = "yolo-dataset-split")]
#[command(about = "Split a YOLO image/label pool into train/val/test", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root (source dirs resolve against it, logs and the published manifest land in it)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Only log to stdout
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition a source pool and write the dataset manifest
    Split {
        /// Ratio train:val[:test], e.g. 7:2:1 or 8:2
        #[arg(long)]
        ratio: String,
        /// Source pool with images/, labels/ and labels.txt
        #[arg(long, default_value = "dataset")]
        source: PathBuf,
        /// Name of the output dataset directory
        #[arg(long, default_value = "dataset")]
        output: String,
        /// Override the output root (default <root>/outputs)
        #[arg(long)]
        output_root: Option<PathBuf>,
        /// Move files out of the source pool instead of copying
        #[arg(long = "move")]
        move_files: bool,
        /// Random seed for both splitting passes
        #[arg(long)]
        seed: Option<u64>,
        /// Manifest file name (.yaml is appended if missing)
        #[arg(long)]
        manifest: Option<String>,
        /// Do not copy the manifest to the project root
        #[arg(long)]
        no_publish: bool,
        /// Skip writing the manifest
        #[arg(long)]
        no_manifest: bool,
    },
    /// Count image/label pairs per split of a partitioned dataset
    Inspect {
        /// Dataset directory containing images/<split> and labels/<split>
        dir: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SplitterConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SplitterConfig::default(),
    };
    if let Some(root) = cli.root {
        config.root_dir = root;
    }

    let log_dir = (!cli.no_log_file).then(|| config.root_dir.join("logs"));
    setup_logging(log_dir.as_deref(), "info").context("setting up logging")?;

    match cli.command {
        Commands::Split {
            ratio,
            source,
            output,
            output_root,
            move_files,
            seed,
            manifest,
            no_publish,
            no_manifest,
        } => {
            if let Some(output_root) = output_root {
                config.output_root = Some(output_root);
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(manifest) = manifest {
                config.manifest_name = manifest;
            }
            if no_publish {
                config.publish_to_root = false;
            }
            commands::split(
                config,
                commands::SplitArgs {
                    ratio,
                    source,
                    output,
                    copy: !move_files,
                    write_manifest: !no_manifest,
                },
            )
        }
        Commands::Inspect { dir } => commands::inspect(&config, &dir),
    }
}
