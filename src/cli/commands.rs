use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use yolo_dataset_split::config::SplitterConfig;
use yolo_dataset_split::core::{write_manifest, Dataset, Partitioner, TransferMode};

pub struct SplitArgs {
    pub ratio: String,
    pub source: PathBuf,
    pub output: String,
    pub copy: bool,
    pub write_manifest: bool,
}

pub fn split(config: SplitterConfig, args: SplitArgs) -> Result<()> {
    let mode = TransferMode::from_copy_flag(args.copy);
    let mut partitioner = Partitioner::new(config);

    let outcome = partitioner
        .partition(&args.ratio, &args.source, &args.output, mode)
        .with_context(|| format!("splitting {} with ratio {}", args.source.display(), args.ratio))?;

    println!("Dataset written to {}", outcome.output_path.display());
    for split in &outcome.splits {
        println!("  {:<5} {:>6} pairs", split.as_str(), outcome.count(*split));
    }
    println!("  {} classes", outcome.classes.len());

    if args.write_manifest {
        let config = partitioner.config();
        let path = write_manifest(
            config,
            &outcome.output_path,
            &outcome.splits,
            &outcome.classes,
            None,
            config.publish_to_root,
        )
        .context("writing dataset manifest")?;
        println!("Manifest written to {}", path.display());
    } else {
        info!("Manifest writing skipped");
    }

    Ok(())
}

pub fn inspect(config: &SplitterConfig, dir: &Path) -> Result<()> {
    let dataset = Dataset::new(dir, &config.image_extensions);
    let summaries = dataset
        .inspect()
        .with_context(|| format!("inspecting {}", dir.display()))?;

    if summaries.is_empty() {
        warn!("No split directories found under {:?}", dir);
        println!("No splits found in {}", dir.display());
        return Ok(());
    }

    println!("Dataset {}", dataset.dataset_path().display());
    for summary in &summaries {
        println!(
            "  {:<5} {:>6} images {:>6} labels {:>6} unlabeled",
            summary.split.as_str(),
            summary.images,
            summary.labels,
            summary.unlabeled.len()
        );
        for image in &summary.unlabeled {
            println!("    missing label: {}", image.display());
        }
    }

    Ok(())
}
