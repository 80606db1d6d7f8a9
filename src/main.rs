//! CLI binary for splitting YOLO datasets

mod cli;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
