use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Rewrites permissive JS-object text into strict JSON, one document per
/// line.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// File to read; reads from stdin when omitted.
    path: Option<PathBuf>,

    /// Maximum nesting depth allowed before the transform fails.
    #[arg(long, default_value_t = 2048)]
    max_depth: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = match &args.path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let options = relaxson::TransformerOptions::builder()
        .with_max_depth(args.max_depth)
        .build();

    let mut count = 0usize;
    for doc in relaxson::transform_documents_with_options(&input, options) {
        let doc = doc.context("failed to rewrite document")?;
        count += 1;
        log::debug!("rewrote document {count} ({} bytes)", doc.len());
        println!("{}", String::from_utf8_lossy(&doc));
    }

    log::info!("rewrote {count} document(s)");
    Ok(())
}
