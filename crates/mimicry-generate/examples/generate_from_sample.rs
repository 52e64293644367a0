use std::env;
use std::path::PathBuf;

use mimicry_generate::{GenerateOptions, GenerationEngine};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut sample_path: Option<PathBuf> = None;
    let mut options_path: Option<PathBuf> = None;
    let mut count = 1_usize;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => options_path = args.next().map(PathBuf::from),
            "--count" => {
                count = args.next().ok_or("missing --count value")?.parse()?;
            }
            _ => {
                if sample_path.is_none() {
                    sample_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let sample_path = sample_path.ok_or("missing sample path")?;
    let sample: Value = serde_json::from_str(&std::fs::read_to_string(&sample_path)?)?;
    let options = match options_path {
        Some(path) => GenerateOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => GenerateOptions::default(),
    };

    let result = GenerationEngine::new(options).generate_from_sample(&sample, count)?;
    println!("{}", serde_json::to_string_pretty(&result.output)?);
    eprintln!(
        "generated {} item(s) with seed {} in {} ms",
        result.report.items_generated, result.report.run_seed, result.report.duration_ms
    );

    Ok(())
}
