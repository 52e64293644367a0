use std::env;
use std::path::{Path, PathBuf};

use mimicry_config::Configuration;
use mimicry_generate::{GenerateOptions, GenerationEngine};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut configuration_path: Option<PathBuf> = None;
    let mut seed_path: Option<PathBuf> = None;
    let mut options_path: Option<PathBuf> = None;
    let mut count = 1_usize;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => seed_path = args.next().map(PathBuf::from),
            "--options" => options_path = args.next().map(PathBuf::from),
            "--count" => {
                count = args.next().ok_or("missing --count value")?.parse()?;
            }
            _ => {
                if configuration_path.is_none() {
                    configuration_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let configuration_path = configuration_path.ok_or("missing configuration path")?;
    let configuration = Configuration::from_value(load_json(&configuration_path)?)?;
    let seed = seed_path.as_deref().map(load_json).transpose()?;
    let options = match options_path {
        Some(path) => GenerateOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => GenerateOptions::default(),
    };

    let result = GenerationEngine::new(options).generate_from_configuration(
        &configuration,
        seed.as_ref(),
        count,
    )?;
    println!("{}", serde_json::to_string_pretty(&result.output)?);

    for issue in &result.report.warnings {
        eprintln!(
            "warning {} {}: {}",
            issue.code,
            issue.path.as_deref().unwrap_or("-"),
            issue.message
        );
    }

    Ok(())
}

fn load_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let json = serde_json::from_str(&contents)?;
    Ok(json)
}
