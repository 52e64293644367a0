use std::env;
use std::path::PathBuf;

use mimicry_config::{Configuration, validate_configuration};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().map(PathBuf::from).ok_or("missing configuration path")?;
    if args.next().is_some() {
        return Err("unexpected argument".into());
    }

    let contents = std::fs::read_to_string(&path)?;
    let configuration = Configuration::from_value(serde_json::from_str(&contents)?)?;

    match validate_configuration(&configuration) {
        Ok(summary) => {
            println!(
                "configuration valid: {} fields, {} links",
                summary.fields, summary.links
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("configuration validation failed");
            eprintln!("  {err}");
            std::process::exit(1);
        }
    }
}
