use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use maintenance_api::openapi::ApiDocV1;
use utoipa::OpenApi;

/// Writes the OpenAPI document of the v1 API to disk
#[derive(Debug, Parser)]
#[command(name = "openapi-export", version)]
struct Args {
    /// Destination file
    #[arg(long, default_value = "openapi/maintenance-api.v1.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let openapi = ApiDocV1::openapi();
    let json = serde_json::to_string_pretty(&openapi)?;

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("OpenAPI spec written to {}", args.output.display());
    Ok(())
}
