use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::info;

use assistant_generator::artifact::ArtifactManager;
use assistant_generator::config::Config;
use assistant_generator::logger;
use assistant_generator::{GenerationOutcome, GenerationRequest, Generator};

#[derive(Parser)]
#[command(name = "assistant_generator", about = "Generate an AI assistant program from a task description")]
struct Args {
    /// API key of the chosen provider (falls back to ASSISTANT_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Target language, overriding the one named in the task
    #[arg(short, long)]
    language: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the generated program into this directory
    #[arg(short, long)]
    output: Option<String>,

    /// Write the generated program into the configured artifact directory
    #[arg(short, long)]
    save: bool,

    /// Print the interpreted parameters as JSON and exit
    #[arg(long)]
    show_params: bool,

    /// Print the whole outcome as JSON
    #[arg(long)]
    json: bool,

    /// Plain output without colours
    #[arg(long)]
    headless: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Natural language description of the assistant
    task: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    logger::init(args.verbose, true);
    let mut config = Config::load(&args.config)?;
    config.merge_with_args(args.output.as_deref());
    logger::retune(args.verbose, config.logging.enabled);
    if args.headless {
        colored::control::set_override(false);
    }

    let credential = args
        .api_key
        .clone()
        .or_else(|| env::var("ASSISTANT_API_KEY").ok())
        .unwrap_or_default();
    let mut request = GenerationRequest::new(args.task.join(" "), credential);
    request.language = args.language.clone();

    let generator = Generator::new(config.generation.clone());

    if args.show_params {
        let params = generator.resolve(&request)?;
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let outcome = generator.generate(&request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.status.is_success() {
        print!("{}", outcome.source);
    }

    if outcome.status.is_success() && (args.save || args.output.is_some()) {
        let path = write_artifact(&config, &outcome).await?;
        eprintln!("{} {}", "Saved to".bright_blue(), path.display());
    }

    if outcome.status.is_success() {
        eprintln!("{} {}", "✓".green().bold(), outcome.status.to_string().green());
        Ok(())
    } else {
        eprintln!("{} {}", "✗".red().bold(), outcome.status.to_string().red());
        std::process::exit(1);
    }
}

async fn write_artifact(config: &Config, outcome: &GenerationOutcome) -> Result<PathBuf> {
    let params = outcome
        .params
        .as_ref()
        .context("Successful outcome carries its parameters")?;

    let manager = ArtifactManager::new(PathBuf::from(&config.output.artifact_dir), config.output.write_manifest)?;
    manager.init().await?;

    let metadata = HashMap::from([
        ("api".to_string(), params.api.to_string()),
        ("model".to_string(), params.model.clone()),
        ("features".to_string(), params.features.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(",")),
    ]);
    let name = format!("{}_assistant", params.api);
    let artifact = manager
        .create_artifact(&name, params.language, &outcome.source, metadata)
        .await?;
    info!("Recorded artifact {}", artifact.id);
    Ok(artifact.path)
}
