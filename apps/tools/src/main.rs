use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use analysis_client::{AnalysisClient, AnalysisEndpoints, AnalysisKind, ImageUpload};
use shared::{catalog::ReefCatalog, domain::ReefName};

#[derive(Parser, Debug)]
#[command(about = "CoralWatch operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every reef in the built-in catalog.
    ListReefs,
    /// Show a single reef record.
    ShowReef { name: String },
    /// Upload an image to an inference endpoint and print the JSON response.
    Analyze {
        /// Analysis to run: "coral-health" or "debris".
        kind: String,
        image: std::path::PathBuf,
        /// Override the endpoint configured for this analysis kind.
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    match cli.command {
        Command::ListReefs => {
            let catalog = ReefCatalog::builtin();
            for reef in catalog.iter() {
                println!(
                    "{:<28} {:<16} {:<12} lat {} lon {}",
                    reef.name,
                    reef.country,
                    reef.status,
                    reef.coordinates.formatted_lat(),
                    reef.coordinates.formatted_lon(),
                );
            }
        }
        Command::ShowReef { name } => {
            let catalog = ReefCatalog::builtin();
            let Some(reef) = catalog.get(&ReefName::new(name.as_str())) else {
                bail!("no reef named '{name}' in the catalog");
            };
            println!("{}", reef.name);
            println!("  country:     {}", reef.country);
            println!("  status:      {}", reef.status);
            println!(
                "  coordinates: {}, {}",
                reef.coordinates.formatted_lat(),
                reef.coordinates.formatted_lon()
            );
            println!("  {}", reef.description);
        }
        Command::Analyze {
            kind,
            image,
            endpoint,
        } => {
            let kind = match kind.as_str() {
                "coral-health" => AnalysisKind::CoralHealth,
                "debris" => AnalysisKind::DebrisDetection,
                other => bail!("unknown analysis kind '{other}' (expected 'coral-health' or 'debris')"),
            };

            let defaults = AnalysisEndpoints::default();
            let endpoints = match (&endpoint, kind) {
                (Some(url), AnalysisKind::CoralHealth) => {
                    AnalysisEndpoints::from_urls(url, defaults.debris_detection.as_str())?
                }
                (Some(url), AnalysisKind::DebrisDetection) => {
                    AnalysisEndpoints::from_urls(defaults.coral_health.as_str(), url)?
                }
                (None, _) => defaults,
            };

            let filename = image
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload.jpg")
                .to_string();
            let bytes = tokio::fs::read(&image).await?;

            let client = AnalysisClient::new(endpoints);
            let result = client
                .analyze(
                    kind,
                    ImageUpload {
                        filename,
                        mime_type: None,
                        bytes,
                    },
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
