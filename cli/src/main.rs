mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fridgechef_core::ai::{
    generate_recipes, identify_ingredients, AiConfig, HttpAiClient, ImageData,
};
use fridgechef_core::capture::{CaptureProvider, FacingMode, StillImageCamera};
use fridgechef_core::{AppState, Orchestrator};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fridgechef")]
#[command(about = "Snap your fridge, get recipe ideas", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a photo, identify ingredients and suggest recipes
    Cook {
        /// Image file used as the camera feed
        #[arg(long)]
        image: PathBuf,
        /// Which way the camera that took the photo was facing
        #[arg(long, value_enum, default_value_t = Facing::Any)]
        facing: Facing,
        /// Print the final session as JSON
        #[arg(long)]
        json: bool,
    },
    /// Only identify the ingredients in a photo
    Identify {
        /// Image file to analyze
        #[arg(long)]
        image: PathBuf,
        /// Print the ingredient list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Only suggest recipes for the given ingredients
    Recipes {
        /// Ingredient names, e.g. egg spinach feta
        #[arg(required = true)]
        ingredients: Vec<String>,
        /// Print the recipes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective AI configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Facing {
    Environment,
    User,
    Any,
}

impl From<Facing> for FacingMode {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::Environment => FacingMode::Environment,
            Facing::User => FacingMode::User,
            Facing::Any => FacingMode::Any,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Fail on missing credentials before touching the camera.
    let config = AiConfig::from_env().context("Configuration error")?;

    match cli.command {
        Commands::Cook {
            image,
            facing,
            json,
        } => cook(config, &image, facing.into(), json).await,
        Commands::Identify { image, json } => identify(config, &image, json).await,
        Commands::Recipes { ingredients, json } => recipes(config, &ingredients, json).await,
        Commands::Config => {
            display::print_config(&config);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("fridgechef_core=debug,fridgechef=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

async fn cook(config: AiConfig, image: &Path, facing: FacingMode, json: bool) -> Result<()> {
    let client = HttpAiClient::new(config).context("Failed to create AI client")?;
    let mut orchestrator = Orchestrator::new(Arc::new(client));

    orchestrator.start()?;

    let mut provider = CaptureProvider::new(StillImageCamera::new(image).facing(facing));
    if let Err(e) = provider.activate() {
        orchestrator.cancel_capture()?;
        bail!("{}", e);
    }
    tracing::debug!(session_id = %orchestrator.session().id(), "Camera ready");

    let mut progress = orchestrator.subscribe();
    let mut last_status: Option<String> = None;
    let mut watching = true;

    let outcome = {
        let run = orchestrator.capture_and_process(&mut provider);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(run, ctrl_c);

        loop {
            tokio::select! {
                result = &mut run => break Some(result),
                _ = &mut ctrl_c => break None,
                changed = progress.changed(), if watching => {
                    if changed.is_err() {
                        watching = false;
                        continue;
                    }
                    let status = progress.borrow_and_update().status.clone();
                    if status != last_status {
                        if let (false, Some(line)) = (json, status.as_deref()) {
                            display::print_status(line);
                        }
                        last_status = status;
                    }
                }
            }
        }
    };
    provider.deactivate();

    let Some(result) = outcome else {
        tracing::info!("Interrupted, abandoning the run");
        orchestrator.reset();
        bail!("Cancelled");
    };
    let state = result?;

    if json {
        display::print_session_json(orchestrator.session())?;
    } else {
        display::print_session(orchestrator.session());
    }

    if state == AppState::Error {
        std::process::exit(1);
    }
    Ok(())
}

async fn identify(config: AiConfig, image: &Path, json: bool) -> Result<()> {
    let data = std::fs::read(image)
        .with_context(|| format!("Failed to read image {}", image.display()))?;
    let mime_type = mime_type_for(&data)?;

    let client = HttpAiClient::new(config).context("Failed to create AI client")?;
    let result = identify_ingredients(&client, ImageData::from_bytes(&data, mime_type))
        .await
        .context("Could not identify ingredients from the image")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.ingredients)?);
    } else if result.ingredients.is_empty() {
        println!("No ingredients found.");
    } else {
        display::print_ingredients(&result.ingredients);
    }
    Ok(())
}

async fn recipes(config: AiConfig, ingredients: &[String], json: bool) -> Result<()> {
    let client = HttpAiClient::new(config).context("Failed to create AI client")?;
    let result = generate_recipes(&client, ingredients)
        .await
        .context("Could not generate recipes")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.recipes)?);
    } else if result.recipes.is_empty() {
        println!("No recipes suggested.");
    } else {
        display::print_recipes(&result.recipes);
    }
    Ok(())
}

/// Detect the MIME type of an image from its magic bytes.
fn mime_type_for(data: &[u8]) -> Result<&'static str> {
    let format = image::guess_format(data).context("Unrecognized image format")?;
    match format {
        image::ImageFormat::Jpeg
        | image::ImageFormat::Png
        | image::ImageFormat::Gif
        | image::ImageFormat::WebP => Ok(format.to_mime_type()),
        other => bail!("Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP", other),
    }
}
