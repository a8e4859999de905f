use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use neuro_photoshoot::catalog::{PROFESSIONAL_POSES, PresetCatalog};
use neuro_photoshoot::config::{Config, Provider, RuntimeConfig};
use neuro_photoshoot::editor::{EditSession, PostHocEditor};
use neuro_photoshoot::scenarios::{builtin_scenarios, find_scenario};
use neuro_photoshoot::selection::{LensMm, LightQuality, Palette, SessionDraft, StudioDetails};
use neuro_photoshoot::{
    BATCH_SIZE, BatchOrchestrator, ConfirmedSession, ImageSynthesizer, OutputDocument,
    create_synthesizer, studio,
};

#[derive(Parser)]
#[command(name = "neuro-photoshoot")]
#[command(about = "Studio photoshoot generator driven by an image synthesis API")]
struct Cli {
    /// Override the configured provider (auto, gemini, placeholder)
    #[arg(long, global = true)]
    provider: Option<Provider>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch from a session file
    Run {
        /// Session draft JSON (studio, looks, poses, camera_angle, style_level)
        #[arg(long)]
        session: PathBuf,
        /// Subject photo; overrides subject_photo from the session file
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Directory for document.json and images (defaults to output.dir/session-<timestamp>)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print the compiled shot list without calling the provider
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit one image of a result document
    Edit {
        /// Result document JSON
        #[arg(long)]
        document: PathBuf,
        /// Image id (1-based)
        #[arg(long)]
        image: u32,
        /// Edit instruction; repeat to chain edits
        #[arg(long = "instruction", required = true)]
        instructions: Vec<String>,
        /// Write the final candidate back into the document
        #[arg(long)]
        commit: bool,
    },
    /// Render a studio backdrop preview from a description
    Studio {
        #[arg(long)]
        prompt: String,
        #[arg(long, value_enum, default_value_t = LightQuality::Soft)]
        light: LightQuality,
        #[arg(long, default_value_t = 50)]
        lens: u32,
        #[arg(long, value_enum, default_value_t = Palette::Neutral)]
        palette: Palette,
    },
    /// List studio and look presets
    Presets,
    /// List the professional pose library
    Poses,
    /// List quick-start scenarios, or print a session draft for one
    Scenarios {
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    // stdout carries JSON; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(RuntimeConfig::load_from_env().log_level)
                .unwrap_or_else(|_| EnvFilter::new("neuro_photoshoot=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(provider) = cli.provider {
        config
            .override_provider(provider)
            .context("Invalid --provider override")?;
    }

    match cli.command {
        Commands::Run {
            session,
            photo,
            out_dir,
            dry_run,
        } => run_batch(&config, &session, photo.as_deref(), out_dir, dry_run).await,
        Commands::Edit {
            document,
            image,
            instructions,
            commit,
        } => run_edit(&config, &document, image, &instructions, commit).await,
        Commands::Studio {
            prompt,
            light,
            lens,
            palette,
        } => {
            let details = StudioDetails {
                light,
                lens: LensMm::try_from(lens)?,
                palette,
            };
            let synth = synthesizer(&config)?;
            let selection = studio::design_studio(synth.as_ref(), &prompt, details).await?;
            println!("{}", serde_json::to_string_pretty(&selection)?);
            Ok(())
        }
        Commands::Presets => {
            let catalog = PresetCatalog::builtin();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "studios": catalog.studios(),
                    "looks": catalog.looks(),
                }))?
            );
            Ok(())
        }
        Commands::Poses => {
            let poses: Vec<_> = PROFESSIONAL_POSES
                .iter()
                .map(|(group, pose)| serde_json::json!({ "group": group, "pose": pose }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&poses)?);
            Ok(())
        }
        Commands::Scenarios { id } => {
            match id {
                Some(id) => {
                    let scenario = find_scenario(&id)?
                        .with_context(|| format!("Unknown scenario '{}'", id))?;
                    println!("{}", serde_json::to_string_pretty(&scenario.session(None))?);
                }
                None => println!("{}", serde_json::to_string_pretty(&builtin_scenarios()?)?),
            }
            Ok(())
        }
    }
}

fn synthesizer(config: &Config) -> Result<Arc<dyn ImageSynthesizer>> {
    Ok(create_synthesizer(
        &config.synthesis,
        config.runtime.api_key.as_deref(),
    )?)
}

async fn run_batch(
    config: &Config,
    session_path: &Path,
    photo: Option<&Path>,
    out_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(session_path)
        .with_context(|| format!("Failed to read session file {}", session_path.display()))?;
    let mut draft: SessionDraft =
        serde_json::from_str(&raw).context("Failed to parse session file")?;
    if let Some(photo) = photo {
        draft.subject_photo = Some(photo_data_url(photo)?);
    }

    let orchestrator = BatchOrchestrator::new(synthesizer(config)?);

    if dry_run {
        let session = ConfirmedSession::from_draft(&draft)?;
        for shot in orchestrator.shot_list(&session) {
            println!("--- shot {} ---\n{}\n", shot.id, shot.instruction);
        }
        return Ok(());
    }

    let result = orchestrator
        .run(&draft, |done| info!("Generated {}/{}", done, BATCH_SIZE))
        .await;
    let document = match result {
        Ok(document) => document,
        Err(err) if err.is_rate_limited() => {
            error!("Request limit reached. Check your plan and try again later.");
            return Err(err.into());
        }
        Err(err) => {
            error!("Generation failed: {}", err);
            return Err(err.into());
        }
    };

    let dir = out_dir.unwrap_or_else(|| {
        Path::new(&config.output.dir).join(format!(
            "session-{}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    document.write_bundle(&dir)?;
    println!("{}", document.to_json_pretty()?);
    Ok(())
}

async fn run_edit(
    config: &Config,
    document_path: &Path,
    image_id: u32,
    instructions: &[String],
    commit: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(document_path)
        .with_context(|| format!("Failed to read document {}", document_path.display()))?;
    let document = OutputDocument::from_json(&raw)?;
    let editor = PostHocEditor::new(synthesizer(config)?);

    let session = match EditSession::open(&document, image_id)?
        .propose_all(&editor, instructions)
        .await
    {
        Ok(session) => session,
        Err(err) if err.is_rate_limited() => {
            error!("Request limit reached. Check your plan and try again later.");
            return Err(err.into());
        }
        Err(err) => {
            error!("Edit of image {} failed, document left unchanged: {}", image_id, err);
            return Err(err.into());
        }
    };

    let Some(candidate) = session.candidate() else {
        anyhow::bail!("No edit was applied to image {}", image_id);
    };
    if commit {
        let updated = session.commit(&document)?;
        std::fs::write(document_path, updated.to_json_pretty()?)?;
        info!("Saved edit of image {} to {}", image_id, document_path.display());
    }
    println!("{}", candidate);
    Ok(())
}

fn photo_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read photo {}", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("png") => "image/png",
        other => anyhow::bail!("Unsupported photo type {:?}", other),
    };
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
