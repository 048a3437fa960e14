use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "animegen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one generation job and write the placeholder image.
    Generate(GenerateArgs),
    /// List the built-in styles.
    Styles,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Scene description.
    #[arg(long)]
    prompt: String,

    /// Style id (unknown ids fall back to the default treatment).
    #[arg(long, default_value = animegen::DEFAULT_STYLE_ID)]
    style: String,

    /// Clip duration in seconds (3..=30).
    #[arg(long, default_value_t = 5)]
    duration: u32,

    /// Frames per second (12, 24, 30 or 60).
    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// Output image path.
    #[arg(long, default_value = animegen::DOWNLOAD_FILE_NAME)]
    out: PathBuf,

    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print the image as a data URI on stdout.
    #[arg(long)]
    data_uri: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Styles => cmd_styles(),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<animegen::GeneratorConfig> {
    match path {
        Some(p) => animegen::GeneratorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(animegen::GeneratorConfig::default()),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let artifact = rt.block_on(run_job(&cfg, &args))?;

    artifact
        .write_to(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    let m = artifact.metrics();
    eprintln!(
        "wrote {} ({} bytes, {} frames)",
        args.out.display(),
        artifact.bytes().len(),
        m.total_frames
    );
    if args.data_uri {
        println!("{}", artifact.to_data_uri());
    }
    Ok(())
}

async fn run_job(
    cfg: &animegen::GeneratorConfig,
    args: &GenerateArgs,
) -> anyhow::Result<std::sync::Arc<animegen::Artifact>> {
    let controller = animegen::JobController::new(cfg)?;
    let mut events = controller.subscribe();

    match controller.submit(args.prompt.clone(), args.style.clone(), args.duration, args.fps)? {
        animegen::StartOutcome::Started { .. } => {}
        animegen::StartOutcome::IgnoredBlankPrompt => anyhow::bail!("prompt is empty"),
        animegen::StartOutcome::IgnoredBusy => anyhow::bail!("a job is already running"),
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                controller.reset();
                anyhow::bail!("cancelled");
            }
            ev = events.recv() => match ev {
                Ok(animegen::JobEvent::Progress { progress, .. }) if progress % 10 == 0 => {
                    eprintln!("{}", animegen::JobState::Running { progress }.status_line());
                }
                Ok(animegen::JobEvent::Completed { artifact, .. }) => return Ok(artifact),
                Ok(animegen::JobEvent::Failed { reason, .. }) => anyhow::bail!(reason),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => anyhow::bail!("job controller stopped"),
            },
        }
    }
}

fn cmd_styles() -> anyhow::Result<()> {
    let catalog = animegen::StyleCatalog::builtin();
    for s in catalog.iter() {
        let (a, b) = (s.color_stops.start, s.color_stops.end);
        println!(
            "{:<14} {:<14} #{:02X}{:02X}{:02X} -> #{:02X}{:02X}{:02X}  {}",
            s.id, s.display_name, a.r, a.g, a.b, b.r, b.g, b.b, s.description
        );
    }
    Ok(())
}
