use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};

use scenecut::{
    EditorSession, JsonFileSink, JsonFileSinkOpts, ManualTicker, Project, PropertyKey,
    PropertyValue, SeekTarget, SessionConfig,
};

#[derive(Parser, Debug)]
#[command(name = "scenecut", version)]
struct Cli {
    /// Session config JSON (tick interval, frame size).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the id of the scene active at a time.
    Resolve(ResolveArgs),
    /// Print the composite frame of the active scene as JSON.
    Frame(FrameArgs),
    /// Simulate playback, printing one state line per tick.
    Play(PlayArgs),
    /// Write the export manifest.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time in seconds.
    #[arg(long)]
    at: f64,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("cursor").required(true).args(["at", "ratio"])))]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Cursor time in seconds.
    #[arg(long)]
    at: Option<f64>,

    /// Cursor as a fraction of the timeline width.
    #[arg(long)]
    ratio: Option<f64>,

    /// Select this scene instead of the one under the cursor.
    #[arg(long)]
    scene: Option<String>,

    /// Property edit `key=value` applied to the shown scene (repeatable).
    #[arg(long = "set", value_parser = parse_edit)]
    edits: Vec<(PropertyKey, PropertyValue)>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Start time in seconds.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Stop after this many ticks even if playback is still running.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output manifest path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = read_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args, config),
        Command::Frame(args) => cmd_frame(args, config),
        Command::Play(args) => cmd_play(args, config),
        Command::Export(args) => cmd_export(args, config),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("load session config '{}'", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn open_session(path: &Path, config: SessionConfig) -> anyhow::Result<EditorSession> {
    let project = Project::from_path(path)
        .with_context(|| format!("load project '{}'", path.display()))?;
    Ok(EditorSession::new(project, config, ManualTicker::new())?)
}

fn parse_edit(s: &str) -> Result<(PropertyKey, PropertyValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key: PropertyKey = key.trim().parse().map_err(|e| format!("{e}"))?;
    let value = value.trim();
    let value = match value.parse::<f64>() {
        Ok(n) => PropertyValue::Number(n),
        Err(_) => PropertyValue::Text(value.to_owned()),
    };
    Ok((key, value))
}

fn cmd_resolve(args: ResolveArgs, config: SessionConfig) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path, config)?;
    session.seek(SeekTarget::Time(args.at));
    println!(
        "{}",
        session.state().active_scene_id.as_deref().unwrap_or("none")
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs, config: SessionConfig) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path, config)?;
    let target = match (args.at, args.ratio) {
        (Some(at), _) => SeekTarget::Time(at),
        (None, Some(ratio)) => SeekTarget::Ratio(ratio),
        (None, None) => anyhow::bail!("one of --at or --ratio is required"),
    };
    session.seek(target);

    if let Some(id) = args.scene.as_deref()
        && !session.select_scene(id)
    {
        anyhow::bail!("unknown scene '{id}'");
    }

    if let Some(active) = session.state().active_scene_id.clone() {
        for (key, value) in args.edits {
            if !session.set_property(&active, key, value.clone()) {
                tracing::warn!(scene = %active, %key, ?value, "edit not applied");
            }
        }
    } else if !args.edits.is_empty() {
        tracing::warn!("no active scene; edits ignored");
    }

    let frame = session.current_frame();
    println!(
        "{}",
        serde_json::to_string_pretty(&frame).with_context(|| "serialize frame")?
    );
    Ok(())
}

fn cmd_play(args: PlayArgs, config: SessionConfig) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path, config)?;
    session.seek(SeekTarget::Time(args.from));
    session.play()?;

    let mut ticks = 0u64;
    while session.state().is_playing && ticks < args.max_ticks {
        session.step();
        ticks += 1;
        println!(
            "{}",
            serde_json::to_string(session.state()).with_context(|| "serialize state")?
        );
    }
    tracing::info!(ticks, playing = session.state().is_playing, "playback simulation done");
    Ok(())
}

fn cmd_export(args: ExportArgs, config: SessionConfig) -> anyhow::Result<()> {
    let session = open_session(&args.in_path, config)?;
    let mut sink = JsonFileSink::new(JsonFileSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
    });
    session
        .export(&mut sink)
        .with_context(|| format!("export manifest to '{}'", args.out.display()))?;
    Ok(())
}
