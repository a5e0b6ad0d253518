//! figment - compare images by stacking them with a difference blend

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figment_app::config::CONFIG_FILE;
use figment_app::{logging, DropItem, FigmentConfig, Session, ViewState};
use figment_core::{MemoryStore, MoveCommand, Store};
use figment_image::{preferred_canvas_size, Drawable, ImageData, ImageSource};
use figment_paint::Size;

/// Figment image comparison tool
#[derive(Parser)]
#[command(name = "figment", version, about)]
struct Cli {
    /// Path to figment.toml (defaults to ./figment.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how each file parses and the canvas size they would share
    Inspect {
        /// Image files, `file://` URIs or `data:` URIs
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Stack images into a fresh scenario and print the rendered frame as JSON
    Compare {
        /// Image files, `file://` URIs or `data:` URIs, bottom layer first
        #[arg(required = true)]
        files: Vec<String>,

        /// Viewport used when no layer has a known size
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        viewport: Size,

        /// Select layers by display position
        #[arg(long = "select")]
        select: Vec<usize>,

        /// Hide layers by display position
        #[arg(long = "hide")]
        hide: Vec<usize>,

        /// Move commands applied to the selection, in order (e.g. leap-up)
        #[arg(long = "move", value_parser = parse_move)]
        moves: Vec<MoveCommand>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Write a default figment.toml
    Init {
        /// Target file or directory
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_size(value: &str) -> Result<Size, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width: f32 = width.trim().parse().map_err(|err| format!("bad width: {err}"))?;
    let height: f32 = height.trim().parse().map_err(|err| format!("bad height: {err}"))?;
    Ok(Size::new(width, height))
}

fn parse_move(value: &str) -> Result<MoveCommand, String> {
    MoveCommand::from_name(value).ok_or_else(|| {
        let names: Vec<&str> = MoveCommand::ALL.iter().map(|command| command.name()).collect();
        format!("unknown move {value:?}; expected one of {}", names.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Init { path, force } = &cli.command {
        logging::init(&Default::default());
        return init(path, *force);
    }

    let config = FigmentConfig::discover(cli.config.as_deref())?;
    logging::init(&config.log);

    match cli.command {
        Command::Inspect { files } => inspect(&config, &files),
        Command::Compare {
            files,
            viewport,
            select,
            hide,
            moves,
            pretty,
        } => compare(config, files, viewport, &select, &hide, &moves, pretty).await,
        Command::Init { .. } => Ok(()),
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    let target = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };

    if target.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let content = FigmentConfig::default().to_toml()?;
    fs::write(&target, content).with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(path = %target.display(), "wrote default configuration");
    Ok(())
}

fn inspect(config: &FigmentConfig, files: &[String]) -> Result<()> {
    let mut drawables = Vec::with_capacity(files.len());

    for file in files {
        let data = ImageData::load(ImageSource::from_uri(file))
            .with_context(|| format!("Failed to load {file}"))?;
        let drawable = Drawable::parse(&data.bytes, config.parse_options());

        let kind = match &drawable {
            Drawable::Raster { .. } => "raster",
            Drawable::Vector { tree: Some(_), .. } => "vector",
            Drawable::Vector { tree: None, .. } => "vector (unparsed)",
            Drawable::None => "not an image",
        };
        match drawable.size() {
            Some(size) => println!("{file}: {kind} {}x{}", size.width, size.height),
            None => println!("{file}: {kind}"),
        }
        drawables.push(drawable);
    }

    match preferred_canvas_size(&drawables) {
        Some(size) => println!("canvas: {}x{}", size.width, size.height),
        None => println!("canvas: fills the viewport"),
    }
    Ok(())
}

async fn compare(
    config: FigmentConfig,
    files: Vec<String>,
    viewport: Size,
    select: &[usize],
    hide: &[usize],
    moves: &[MoveCommand],
    pretty: bool,
) -> Result<()> {
    let store = match &config.store.snapshot {
        Some(path) => MemoryStore::open(path)?,
        None => MemoryStore::new(),
    };
    let mut session = Session::new(store, config);

    let scenario = session.add_scenario()?;
    let items = files
        .iter()
        .map(|file| DropItem::new(ImageSource::from_uri(file)))
        .collect();
    session
        .drop_items(scenario, items)
        .await
        .context("Failed to load images")?;

    let hidden: Vec<_> = session
        .scenario(scenario)
        .map(|target| {
            target
                .ordered_layers()
                .enumerate()
                .filter(|(position, _)| hide.contains(position))
                .map(|(_, layer)| layer.id())
                .collect()
        })
        .unwrap_or_default();
    for id in hidden {
        session.toggle_hidden(scenario, id)?;
    }

    session.select_positions(scenario, select);
    for command in moves {
        let moved = session.run_command(*command);
        tracing::debug!(command = command.label(), moved, "applied move");
    }
    session.store_mut().save()?;

    let frame = session
        .render(scenario, viewport, ViewState::default())
        .context("Scenario disappeared while rendering")?;

    let json = if pretty {
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string(&frame)?
    };
    println!("{json}");
    Ok(())
}
