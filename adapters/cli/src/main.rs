#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Valley Day session.

mod config;
mod map_file;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use valley_core::{Command, Event, Progress};
use valley_system_controls::Controls;
use valley_world::{self as world, query, World};

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Valley Day world simulation", long_about = None)]
struct Args {
    /// Map file with one `x,y=typeId` entry per line
    map: PathBuf,

    /// TOML file overriding world and controls settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input script to replay; a short demo runs when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Log every world event
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Valley Day command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    install_tracing(args.verbose);
    world::init();

    let config = CliConfig::load(args.config.as_deref())?;
    let table = map_file::load(&args.map)?;
    let frames = match &args.script {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            script::parse(&contents)?
        }
        None => script::parse(script::DEMO)?,
    };

    let mut world = World::new(config.world).context("failed to create world")?;
    let mut controls = Controls::new(config.controls);
    let mut progress = Progress::new();
    let frame = Duration::from_millis(args.frame_ms);

    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadMap { table }, &mut progress, &mut events);
    report(&events);

    for input in &frames {
        let mut commands = Vec::new();
        controls.handle(input, frame, &mut commands);
        commands.push(Command::Tick { dt: frame });

        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut progress, &mut events);
        }
        report(&events);
    }

    let actor = query::actor(&world);
    println!(
        "frames: {}, actor: ({:.2}, {:.2}) facing {:?}",
        frames.len(),
        actor.position.x,
        actor.position.y,
        actor.facing
    );
    println!(
        "harvests: {}, capabilities: {:?}",
        progress.harvest_count(),
        progress.capabilities().collect::<Vec<_>>()
    );
    println!(
        "obstacles left: {}, crops growing: {}, items on the ground: {}",
        query::obstacle_view(&world).len(),
        query::crop_view(&world).len(),
        query::item_view(&world).len()
    );
    Ok(())
}

fn install_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } | Event::PhysicsStepped { .. } => {
                tracing::trace!(?event, "world event");
            }
            Event::InteractionRejected { .. } | Event::ObstacleHit { .. } => {
                tracing::debug!(?event, "world event");
            }
            _ => tracing::info!(?event, "world event"),
        }
    }
}
