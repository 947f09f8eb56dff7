mod app;
mod config;
mod food;
mod game;
mod geometry;
mod input;
mod random;
mod render;
mod scheduler;
mod score;
mod session;
mod snake;
mod term;
mod timer;
mod world;

#[cfg(test)]
mod fakes;

use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::GameConfig;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> Result<()> {
    let config = GameConfig::parse();
    config.validate().context("invalid game configuration")?;
    init_logging(&config)?;

    let mut app = app::App::new(&config)?;
    app.initialize()?;

    if app.show_intro()? {
        // The loop takes care of restoring the terminal when the player quits
        app.play()?;
    }

    Ok(())
}

/// The terminal belongs to the game, so logs only go to `--log-file`.
fn init_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level)
        .init();

    Ok(())
}
