use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use crossterm::style::Color;
use tracing::Level;

use crate::geometry::{Bounds, Size};
use crate::snake::{EntityStyle, TAIL_STRIDE};

/// Arcade snake on a pixel canvas, played in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct GameConfig {
    /// Width of the play area in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 400)]
    pub canvas_width: i32,
    /// Height of the play area in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 240)]
    pub canvas_height: i32,
    /// Pixels covered by one terminal column.
    #[arg(long, value_name = "PIXELS", default_value_t = 5)]
    pub px_per_column: i32,
    /// Pixels covered by one terminal row.
    #[arg(long, value_name = "PIXELS", default_value_t = 10)]
    pub px_per_row: i32,
    /// Pixels the snake moves every frame.
    #[arg(long, value_name = "PIXELS", default_value_t = 3)]
    pub speed: i32,
    /// Snake head and segment size as WIDTHxHEIGHT.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "10x10")]
    pub snake_size: Size,
    /// Food size as WIDTHxHEIGHT.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "10x10")]
    pub food_size: Size,
    #[arg(long, value_name = "#RRGGBB", default_value = "#2ecc40", value_parser = parse_hex_color)]
    pub snake_color: Color,
    #[arg(long, value_name = "#RRGGBB", default_value = "#ea0b29", value_parser = parse_hex_color)]
    pub food_color: Color,
    /// Length of a round.
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub round_seconds: u32,
    /// Points awarded per food.
    #[arg(long, value_name = "POINTS", default_value_t = 1)]
    pub score_step: u32,
    /// Frames per second driving the snake.
    #[arg(
        long,
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    pub fps: u32,
    /// Fixed seed for spawn positions.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write logs to this file; nothing is logged otherwise.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl GameConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas_width, self.canvas_height)
    }

    pub fn snake_style(&self) -> EntityStyle {
        EntityStyle { size: self.snake_size, color: self.snake_color }
    }

    pub fn food_style(&self) -> EntityStyle {
        EntityStyle { size: self.food_size, color: self.food_color }
    }

    /// Rejects settings under which the snake cannot spawn inside the
    /// bounds or the food could fail to find a spot beside the head.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.speed > 0, "speed must be positive, got {}", self.speed);
        ensure!(self.round_seconds > 0, "a round needs at least one second");
        ensure!(self.score_step > 0, "score step must be positive");
        ensure!(
            self.px_per_column > 0 && self.px_per_row > 0,
            "pixel scale must be positive, got {}x{}",
            self.px_per_column,
            self.px_per_row
        );

        for (name, size) in [("snake", self.snake_size), ("food", self.food_size)] {
            ensure!(
                size.width > 0 && size.height > 0,
                "{} size must be positive, got {}x{}",
                name,
                size.width,
                size.height
            );
        }

        let (snake, food) = (self.snake_size, self.food_size);
        // The first segment checked for bites trails the head by two strides
        let bite_gap = 2 * TAIL_STRIDE as i32 * self.speed;
        ensure!(
            bite_gap >= snake.width.max(snake.height),
            "at speed {} a {}x{} snake overlaps its own tail; raise the speed or shrink the snake",
            self.speed,
            snake.width,
            snake.height
        );
        ensure!(
            self.canvas_width > snake.width + 1 && self.canvas_height > snake.height + 1,
            "a {}x{} canvas cannot hold a {}x{} snake inside its edges",
            self.canvas_width,
            self.canvas_height,
            snake.width,
            snake.height
        );
        ensure!(
            self.canvas_width - food.width > snake.width + food.width
                && self.canvas_height - food.height > snake.height + food.height,
            "a {}x{} canvas leaves no room to place food beside the snake",
            self.canvas_width,
            self.canvas_height
        );

        Ok(())
    }
}

/// Parses `#RRGGBB` (the `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<Color, String> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected a color like #2ecc40, got {:?}", value));
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}
