use std::collections::VecDeque;

use crossterm::style::Color;

use crate::geometry::{Collidable, Position, Rect, Size};
use Direction::*;

/// Every visible tail segment sits this many recorded positions behind the previous one.
pub const TAIL_STRIDE: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Moves `position` by `speed` pixels along this direction.
    pub fn apply(self, position: Position, speed: i32) -> Position {
        match self {
            Left => Position::new(position.x - speed, position.y),
            Up => Position::new(position.x, position.y - speed),
            Right => Position::new(position.x + speed, position.y),
            Down => Position::new(position.x, position.y + speed),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Left => Right,
            Up => Down,
            Right => Left,
            Down => Up,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EntityStyle {
    pub size: Size,
    pub color: Color,
}

pub struct Snake {
    position: Position,
    style: EntityStyle,
    speed: i32,
    history: VecDeque<Position>,
    eat: usize,
}

impl Snake {
    pub fn new(position: Position, style: EntityStyle, speed: i32) -> Self {
        Snake { position, style, speed, history: VecDeque::new(), eat: 0 }
    }

    pub fn head(&self) -> Position {
        self.position
    }

    pub fn style(&self) -> EntityStyle {
        self.style
    }

    pub fn eat(&self) -> usize {
        self.eat
    }

    #[cfg(test)]
    pub fn history(&self) -> &VecDeque<Position> {
        &self.history
    }

    pub fn move_step(&mut self, direction: Direction) {
        self.position = direction.apply(self.position, self.speed);
    }

    pub fn record_position(&mut self, position: Position) {
        self.history.push_front(position);
    }

    /// The visible tail, one segment per food eaten.
    ///
    /// Segment `k` is `history[TAIL_STRIDE * (k + 1)]`. History past what the
    /// current tail can ever sample is dropped first. While the history is
    /// still too short to reach a segment, that segment sits on the oldest
    /// recorded position (or the head when nothing was recorded yet).
    pub fn tail(&mut self) -> impl Iterator<Item = Rect> + '_ {
        self.history.truncate(TAIL_STRIDE * (self.eat + 1));

        let history = &self.history;
        let fallback = history.back().copied().unwrap_or(self.position);
        let size = self.style.size;

        (1..=self.eat).map(move |k| Rect {
            position: history.get(TAIL_STRIDE * k).copied().unwrap_or(fallback),
            size,
        })
    }

    /// Leading tail segments that sit on a recorded position rather than
    /// on the short-history fallback.
    pub fn recorded_segments(&self) -> usize {
        (self.history.len().saturating_sub(1) / TAIL_STRIDE).min(self.eat)
    }

    pub fn set_eat(&mut self) {
        self.eat += 1;
    }

    pub fn reload(&mut self, position: Position) {
        self.history.clear();
        self.eat = 0;
        self.position = position;
    }
}

impl Collidable for Snake {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> Size {
        self.style.size
    }
}
