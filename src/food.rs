use crate::geometry::{Collidable, Position, Size};
use crate::snake::EntityStyle;

pub struct Food {
    position: Position,
    style: EntityStyle,
}

impl Food {
    pub fn new(position: Position, style: EntityStyle) -> Self {
        Food { position, style }
    }

    pub fn style(&self) -> EntityStyle {
        self.style
    }

    pub fn relocate(&mut self, position: Position) {
        self.position = position;
    }
}

impl Collidable for Food {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> Size {
        self.style.size
    }
}
