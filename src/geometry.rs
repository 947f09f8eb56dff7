use std::str::FromStr;

// Top-left corner, in canvas pixels
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }
}

// WIDTHxHEIGHT, e.g. 10x10
impl FromStr for Size {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format WIDTHxHEIGHT".to_string())?;

        let width = width.trim().parse::<i32>().map_err(|e| format!("invalid width: {}", e))?;
        let height = height.trim().parse::<i32>().map_err(|e| format!("invalid height: {}", e))?;

        Ok(Size { width, height })
    }
}

pub trait Collidable {
    fn position(&self) -> Position;
    fn size(&self) -> Size;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    pub fn of(entity: &impl Collidable) -> Self {
        Rect { position: entity.position(), size: entity.size() }
    }
}

impl Collidable for Rect {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> Size {
        self.size
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub origin: Position,
    pub size: Size,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Bounds { origin: Position::default(), size: Size::new(width, height) }
    }
}

// Touching edges do not count
pub fn has_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    let (pa, sa) = (a.position(), a.size());
    let (pb, sb) = (b.position(), b.size());

    pa.x < pb.x + sb.width
        && pa.x + sa.width > pb.x
        && pa.y < pb.y + sb.height
        && pa.y + sa.height > pb.y
}

/// True when every edge of `entity` lies strictly inside `bounds`.
pub fn in_bounds<E: Collidable + ?Sized>(entity: &E, bounds: &Bounds) -> bool {
    let (pos, size) = (entity.position(), entity.size());

    pos.x > bounds.origin.x
        && pos.x + size.width < bounds.origin.x + bounds.size.width
        && pos.y > bounds.origin.y
        && pos.y + size.height < bounds.origin.y + bounds.size.height
}
