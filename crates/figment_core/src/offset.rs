//! Per-layer translation

use std::ops::{Add, Sub};

use figment_paint::Point;
use serde::{Deserialize, Serialize};

/// 2D translation applied to a layer while compositing
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<(f32, f32)> for Offset {
    type Output = Offset;

    fn add(self, (dx, dy): (f32, f32)) -> Offset {
        Offset::new(self.x + dx, self.y + dy)
    }
}

impl Sub<(f32, f32)> for Offset {
    type Output = Offset;

    fn sub(self, (dx, dy): (f32, f32)) -> Offset {
        Offset::new(self.x - dx, self.y - dy)
    }
}

impl From<Offset> for Point {
    fn from(offset: Offset) -> Self {
        Point::new(offset.x, offset.y)
    }
}
