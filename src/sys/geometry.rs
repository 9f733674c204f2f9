use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Two edges closer than this many pixels are treated as touching.
pub const STICK_TOLERANCE: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }

    pub fn scale(self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    pub const fn from_parts(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    pub fn mid(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Half-open containment: the top/left edges belong to the rect, the
    /// bottom/right edges do not.
    pub fn contains(&self, point: Point) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }

    /// Shrinks the rect by independent amounts on each side, never below zero size.
    pub fn inset(&self, top_left: Point, bottom_right: Point) -> Rect {
        Rect::new(
            self.origin + top_left,
            Size::new(
                (self.size.width - top_left.x - bottom_right.x).max(0.0),
                (self.size.height - top_left.y - bottom_right.y).max(0.0),
            ),
        )
    }

    /// Scales the rect around its own center.
    pub fn scale_centered(&self, factor: f64) -> Rect {
        let size = self.size.scale(factor);
        Rect::new(
            Point::new(
                self.origin.x + (self.size.width - size.width) / 2.0,
                self.origin.y + (self.size.height - size.height) / 2.0,
            ),
            size,
        )
    }
}

pub trait Round {
    fn round(&self) -> Self;
}

impl Round for Point {
    fn round(&self) -> Self { Point::new(self.x.round(), self.y.round()) }
}

impl Round for Size {
    fn round(&self) -> Self { Size::new(self.width.round(), self.height.round()) }
}

impl Round for Rect {
    fn round(&self) -> Self { Rect::new(self.origin.round(), self.size.round()) }
}

/// Whether two edge coordinates are within [`STICK_TOLERANCE`] of each other.
pub fn sticks(a: f64, b: f64) -> bool { (a - b).abs() < STICK_TOLERANCE }
