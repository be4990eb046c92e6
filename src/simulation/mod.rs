use nalgebra::{Vector2, Point2};
use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod map;
pub mod track;
pub mod population;

pub use geometry::*;
pub use map::*;
pub use track::*;
pub use population::*;

pub type Vec2 = Vector2<f64>;
pub type Point = Point2<f64>;

/// How coordinates produced by the physics step are represented.
///
/// `Integer` truncates every applied acceleration toward zero so positions
/// stay on the integer grid the map file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    #[default]
    Integer,
    Float,
}

impl CoordinateMode {
    pub fn apply(&self, vector: Vec2) -> Vec2 {
        match self {
            CoordinateMode::Integer => vector.map(f64::trunc),
            CoordinateMode::Float => vector,
        }
    }
}

/// A wall or a step of a track: straight line from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        do_intersect(&self.start, &self.end, &other.start, &other.end)
    }
}
