use super::{CoordinateMode, Point, Segment, Vec2};
use crate::error::MapError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Static obstacle course: walls, start, target and the acceleration limit
/// every track on it has to respect.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    walls: Vec<Segment>,
    start: Point,
    target: Point,
    size: Vec2,
    max_acceleration: f64,
    coordinates: CoordinateMode,
}

impl Map {
    /// Empty map with start and target at the origin.
    pub fn new(max_acceleration: f64) -> Result<Self, MapError> {
        if !(max_acceleration.is_finite() && max_acceleration > 0.0) {
            return Err(MapError::InvalidAcceleration(max_acceleration));
        }

        Ok(Self {
            walls: Vec::new(),
            start: Point::origin(),
            target: Point::origin(),
            size: Vec2::zeros(),
            max_acceleration,
            coordinates: CoordinateMode::default(),
        })
    }

    /// Builds a map and immediately loads `path` into it.
    pub fn load(max_acceleration: f64, path: impl AsRef<Path>) -> Result<Self, MapError> {
        let mut map = Self::new(max_acceleration)?;
        map.load_file(path)?;
        Ok(map)
    }

    pub fn parse(max_acceleration: f64, source: &str) -> Result<Self, MapError> {
        let mut map = Self::new(max_acceleration)?;
        map.load_from_reader(source.as_bytes())?;
        Ok(map)
    }

    pub fn with_coordinates(mut self, coordinates: CoordinateMode) -> Self {
        self.coordinates = coordinates;
        self
    }

    pub fn add_line(&mut self, p: Point, q: Point) {
        self.size.x = self.size.x.max(p.x).max(q.x);
        self.size.y = self.size.y.max(p.y).max(q.y);
        self.walls.push(Segment::new(p, q));
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_from_reader(BufReader::new(file)).map_err(|err| match err {
            MapError::Io { source, .. } => MapError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        log::debug!(
            "Loaded map {}: {} walls, start ({}, {}), target ({}, {})",
            path.display(),
            self.walls.len(),
            self.start.x,
            self.start.y,
            self.target.x,
            self.target.y
        );
        Ok(())
    }

    /// Reads the line oriented map format:
    ///
    /// ```text
    /// # comment
    /// W x1 y1 x2 y2
    /// S x y
    /// T x y
    /// ```
    ///
    /// Leading tokens are case-insensitive, blank lines are skipped. Any
    /// other line aborts the load with [`MapError::Format`].
    pub fn load_from_reader(&mut self, reader: impl BufRead) -> Result<(), MapError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| MapError::Io {
                path: Default::default(),
                source,
            })?;
            let line_number = index + 1;
            let format_error = || MapError::Format {
                line_number,
                line: line.clone(),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut tokens = trimmed.split_whitespace();
            let kind = tokens.next().map(str::to_lowercase).ok_or_else(format_error)?;
            let values = tokens
                .map(|token| token.parse::<i64>().map(|value| value as f64))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| format_error())?;

            match (kind.as_str(), values.as_slice()) {
                ("w", &[x1, y1, x2, y2]) => self.add_line(Point::new(x1, y1), Point::new(x2, y2)),
                ("s", &[x, y]) => self.start = Point::new(x, y),
                ("t", &[x, y]) => self.target = Point::new(x, y),
                _ => return Err(format_error()),
            }
        }

        Ok(())
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Largest x and y over all wall endpoints.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn diagonal(&self) -> f64 {
        self.size.magnitude()
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn coordinates(&self) -> CoordinateMode {
        self.coordinates
    }
}
