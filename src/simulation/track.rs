use super::{do_intersect, intersect_point, on_segment, Map, Point, Segment, Vec2};
use crate::error::{GeometryError, TrackError};
use std::sync::Arc;

/// Distance and speed below which a track counts as resting on the target.
///
/// Integer coordinates compare exactly; the tolerance only matters for
/// `CoordinateMode::Float`.
pub const ARRIVAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Active,
    Collided,
    Arrived,
}

impl TrackState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrackState::Active)
    }
}

/// A single trajectory across a [`Map`], advanced one acceleration at a time.
#[derive(Debug, Clone)]
pub struct Track {
    map: Arc<Map>,
    positions: Vec<Point>,
    acceleration_vectors: Vec<Vec2>,
    velocity: Vec2,
    collision: bool,
    state: TrackState,
}

impl Track {
    /// A track resting at the map's start.
    pub fn new(map: Arc<Map>) -> Self {
        let start = map.start();
        Self {
            map,
            positions: vec![start],
            acceleration_vectors: vec![Vec2::zeros()],
            velocity: Vec2::zeros(),
            collision: false,
            state: TrackState::Active,
        }
    }

    /// Rebuilds a physically valid track that tries to visit `waypoints`.
    pub fn replay(map: Arc<Map>, waypoints: &[Point]) -> Self {
        let mut track = Self::new(map);
        track.approximate_positions(waypoints);
        track
    }

    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn acceleration_vectors(&self) -> &[Vec2] {
        &self.acceleration_vectors
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn collision(&self) -> bool {
        self.collision
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn last_position(&self) -> Point {
        // positions always holds at least the start
        self.positions[self.positions.len() - 1]
    }

    /// Number of recorded positions, start included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Clamps `vector` to the map's max acceleration, keeping its direction.
    pub fn limit_vector(&self, vector: Vec2) -> Vec2 {
        let max_acceleration = self.map.max_acceleration();
        let magnitude = vector.magnitude();

        let limited = if magnitude > max_acceleration {
            vector * (max_acceleration / magnitude)
        } else {
            vector
        };

        self.map.coordinates().apply(limited)
    }

    /// Applies one acceleration step.
    ///
    /// Returns `true` while the track may keep moving, `false` once it hit a
    /// wall or came to rest on the target. Terminal tracks reject further
    /// steps and stay unchanged.
    pub fn accelerate(&mut self, vector: Vec2) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let vector = self.limit_vector(vector);
        self.acceleration_vectors.push(vector);
        self.velocity += vector;

        let new_position = self.last_position() + self.velocity;
        self.positions.push(new_position);

        let newest = self.positions.len() - 1;
        if self.collides_from(newest) {
            log::trace!("Track collided at ({}, {}) after {} steps", new_position.x, new_position.y, newest);
            self.collision = true;
            self.state = TrackState::Collided;
            return false;
        }

        if self.at_rest_on_target() {
            log::trace!("Track arrived at target after {} steps", newest);
            self.state = TrackState::Arrived;
            return false;
        }

        true
    }

    /// Checks every step from `from_position_index` onwards against all walls.
    pub fn check_collisions(&self, from_position_index: usize) -> Result<bool, TrackError> {
        let len = self.positions.len();
        if from_position_index < 1 || from_position_index >= len {
            return Err(TrackError::IndexOutOfRange {
                index: from_position_index,
                len,
            });
        }

        Ok(self.collides_from(from_position_index))
    }

    fn collides_from(&self, from_position_index: usize) -> bool {
        self.positions[from_position_index - 1..]
            .windows(2)
            .any(|step| {
                self.map
                    .walls()
                    .iter()
                    .any(|wall| do_intersect(&step[0], &step[1], &wall.start, &wall.end))
            })
    }

    fn at_rest_on_target(&self) -> bool {
        (self.last_position() - self.map.target()).magnitude() <= ARRIVAL_TOLERANCE
            && self.velocity.magnitude() <= ARRIVAL_TOLERANCE
    }

    /// Distance from the current position to the nearest wall along `direction`.
    ///
    /// Returns the full ray length when no wall lies in that direction.
    pub fn check_distance_to_wall(&self, direction: Vec2) -> Result<f64, TrackError> {
        let magnitude = direction.magnitude();
        if magnitude.is_nan() || magnitude < 1.0 {
            return Err(TrackError::DirectionTooShort { magnitude });
        }

        let origin = self.last_position();
        // Must outreach every wall endpoint, negative coordinates included
        let farthest_wall = self
            .map
            .walls()
            .iter()
            .flat_map(|wall| [wall.start, wall.end])
            .map(|end| (end - origin).magnitude())
            .fold(0.0, f64::max);
        let ray_length = (self.map.diagonal() + origin.coords.magnitude()).max(farthest_wall) + 1.0;
        let ray = Segment::new(origin, origin + direction * (ray_length / magnitude));

        let nearest = self
            .map
            .walls()
            .iter()
            .filter(|wall| ray.intersects(wall))
            .map(|wall| match intersect_point(&ray, wall) {
                Ok(point) => (point - origin).magnitude(),
                // Wall runs along the ray
                Err(GeometryError::NoUniqueIntersection) => {
                    if on_segment(&wall.start, &origin, &wall.end) {
                        0.0
                    } else {
                        [wall.start, wall.end]
                            .iter()
                            .filter(|end| on_segment(&ray.start, end, &ray.end))
                            .map(|end| (*end - origin).magnitude())
                            .fold(ray_length, f64::min)
                    }
                }
            })
            .fold(ray_length, f64::min);

        Ok(nearest)
    }

    /// Steers the track toward each waypoint in turn.
    ///
    /// Every step requests exactly the acceleration that would land on the
    /// next waypoint; clamping may fall short. Stops quietly at the first
    /// collision or arrival.
    pub fn approximate_positions(&mut self, waypoints: &[Point]) {
        for waypoint in waypoints {
            let vector = *waypoint - self.last_position() - self.velocity;
            if !self.accelerate(vector) {
                break;
            }
        }
    }

    /// Euclidean distance from the current position to the target.
    pub fn distance(&self) -> f64 {
        self.target_vector().magnitude()
    }

    pub fn target_vector(&self) -> Vec2 {
        self.map.target() - self.last_position()
    }
}
