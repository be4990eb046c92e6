use crate::error::TrackError;
use crate::simulation::{Track, Vec2};
use anyhow::{Result, bail};
use nalgebra::{DMatrix, DVector};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Uniform};
use super::Controller;

/// Sensor inputs: four wall distances, target offset and velocity.
pub const INPUT_SIZE: usize = 8;

const OUTPUT_SIZE: usize = 2;

/// Probe directions for the wall distance sensors: left, up, right, down.
const PROBES: [(f64, f64); 4] = [(-1.0, 0.0), (0.0, 1.0), (1.0, 0.0), (0.0, -1.0)];

/// Two-layer linear network mapping sensor readings to an acceleration.
#[derive(Debug, Clone)]
pub struct NeuralController {
    input_matrix: DMatrix<f64>,
    output_matrix: DMatrix<f64>,
    complete_matrix: DMatrix<f64>,
    weight_min: f64,
    weight_max: f64,
    max_steps: usize,
}

impl NeuralController {
    /// All-zero network; call [`Controller::reseed`] to randomize it.
    pub fn new(middle_nodes: usize, weight_min: f64, weight_max: f64, max_steps: usize) -> Self {
        let input_matrix: DMatrix<f64> = DMatrix::zeros(INPUT_SIZE, middle_nodes);
        let output_matrix: DMatrix<f64> = DMatrix::zeros(middle_nodes, OUTPUT_SIZE);
        let complete_matrix = &input_matrix * &output_matrix;

        Self {
            input_matrix,
            output_matrix,
            complete_matrix,
            weight_min,
            weight_max,
            max_steps,
        }
    }

    pub fn random(
        middle_nodes: usize,
        weight_min: f64,
        weight_max: f64,
        max_steps: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        let mut controller = Self::new(middle_nodes, weight_min, weight_max, max_steps);
        controller.reseed(rng);
        controller
    }

    /// Builds a network from explicit weights (`INPUT_SIZE × n` and `n × 2`).
    pub fn from_matrices(input_matrix: DMatrix<f64>, output_matrix: DMatrix<f64>, max_steps: usize) -> Result<Self> {
        if input_matrix.nrows() != INPUT_SIZE {
            bail!("input matrix needs {} rows, got {}", INPUT_SIZE, input_matrix.nrows());
        }
        if output_matrix.ncols() != OUTPUT_SIZE || output_matrix.nrows() != input_matrix.ncols() {
            bail!(
                "output matrix must be {}x{}, got {}x{}",
                input_matrix.ncols(),
                OUTPUT_SIZE,
                output_matrix.nrows(),
                output_matrix.ncols()
            );
        }

        let (weight_min, weight_max) = input_matrix
            .iter()
            .chain(output_matrix.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));
        let complete_matrix = &input_matrix * &output_matrix;

        Ok(Self {
            input_matrix,
            output_matrix,
            complete_matrix,
            weight_min,
            weight_max,
            max_steps,
        })
    }

    pub fn middle_nodes(&self) -> usize {
        self.input_matrix.ncols()
    }

    pub fn complete_matrix(&self) -> &DMatrix<f64> {
        &self.complete_matrix
    }

    fn weight_distribution(&self) -> Uniform<f64> {
        Uniform::new_inclusive(self.weight_min, self.weight_max)
    }

    fn random_matrix(rows: usize, cols: usize, distribution: &Uniform<f64>, rng: &mut dyn RngCore) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |_, _| distribution.sample(rng))
    }

    fn refresh(&mut self) {
        self.complete_matrix = &self.input_matrix * &self.output_matrix;
    }

    /// Sensor readings for the current state of `track`.
    pub fn input_vector(&self, track: &Track) -> Result<DVector<f64>, TrackError> {
        let mut inputs = Vec::with_capacity(INPUT_SIZE);
        for (x, y) in PROBES {
            inputs.push(track.check_distance_to_wall(Vec2::new(x, y))?);
        }

        let target = track.target_vector();
        let velocity = track.velocity();
        inputs.extend([target.x, target.y, velocity.x, velocity.y]);

        Ok(DVector::from_vec(inputs))
    }

    pub fn output(&self, inputs: &DVector<f64>) -> Vec2 {
        let output = self.complete_matrix.tr_mul(inputs);
        Vec2::new(output[0], output[1])
    }

    /// Feeds the sensors through the network and accelerates once.
    pub fn timestep(&self, track: &mut Track) -> Result<bool, TrackError> {
        let inputs = self.input_vector(track)?;
        Ok(track.accelerate(self.output(&inputs)))
    }

    /// Replaces one random weight in each layer.
    pub fn mutate(&mut self, rng: &mut dyn RngCore) {
        let distribution = self.weight_distribution();

        let (rows, cols) = self.input_matrix.shape();
        let (row, col) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
        self.input_matrix[(row, col)] = distribution.sample(rng);

        let (rows, cols) = self.output_matrix.shape();
        let (row, col) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
        self.output_matrix[(row, col)] = distribution.sample(rng);

        self.refresh();
    }

    /// Child network with the average weights of both parents.
    pub fn crossover(&self, other: &NeuralController) -> Result<Self> {
        if self.middle_nodes() != other.middle_nodes() {
            bail!(
                "cannot cross networks with {} and {} middle nodes",
                self.middle_nodes(),
                other.middle_nodes()
            );
        }

        let mut child = self.clone();
        child.input_matrix = (&self.input_matrix + &other.input_matrix) * 0.5;
        child.output_matrix = (&self.output_matrix + &other.output_matrix) * 0.5;
        child.refresh();
        Ok(child)
    }
}

impl Controller for NeuralController {
    fn drive(&mut self, track: &mut Track, _rng: &mut dyn RngCore) -> Result<()> {
        for _ in 0..self.max_steps {
            if !self.timestep(track)? {
                return Ok(());
            }
        }

        log::debug!("Neural controller stopped after {} steps without terminating", self.max_steps);
        Ok(())
    }

    fn reseed(&mut self, rng: &mut dyn RngCore) {
        let distribution = self.weight_distribution();
        let middle_nodes = self.middle_nodes();
        self.input_matrix = Self::random_matrix(INPUT_SIZE, middle_nodes, &distribution, rng);
        self.output_matrix = Self::random_matrix(middle_nodes, OUTPUT_SIZE, &distribution, rng);
        self.refresh();
    }

    fn get_name(&self) -> &'static str {
        "neural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Map, Point};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn track() -> Track {
        let map = Map::parse(10.0, "w 0 0 0 100\nw 0 100 100 100\nw 100 100 100 0\nw 100 0 0 0\ns 20 30\nt 80 30").unwrap();
        Track::new(Arc::new(map))
    }

    fn assert_inputs(actual: &DVector<f64>, expected: [f64; INPUT_SIZE]) {
        assert_eq!(actual.len(), INPUT_SIZE);
        for (index, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!((a - e).abs() < 1e-9, "input {}: {} != {}", index, a, e);
        }
    }

    /// Network that accelerates by the target offset and nothing else.
    fn target_seeker() -> NeuralController {
        let mut input = DMatrix::<f64>::zeros(INPUT_SIZE, 1);
        input[(4, 0)] = 1.0;
        let output = DMatrix::from_row_slice(1, 2, &[1.0, 0.0]);
        NeuralController::from_matrices(input, output, 100).unwrap()
    }

    #[test]
    fn random_network_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let controller = NeuralController::random(8, 0.0, 10.0, 100, &mut rng);
        assert_eq!(controller.input_matrix.shape(), (8, 8));
        assert_eq!(controller.output_matrix.shape(), (8, 2));
        assert_eq!(controller.complete_matrix().shape(), (8, 2));
        assert!(controller.input_matrix.iter().all(|w| (0.0..=10.0).contains(w)));
    }

    #[test]
    fn input_vector_at_start() {
        let controller = target_seeker();
        let inputs = controller.input_vector(&track()).unwrap();
        assert_inputs(&inputs, [20.0, 70.0, 80.0, 30.0, 60.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn input_vector_after_moving() {
        let controller = target_seeker();

        let mut moved = track();
        moved.accelerate(Vec2::new(10.0, 0.0));
        assert_inputs(
            &controller.input_vector(&moved).unwrap(),
            [30.0, 70.0, 70.0, 30.0, 50.0, 0.0, 10.0, 0.0],
        );

        let mut moved = track();
        moved.accelerate(Vec2::new(5.0, -5.0));
        assert_inputs(
            &controller.input_vector(&moved).unwrap(),
            [25.0, 75.0, 75.0, 25.0, 55.0, 5.0, 5.0, -5.0],
        );
    }

    #[test]
    fn timestep_applies_network_output() {
        let controller = target_seeker();
        let mut track = track();
        assert!(controller.timestep(&mut track).unwrap());
        assert_eq!(track.last_position(), Point::new(30.0, 30.0));
    }

    #[test]
    fn drive_runs_until_wall() {
        let mut controller = target_seeker();
        let mut rng = StdRng::seed_from_u64(2);
        let mut track = track();
        controller.drive(&mut track, &mut rng).unwrap();
        assert!(track.collision());
    }

    #[test]
    fn mutate_changes_at_most_one_weight_per_layer() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut controller = NeuralController::random(8, -1.0, 1.0, 100, &mut rng);
        let before = controller.clone();
        controller.mutate(&mut rng);

        let changed_input = before.input_matrix.iter().zip(controller.input_matrix.iter()).filter(|(a, b)| a != b).count();
        let changed_output = before.output_matrix.iter().zip(controller.output_matrix.iter()).filter(|(a, b)| a != b).count();
        assert!(changed_input <= 1);
        assert!(changed_output <= 1);
        assert_eq!(controller.complete_matrix, &controller.input_matrix * &controller.output_matrix);
    }

    #[test]
    fn crossover_averages_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let father = NeuralController::random(4, -1.0, 1.0, 100, &mut rng);
        let mother = NeuralController::random(4, -1.0, 1.0, 100, &mut rng);
        let child = father.crossover(&mother).unwrap();
        assert_eq!(child.input_matrix[(3, 2)], (father.input_matrix[(3, 2)] + mother.input_matrix[(3, 2)]) * 0.5);

        let other = NeuralController::random(5, -1.0, 1.0, 100, &mut rng);
        assert!(father.crossover(&other).is_err());
    }

    #[test]
    fn rejects_mismatched_matrices() {
        assert!(NeuralController::from_matrices(DMatrix::zeros(7, 3), DMatrix::zeros(3, 2), 10).is_err());
        assert!(NeuralController::from_matrices(DMatrix::zeros(8, 3), DMatrix::zeros(2, 2), 10).is_err());
    }
}
