use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Weighted random choice over a list of non-negative weights.
///
/// Wraps a seedable generator so that sequences of choices are
/// reproducible under a fixed seed.
///
/// # Responsibilities
/// - Draw a uniform value scaled by the total weight
/// - Walk the cumulative sum and return the first qualifying index
/// - Never fail on a non-empty input
///
/// # Invariants
/// - Weights are non-negative (a negative weight is a caller bug)
/// - The same seed yields the same index sequence for the same inputs
#[derive(Debug)]
pub struct Sampler {
	rng: StdRng,
}

impl Sampler {
	/// Creates a sampler seeded from the process entropy source.
	pub fn new() -> Self {
		Self { rng: StdRng::from_rng(&mut rand::rng()) }
	}

	/// Creates a sampler with a fixed seed.
	///
	/// Two samplers built with the same seed produce the same sequence
	/// of choices for the same sequence of weight lists.
	pub fn with_seed(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}

	/// Picks an index with probability proportional to its weight.
	///
	/// Draws `r` in `[0, total]` and returns the first index whose
	/// cumulative weight reaches `r` (`r <= sum`). Floating rounding can
	/// leave no qualifying index; the last one is returned in that case
	/// so the call never fails on non-empty input.
	///
	/// Returns `None` only when `weights` is empty. All-zero weights
	/// resolve to index 0 (the drawn value is 0).
	pub fn choose(&mut self, weights: &[f64]) -> Option<usize> {
		if weights.is_empty() {
			return None;
		}

		let total: f64 = weights.iter().sum();
		let r = self.rng.random_range(0.0..=1.0) * total;

		let mut sum = 0.0;
		for (index, weight) in weights.iter().enumerate() {
			sum += weight;
			if r <= sum {
				return Some(index);
			}
		}

		Some(weights.len() - 1)
	}
}

impl Default for Sampler {
	fn default() -> Self {
		Self::new()
	}
}
