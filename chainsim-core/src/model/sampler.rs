use rand::Rng;

use super::markov_chain::MarkovChain;
use super::{NUM_BINS, Symbol};

/// Stochastic sequence simulator over a built Markov chain.
///
/// # Responsibilities
/// - Maintain the trailing order-length context window during a run
/// - Select the next symbol by weighted random choice for seen contexts
/// - Fall back to a uniform draw over the bin alphabet for unseen ones
///
/// # Notes
/// - The sampler never owns or seeds a random source; every draw comes
///   from the rng the caller passes in, so tests and experiment
///   harnesses control determinism.
/// - Sampling is total: whatever the chain's sparsity, a request for
///   `count` symbols yields exactly `count` symbols.
#[derive(Debug)]
pub struct Sampler<'a> {
	chain: &'a MarkovChain,
}

impl<'a> Sampler<'a> {
	/// Creates a sampler over the given chain.
	pub fn new(chain: &'a MarkovChain) -> Self {
		Self { chain }
	}

	/// Simulates `count` future symbols starting from `seed`.
	///
	/// # Parameters
	/// - `seed`: the previous states; its length must equal the chain's
	///   order.
	/// - `count`: number of future symbols to produce (may be zero).
	/// - `rng`: random source supplying one uniform draw per step.
	///
	/// # Behavior
	/// Each step looks up the trailing `order` symbols. A context known
	/// to the chain selects its successor through the distribution's
	/// inverse-CDF walk; an unknown context draws uniformly from the bin
	/// alphabet `0..NUM_BINS`. The selected symbol is appended to the
	/// output and the window advances by one.
	///
	/// # Errors
	/// Returns an error if `seed.len()` does not match the chain order.
	pub fn sample<R: Rng>(
		&self,
		seed: &[Symbol],
		count: usize,
		rng: &mut R,
	) -> Result<Vec<Symbol>, String> {
		let order = self.chain.order();
		if seed.len() != order {
			return Err(format!(
				"Seed length {} does not match chain order {}",
				seed.len(),
				order
			));
		}

		let mut output = Vec::with_capacity(count);
		let mut window = seed.to_vec();
		while output.len() < count {
			let next = match self.chain.distribution(&window) {
				Some(dist) => dist.sample(rng.random::<f64>()),
				None => None,
			};
			// Unseen context (or a context with no continuation):
			// uniform draw over the bin alphabet
			let next = next.unwrap_or_else(|| rng.random_range(0..NUM_BINS));

			output.push(next);
			window.remove(0);
			window.push(next);
		}

		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn returns_exactly_count_symbols() {
		let chain = MarkovChain::build(&[0, 1, 0, 1, 0], 1).unwrap();
		let sampler = Sampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(7);

		for count in [0, 1, 5, 100] {
			let sampled = sampler.sample(&[0], count, &mut rng).unwrap();
			assert_eq!(sampled.len(), count);
		}
	}

	#[test]
	fn deterministic_chain_walks_its_cycle() {
		// (0,) -> 1 and (1,) -> 0 with certainty
		let chain = MarkovChain::build(&[0, 1, 0, 1, 0, 1], 1).unwrap();
		let sampler = Sampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(7);

		let sampled = sampler.sample(&[0], 6, &mut rng).unwrap();
		assert_eq!(sampled, vec![1, 0, 1, 0, 1, 0]);
	}

	#[test]
	fn unseen_context_falls_back_to_alphabet() {
		// Only (0,) is known; the first step lands on 1 and every
		// further context is unseen
		let chain = MarkovChain::build(&[0, 1], 1).unwrap();
		let sampler = Sampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(42);

		let sampled = sampler.sample(&[0], 50, &mut rng).unwrap();
		assert_eq!(sampled[0], 1);
		assert!(sampled.iter().all(|&s| s < NUM_BINS));
	}

	#[test]
	fn seed_length_must_match_order() {
		let chain = MarkovChain::build(&[0, 1, 2, 0, 1, 2], 2).unwrap();
		let sampler = Sampler::new(&chain);
		let mut rng = StdRng::seed_from_u64(7);

		assert!(sampler.sample(&[0], 3, &mut rng).is_err());
		assert!(sampler.sample(&[0, 1, 2], 3, &mut rng).is_err());
		assert!(sampler.sample(&[0, 1], 3, &mut rng).is_ok());
	}

	#[test]
	fn identical_rng_seeds_reproduce_the_run() {
		let data = [0, 1, 1, 2, 3, 0, 0, 1, 2, 2, 3, 1, 0, 3];
		let chain = MarkovChain::build(&data, 2).unwrap();
		let sampler = Sampler::new(&chain);

		let mut first_rng = StdRng::seed_from_u64(99);
		let mut second_rng = StdRng::seed_from_u64(99);
		let first = sampler.sample(&[0, 1], 20, &mut first_rng).unwrap();
		let second = sampler.sample(&[0, 1], 20, &mut second_rng).unwrap();
		assert_eq!(first, second);
	}
}
