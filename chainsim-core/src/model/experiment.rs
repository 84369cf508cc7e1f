use std::sync::mpsc;
use std::thread;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::Symbol;
use super::markov_chain::MarkovChain;
use super::sampler::Sampler;
use super::scorer;

/// A multi-trial simulation experiment for one chain order.
///
/// `Experiment` contains the **configuration parameters** of a run (the
/// chain order, the prediction horizon and the number of trials) and
/// orchestrates: build one chain from training data, simulate the
/// future `trials` times from the same test seed, score every
/// simulation against the actual outcome, and average the errors.
///
/// # Responsibilities
/// - Validate the run parameters and input sequence lengths
/// - Build the chain once and treat it as read-only afterwards
/// - Run trials sequentially, or fan them out across worker threads
///
/// # Invariants
/// - `order`, `horizon` and `trials` are all >= 1
/// - Every trial starts from the unmodified test seed; trials never
///   influence one another
#[derive(Clone, Debug)]
pub struct Experiment {
	/// Order of the Markov chain to build.
	order: usize,

	/// Number of future symbols each trial simulates.
	horizon: usize,

	/// Number of independent trials to average over.
	trials: usize,
}

impl Experiment {
	/// Creates an experiment configuration.
	///
	/// # Errors
	/// Returns an error if `order`, `horizon` or `trials` is zero. A
	/// zero horizon would leave every trial with an unscorable empty
	/// sequence, so it is rejected here rather than inside the trial
	/// loop.
	pub fn new(order: usize, horizon: usize, trials: usize) -> Result<Self, String> {
		if order == 0 {
			return Err("Order must be >= 1".to_owned());
		}
		if horizon == 0 {
			return Err("Horizon must be >= 1".to_owned());
		}
		if trials == 0 {
			return Err("Trials must be >= 1".to_owned());
		}
		Ok(Self { order, horizon, trials })
	}

	/// Returns the chain order used by this experiment.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Runs the experiment sequentially.
	///
	/// # Parameters
	/// - `train`: training sequence the chain is built from.
	/// - `test_seed`: previous states of the held-out period; length
	///   must equal the order.
	/// - `actual`: the true future; length must equal the horizon.
	/// - `rng`: random source consumed by every trial in turn.
	///
	/// # Returns
	/// The arithmetic mean of the per-trial mean squared errors.
	///
	/// # Errors
	/// Propagates chain construction and sequence length errors.
	pub fn run<R: Rng>(
		&self,
		train: &[Symbol],
		test_seed: &[Symbol],
		actual: &[Symbol],
		rng: &mut R,
	) -> Result<f64, String> {
		self.check_sequences(test_seed, actual)?;

		let chain = MarkovChain::build(train, self.order)?;
		let sampler = Sampler::new(&chain);

		let mut total = 0.0;
		for _ in 0..self.trials {
			let simulated = sampler.sample(test_seed, self.horizon, rng)?;
			total += scorer::mse(&simulated, actual)?;
		}
		Ok(total / self.trials as f64)
	}

	/// Runs the experiment with trials fanned out across worker threads.
	///
	/// Same contract as [`run`](Self::run). One seed per trial is drawn
	/// from `rng` up front and each worker replays its trials through an
	/// independent `StdRng`, so for a fixed caller rng the result does
	/// not depend on thread count or scheduling: per-trial errors are
	/// written back by trial index and reduced in index order.
	///
	/// # Errors
	/// Propagates chain construction and sequence length errors.
	pub fn run_parallel<R: Rng>(
		&self,
		train: &[Symbol],
		test_seed: &[Symbol],
		actual: &[Symbol],
		rng: &mut R,
	) -> Result<f64, String> {
		self.check_sequences(test_seed, actual)?;

		let chain = MarkovChain::build(train, self.order)?;
		let trial_seeds: Vec<u64> = (0..self.trials).map(|_| rng.random()).collect();

		let cpus = num_cpus::get();
		let chunk_size = (self.trials + cpus - 1) / cpus;
		let horizon = self.horizon;

		let mut errors = vec![0.0f64; self.trials];
		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (index, chunk) in trial_seeds.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				let chain = &chain;

				scope.spawn(move || {
					let sampler = Sampler::new(chain);
					let scored: Result<Vec<f64>, String> = chunk
						.iter()
						.map(|&trial_seed| {
							let mut trial_rng = StdRng::seed_from_u64(trial_seed);
							let simulated = sampler.sample(test_seed, horizon, &mut trial_rng)?;
							scorer::mse(&simulated, actual)
						})
						.collect();
					tx.send((index * chunk_size, scored)).expect("Failed to send from thread");
				});
			}
			drop(tx);

			// Drain every worker before reporting a failure, so no
			// sender is left with a closed channel
			let mut failure = None;
			for (offset, scored) in rx.iter() {
				match scored {
					Ok(values) => errors[offset..offset + values.len()].copy_from_slice(&values),
					Err(error) => failure = Some(error),
				}
			}
			match failure {
				Some(error) => Err(error),
				None => Ok(()),
			}
		})?;

		Ok(errors.iter().sum::<f64>() / self.trials as f64)
	}

	/// Validates the held-out sequences against the run parameters.
	fn check_sequences(&self, test_seed: &[Symbol], actual: &[Symbol]) -> Result<(), String> {
		if test_seed.len() != self.order {
			return Err(format!(
				"Test seed length {} does not match order {}",
				test_seed.len(),
				self.order
			));
		}
		if actual.len() != self.horizon {
			return Err(format!(
				"Actual future length {} does not match horizon {}",
				actual.len(),
				self.horizon
			));
		}
		Ok(())
	}
}
