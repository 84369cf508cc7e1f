use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Symbol;
use super::distribution::Distribution;

/// Represents a fixed-order Markov chain over binned observations.
///
/// The `MarkovChain` stores a conditional next-symbol distribution for
/// every context of `order` consecutive symbols observed in the
/// training data.
///
/// # Responsibilities
/// - Build the chain from a flat observation sequence in one scan
/// - Accumulate continuation counts for each context
/// - Finalize counts into immutable probability distributions
/// - Expose per-context distributions for sampling and inspection
///
/// # Invariants
/// - `order` is always >= 1 and strictly less than the training length
/// - Each key in `table` is a context of exactly `order` symbols
/// - Every stored distribution has at least one entry and its
///   probabilities sum to 1.0 within floating-point tolerance
/// - The chain is immutable once built
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovChain {
	/// The order of the chain (number of symbols in a context)
	order: usize, // must be >= 1

	/// Mapping from a context (length `order`) to its conditional
	/// next-symbol distribution
	table: HashMap<Vec<Symbol>, Distribution>,
}

impl MarkovChain {
	/// Builds a Markov chain of the given order from training data.
	///
	/// Slides a window of `order + 1` symbols across `data`: the first
	/// `order` symbols form the context, the final symbol is recorded as
	/// one continuation observation for that context. A separate
	/// finalization pass converts each context's counts into a
	/// `Distribution`; the mutable count table never leaves this
	/// function.
	///
	/// # Errors
	/// Returns an error if `order` is zero, or if `order >= data.len()`
	/// (the chain would have no context to learn from).
	pub fn build(data: &[Symbol], order: usize) -> Result<Self, String> {
		if order == 0 {
			return Err("Order must be >= 1".to_owned());
		}
		if order >= data.len() {
			return Err(format!(
				"Order {} requires more than {} training symbols",
				order,
				data.len()
			));
		}

		// Continuation counts per context, accumulated in a single scan
		let mut counts: HashMap<Vec<Symbol>, HashMap<Symbol, usize>> = HashMap::new();
		for window in data.windows(order + 1) {
			let (context, next) = window.split_at(order);
			let continuations = counts.entry(context.to_vec()).or_default();
			*continuations.entry(next[0]).or_insert(0) += 1;
		}

		// Finalize counts into immutable distributions
		let table = counts
			.into_iter()
			.map(|(context, continuations)| (context, Distribution::from_counts(&continuations)))
			.collect();

		Ok(Self { order, table })
	}

	/// Returns the order of the chain.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the distribution for `context`, or `None` if the context
	/// was never observed in the training data.
	pub fn distribution(&self, context: &[Symbol]) -> Option<&Distribution> {
		self.table.get(context)
	}

	/// Iterates all `(context, distribution)` pairs.
	///
	/// Iteration order is unspecified; callers needing stable output
	/// should sort by context.
	pub fn entries(&self) -> impl Iterator<Item = (&[Symbol], &Distribution)> {
		self.table.iter().map(|(context, dist)| (context.as_slice(), dist))
	}

	/// Number of distinct contexts observed in the training data.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// True if the chain has no contexts.
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn alternating_data_yields_certain_transitions() {
		let chain = MarkovChain::build(&[0, 1, 0, 1, 0, 1], 1).unwrap();

		assert_eq!(chain.len(), 2);
		assert_eq!(chain.distribution(&[0]).unwrap().probability(1), Some(1.0));
		assert_eq!(chain.distribution(&[1]).unwrap().probability(0), Some(1.0));
	}

	#[test]
	fn counts_split_into_frequencies() {
		// Context (2,): followed by 0 once and 3 three times
		let chain = MarkovChain::build(&[2, 0, 2, 3, 2, 3, 2, 3], 1).unwrap();

		let dist = chain.distribution(&[2]).unwrap();
		assert_eq!(dist.probability(0), Some(0.25));
		assert_eq!(dist.probability(3), Some(0.75));
	}

	#[test]
	fn higher_order_contexts_have_full_length() {
		let chain = MarkovChain::build(&[0, 1, 2, 3, 0, 1, 2], 3).unwrap();

		assert!(chain.distribution(&[0, 1, 2]).is_some());
		assert!(chain.distribution(&[0, 1]).is_none());
		assert_eq!(chain.distribution(&[0, 1, 2]).unwrap().probability(3), Some(1.0));
	}

	#[test]
	fn contexts_cover_every_window_position() {
		let data = [0, 1, 1, 2, 3, 0, 0, 1, 2, 2, 3, 1];
		for order in 1..4 {
			let chain = MarkovChain::build(&data, order).unwrap();

			let distinct: std::collections::HashSet<&[Symbol]> =
				data.windows(order + 1).map(|window| &window[..order]).collect();
			assert_eq!(chain.len(), distinct.len());
			for context in &distinct {
				assert!(chain.distribution(context).is_some());
			}
		}
	}

	#[test]
	fn distinct_contexts_each_hold_one_observation() {
		// No context repeats, so every distribution is a point mass and
		// the chain holds exactly data.len() - order contexts.
		let data = [0, 1, 2, 3];
		let chain = MarkovChain::build(&data, 1).unwrap();

		assert_eq!(chain.len(), data.len() - 1);
		for (context, dist) in chain.entries() {
			assert_eq!(dist.len(), 1);
			assert_eq!(dist.probability(context[0] + 1), Some(1.0));
		}
	}

	#[test]
	fn every_distribution_sums_to_one() {
		let data = [3, 1, 0, 2, 1, 1, 3, 2, 0, 0, 1, 2, 3, 3, 0];
		let chain = MarkovChain::build(&data, 2).unwrap();

		for (_, dist) in chain.entries() {
			let sum: f64 = dist.iter().map(|(_, p)| p).sum();
			assert!((sum - 1.0).abs() < 1e-9);
			assert!(!dist.is_empty());
		}
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(MarkovChain::build(&[0, 1, 2], 0).is_err());
	}

	#[test]
	fn order_must_be_below_data_length() {
		assert!(MarkovChain::build(&[0, 1, 2], 3).is_err());
		assert!(MarkovChain::build(&[0, 1, 2], 7).is_err());
		assert!(MarkovChain::build(&[], 1).is_err());
		assert!(MarkovChain::build(&[0, 1, 2], 2).is_ok());
	}
}
