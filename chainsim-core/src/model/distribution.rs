use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Symbol;

/// Represents a conditional next-symbol distribution in a Markov chain.
///
/// A `Distribution` corresponds to a fixed order-length context and stores
/// the empirical probability of every symbol observed to follow that
/// context in the training data.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their observed frequency.
///
/// ## Responsibilities:
/// - Finalize raw continuation counts into probabilities
/// - Select the next symbol for a uniform draw via an inverse-CDF scan
///
/// ## Invariants
/// - Entries are sorted by symbol value, so enumeration order is fixed
///   and selection is reproducible for the same draw
/// - Probabilities are strictly positive and sum to 1.0 (within
///   floating-point tolerance) whenever the distribution is non-empty
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Distribution {
	/// Outgoing transitions as `(symbol, probability)` pairs, sorted by
	/// symbol value.
	/// Example: [(1, 0.75), (3, 0.25)]
	entries: Vec<(Symbol, f64)>,
}

impl Distribution {
	/// Finalizes a table of continuation counts into a distribution.
	///
	/// Each count becomes `count / total` and the entries are sorted by
	/// symbol value to fix the enumeration order.
	pub(crate) fn from_counts(counts: &HashMap<Symbol, usize>) -> Self {
		let total: usize = counts.values().sum();

		let mut entries: Vec<(Symbol, f64)> = counts
			.iter()
			.map(|(&symbol, &count)| (symbol, count as f64 / total as f64))
			.collect();
		entries.sort_by_key(|&(symbol, _)| symbol);

		Self { entries }
	}

	/// Selects a symbol for the uniform draw `r` in `[0, 1)`.
	///
	/// Walks the entries in their fixed order, keeping a running
	/// cumulative threshold; the first entry whose cumulative band
	/// contains `r` is selected.
	///
	/// If the cumulative sum falls short of `r` through floating-point
	/// imprecision, the last enumerated symbol is returned.
	///
	/// Returns `None` if the distribution has no entries.
	pub(crate) fn sample(&self, r: f64) -> Option<Symbol> {
		let mut cumulative = 0.0;

		let mut fallback: Option<Symbol> = None;
		for &(symbol, probability) in &self.entries {
			if r > cumulative + probability {
				cumulative += probability;
				fallback = Some(symbol);
				continue;
			}
			return Some(symbol);
		}

		// Float edge: should not happen, but kept for safety.
		fallback
	}

	/// Returns the probability of `symbol` following this context, or
	/// `None` if it was never observed.
	pub fn probability(&self, symbol: Symbol) -> Option<f64> {
		self.entries
			.iter()
			.find(|&&(s, _)| s == symbol)
			.map(|&(_, p)| p)
	}

	/// Iterates the `(symbol, probability)` entries in their fixed
	/// enumeration order.
	pub fn iter(&self) -> impl Iterator<Item = (Symbol, f64)> + '_ {
		self.entries.iter().copied()
	}

	/// Number of distinct observed continuations.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True if no continuation was ever observed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
