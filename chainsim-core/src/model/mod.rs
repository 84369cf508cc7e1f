//! Top-level module for the Markov chain simulation system.
//!
//! This crate provides a fixed-order Markov chain simulator, including:
//! - Chain construction from binned observations (`MarkovChain`)
//! - Conditional next-symbol distributions (`Distribution`)
//! - Stochastic sequence simulation (`Sampler`)
//! - Simulation scoring (`scorer`)
//! - Multi-trial experiment orchestration (`Experiment`)

/// Fixed-order Markov chain built from a flat observation sequence.
///
/// Handles the window scan over training data, transition counting,
/// and finalization into immutable conditional distributions.
pub mod markov_chain;

/// Immutable conditional next-symbol distribution.
///
/// Stores empirical frequencies in a fixed enumeration order and supports
/// inverse-CDF weighted selection. Finalized by `markov_chain`, consumed
/// by `sampler`.
mod distribution;

/// Stochastic simulation of future sequences from a built chain.
///
/// Supports weighted random next-symbol selection with a uniform
/// fallback over the bin alphabet for contexts never seen in training.
pub mod sampler;

/// Mean-squared-error scoring of a simulated sequence against the
/// actual outcome.
pub mod scorer;

/// Multi-trial experiment orchestration.
///
/// Builds one chain, runs many independent simulations against it and
/// averages the per-trial errors, sequentially or across worker threads.
pub mod experiment;

pub use distribution::Distribution;

/// A discretized observation: one bin of the daily price-change alphabet.
///
/// Symbols carry no meaning beyond equality and hashability; the upstream
/// discretizer decides what each bin stands for.
pub type Symbol = u8;

/// Size of the binned daily-change alphabet produced by the upstream
/// discretizer. The sampler draws uniformly from `0..NUM_BINS` when it
/// meets a context with no training support.
pub const NUM_BINS: Symbol = 4;
