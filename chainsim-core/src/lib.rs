//! Markov-chain stock simulation library.
//!
//! This crate provides a fixed-order Markov chain system for binned
//! market observations, including:
//! - Chain construction from a discretized observation sequence
//! - Stochastic simulation of future sequences
//! - Mean-squared-error scoring against known outcomes
//! - Multi-trial experiments producing a single error metric per order
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core chain model, sampling, scoring and experiment logic.
///
/// This module exposes the high-level simulation interface while keeping
/// internal model representations private.
pub mod model;
