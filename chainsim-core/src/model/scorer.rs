use super::Symbol;

/// Computes the mean squared error between two sequences.
///
/// The score is the average of squared elementwise differences. It is
/// pure and symmetric in its arguments.
///
/// # Errors
/// - The sequences must have the same length.
/// - The sequences must not be empty (the mean of zero terms is
///   undefined).
pub fn mse(observed: &[Symbol], expected: &[Symbol]) -> Result<f64, String> {
	if observed.len() != expected.len() {
		return Err(format!(
			"Length mismatch: observed {} vs expected {}",
			observed.len(),
			expected.len()
		));
	}
	if observed.is_empty() {
		return Err("Cannot score empty sequences".to_owned());
	}

	let total: f64 = observed
		.iter()
		.zip(expected)
		.map(|(&o, &e)| {
			let difference = f64::from(e) - f64::from(o);
			difference * difference
		})
		.sum();

	Ok(total / observed.len() as f64)
}
