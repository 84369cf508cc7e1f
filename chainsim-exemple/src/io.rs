use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a price file and returns its closing prices.
///
/// - One price per line; blank lines are ignored
/// - A line that does not parse as a number is an error
pub fn read_prices<P: AsRef<Path>>(filename: P) -> io::Result<Vec<f64>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;

	contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(|line| {
			line.parse::<f64>().map_err(|_| {
				io::Error::new(
					io::ErrorKind::InvalidData,
					format!("Not a price: {}", line),
				)
			})
		})
		.collect()
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/goog.txt"` → `"goog"`
/// - `"goog.txt"` → `"goog"`
fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns full paths, sorted by name so runs are reproducible.
fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Loads every `.txt` price series from a directory.
///
/// Each series is named after its file stem, standing in for the stock
/// symbol. A missing directory yields no series rather than an error,
/// so the caller can fall back to synthetic data.
pub fn load_price_series<P: AsRef<Path>>(dir: P) -> io::Result<Vec<(String, Vec<f64>)>> {
	if !dir.as_ref().is_dir() {
		return Ok(Vec::new());
	}

	let mut series = Vec::new();
	for path in list_files(&dir, "txt")? {
		let name = get_filename(&path)?;
		let prices = read_prices(&path)?;
		series.push((name, prices));
	}

	Ok(series)
}
