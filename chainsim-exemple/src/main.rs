use chainsim_core::model::experiment::Experiment;
use chainsim_core::model::{NUM_BINS, Symbol};
use rand::Rng;

mod io;

/// Candidate chain orders to sweep.
const ORDERS: [usize; 5] = [1, 3, 5, 7, 9];

/// Number of future days each trial predicts.
const DAYS: usize = 5;

/// Number of independent trials per order.
const TRIALS: usize = 500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load all price series from the "data" directory (.txt files, one
    // closing price per line; the file stem names the stock symbol)
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "./data".to_owned());
    let mut series = io::load_price_series(&data_dir)?;

    // No data files: fall back to one synthetic random walk so the
    // example still runs end to end
    if series.is_empty() {
        println!("No price files in {}, using a synthetic series", data_dir);
        series.push(("synthetic".to_owned(), synthetic_prices(500)));
    }

    for (symbol, prices) in &series {
        // Discretize: fractional daily changes, then the 4-bin alphabet
        let changes = daily_changes(prices);
        let bins = bin_changes(&changes);

        if bins.len() <= DAYS {
            println!("{}: series too short, skipping", symbol);
            continue;
        }

        // Hold out the last DAYS bins as the actual future; everything
        // before is history to train on
        let (history, actual) = bins.split_at(bins.len() - DAYS);

        println!("{}", symbol);
        println!("====");
        println!("Bins: {:?}", bin_histogram(&bins));
        println!("Actual: {:?}", actual);

        for &order in &ORDERS {
            if history.len() <= order {
                println!("Order {} : not enough history", order);
                continue;
            }

            // Seed each simulation with the bins just before the
            // held-out future
            let test_seed = &history[history.len() - order..];

            let experiment = Experiment::new(order, DAYS, TRIALS)?;
            let error = experiment.run_parallel(history, test_seed, actual, &mut rand::rng())?;
            println!("Order {} : {}", order, error);
        }
        println!();
    }

    Ok(())
}

/// Generates a synthetic closing-price series as a random walk with
/// daily moves of up to ±2%.
fn synthetic_prices(days: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    let mut prices = Vec::with_capacity(days);

    let mut price = 100.0;
    for _ in 0..days {
        price *= 1.0 + rng.random_range(-0.02..0.02);
        prices.push(price);
    }
    prices
}

/// Computes fractional day-over-day changes of a price series.
fn daily_changes(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Discretizes daily changes into the 4-bin alphabet:
/// 0 = drop of 1% or more, 1 = smaller drop, 2 = gain below 1%,
/// 3 = gain of 1% or more.
fn bin_changes(changes: &[f64]) -> Vec<Symbol> {
    changes
        .iter()
        .map(|&change| {
            if change <= -0.01 {
                0
            } else if change < 0.0 {
                1
            } else if change < 0.01 {
                2
            } else {
                3
            }
        })
        .collect()
}

/// Counts how many observations fell into each bin.
fn bin_histogram(bins: &[Symbol]) -> Vec<usize> {
    let mut histogram = vec![0usize; NUM_BINS as usize];
    for &bin in bins {
        histogram[bin as usize] += 1;
    }
    histogram
}
