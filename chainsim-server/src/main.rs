use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};

use chainsim_core::model::experiment::Experiment;
use chainsim_core::model::markov_chain::MarkovChain;
use chainsim_core::model::sampler::Sampler;
use chainsim_core::model::{Distribution, Symbol};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Struct representing the body of the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainRequest {
	data: Vec<Symbol>,
	order: usize,
}

/// Struct representing query parameters for the `/v1/simulate` endpoint
#[derive(Deserialize)]
struct SimulateParams {
	seed: String, // comma-separated bins, ex. "0,1,2"
	count: usize,
	rng_seed: Option<u64>, // fixed seed -> reproducible output
}

/// Struct representing the body of the `/v1/experiment` endpoint
#[derive(Deserialize)]
struct ExperimentRequest {
	train: Vec<Symbol>,
	order: usize,
	test_seed: Vec<Symbol>,
	horizon: usize,
	actual: Vec<Symbol>,
	trials: usize,
	rng_seed: Option<u64>,
}

#[derive(Serialize)]
struct ExperimentResponse {
	mse: f64,
}

/// One context of the trained chain with its next-symbol distribution
#[derive(Serialize)]
struct ModelEntry {
	context: Vec<Symbol>,
	distribution: Distribution,
}

struct SharedData {
	chain: Option<MarkovChain>,
}

/// Parses a comma-separated bin list such as `"0,1,2"`.
fn parse_seed(raw: &str) -> Result<Vec<Symbol>, String> {
	raw.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(|s| {
			s.parse::<Symbol>()
				.map_err(|_| format!("Seed must be a comma-separated list of bins, got '{}'", s))
		})
		.collect()
}

/// Builds the rng for a request: a fixed seed when the caller asked for
/// reproducible output, OS entropy otherwise.
fn request_rng(rng_seed: Option<u64>) -> StdRng {
	match rng_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Builds a Markov chain from the posted training bins and stores it as
/// the server's current model, replacing any previous one.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: web::Json<TrainRequest>) -> impl Responder {
	let chain = match MarkovChain::build(&body.data, body.order) {
		Ok(chain) => chain,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	log::info!("trained order-{} chain with {} contexts", chain.order(), chain.len());
	shared_data.chain = Some(chain);
	HttpResponse::Ok().body("Chain trained successfully")
}

/// HTTP GET endpoint `/v1/model`
///
/// Returns the trained chain as JSON: every context with its
/// conditional next-symbol distribution, sorted by context for stable
/// output.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match &shared_data.chain {
		Some(chain) => {
			let mut entries: Vec<ModelEntry> = chain
				.entries()
				.map(|(context, distribution)| ModelEntry {
					context: context.to_vec(),
					distribution: distribution.clone(),
				})
				.collect();
			entries.sort_by(|a, b| a.context.cmp(&b.context));
			HttpResponse::Ok().json(entries)
		}
		None => HttpResponse::BadRequest().body("No chain trained, PUT /v1/train first"),
	}
}

/// HTTP GET endpoint `/v1/simulate`
///
/// Simulates future bins from the trained chain, starting at the seed
/// given in the query. Pass `rng_seed` to make the output reproducible.
#[get("/v1/simulate")]
async fn get_simulate(data: web::Data<Mutex<SharedData>>, query: web::Query<SimulateParams>) -> impl Responder {
	let seed = match parse_seed(&query.seed) {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let chain = match &shared_data.chain {
		Some(c) => c,
		None => return HttpResponse::BadRequest().body("No chain trained, PUT /v1/train first"),
	};

	let mut rng = request_rng(query.rng_seed);
	match Sampler::new(chain).sample(&seed, query.count, &mut rng) {
		Ok(simulated) => HttpResponse::Ok().json(simulated),
		Err(e) => HttpResponse::BadRequest().body(e),
	}
}

/// HTTP POST endpoint `/v1/experiment`
///
/// Runs a full experiment from the posted inputs: builds a chain from
/// the training bins, simulates the held-out future `trials` times and
/// returns the averaged mean squared error. Stateless; does not touch
/// the stored chain.
#[post("/v1/experiment")]
async fn post_experiment(body: web::Json<ExperimentRequest>) -> impl Responder {
	let experiment = match Experiment::new(body.order, body.horizon, body.trials) {
		Ok(e) => e,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut rng = request_rng(body.rng_seed);
	match experiment.run_parallel(&body.train, &body.test_seed, &body.actual, &mut rng) {
		Ok(mse) => {
			log::info!(
				"experiment order={} horizon={} trials={} -> mse={}",
				body.order,
				body.horizon,
				body.trials,
				mse
			);
			HttpResponse::Ok().json(ExperimentResponse { mse })
		}
		Err(e) => HttpResponse::BadRequest().body(e),
	}
}

/// Main entry point for the server.
///
/// Holds the trained chain in a `Mutex` for thread safety and starts an
/// Actix-web HTTP server over the training, inspection, simulation and
/// experiment endpoints.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Logging is configured through `env_logger` (`RUST_LOG=info`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData { chain: None };
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	log::info!("listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.app_data(shared_chain.clone())
			.service(put_train)
			.service(get_model)
			.service(get_simulate)
			.service(post_experiment)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
