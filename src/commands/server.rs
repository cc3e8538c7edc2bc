// Copyright 2024-2026 Rajya Sabha Predictor Developers.
// This file is part of rajya-sabha-predictor.

// rajya-sabha-predictor is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// rajya-sabha-predictor is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with rajya-sabha-predictor.  If not, see <http://www.gnu.org/licenses/>.

//! Server command implementation for the REST API.
//!
//! Every response is JSON. Failures carry `{"success": false, "error": ...}` and a status code
//! derived from the [`Error`] variant.

use crate::{
	commands::types::ServerConfig,
	engine::SharedEngine,
	error::Error,
	opt::EngineConfig,
	prelude::{LOG_TARGET, Year},
	prometheus,
	utils::{TimedFuture, percent_decode, query_param},
	validation::{SCORING_FIELDS, YEAR, parse_scoring_request},
};
use http_body_util::{BodyExt, Full};
use hyper::{
	Method, Request, Response, StatusCode,
	body::Bytes,
	header::{CONTENT_TYPE, HeaderValue},
	service::service_fn,
};
use hyper_util::{
	rt::{TokioExecutor, TokioIo},
	server::conn::auto::Builder,
};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

type Body = Full<Bytes>;

/// What every request handler can reach.
#[derive(Debug, Clone)]
pub struct ServerState {
	pub engine: SharedEngine,
	/// Used by `/api/reload` to retrain.
	pub config: EngineConfig,
}

impl ServerState {
	pub fn new(engine: SharedEngine, config: EngineConfig) -> Self {
		Self { engine, config }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
	pub status: StatusCode,
	pub body: Value,
}

impl ApiResponse {
	fn ok(body: Value) -> Self {
		Self { status: StatusCode::OK, body }
	}

	fn failure(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, body: json!({ "success": false, "error": message.into() }) }
	}
}

impl From<Error> for ApiResponse {
	fn from(err: Error) -> Self {
		let status = status_of(&err);
		if status.is_server_error() {
			log::error!(target: LOG_TARGET, "request failed: {err:?}");
		} else {
			log::debug!(target: LOG_TARGET, "request rejected: {err}");
		}
		ApiResponse::failure(status, err.to_string())
	}
}

pub fn status_of(err: &Error) -> StatusCode {
	match err {
		Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
		Error::UnknownParty(_) => StatusCode::NOT_FOUND,
		Error::InsufficientData => StatusCode::CONFLICT,
		_ => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

/// Answer one request. Kept free of hyper types so it can be driven directly.
pub async fn route(
	state: &ServerState,
	method: &Method,
	path: &str,
	query: Option<&str>,
	body: &[u8],
) -> ApiResponse {
	let result = match (method, path) {
		(&Method::GET, "/") => Ok(health(state)),
		(&Method::POST, "/predict") => predict(state, body),
		(&Method::GET, "/api/parties") => Ok(parties(state)),
		(&Method::GET, "/api/stats") => Ok(stats(state)),
		(&Method::GET, "/api/predictions") => predictions(state, query),
		(&Method::GET, "/api/model") => Ok(model(state)),
		(&Method::GET, "/api/schema") => Ok(json!({ "success": true, "fields": SCORING_FIELDS })),
		(&Method::POST, "/api/reload") => reload(state).await,
		(&Method::GET, p) if p.starts_with("/api/party/") => {
			let name = percent_decode(&p["/api/party/".len()..]);
			party(state, &name)
		},
		_ => return ApiResponse::failure(StatusCode::NOT_FOUND, "Not found"),
	};

	match result {
		Ok(body) => ApiResponse::ok(body),
		Err(e) => e.into(),
	}
}

fn health(state: &ServerState) -> Value {
	let engine = state.engine.snapshot();
	json!({
		"success": true,
		"status": "ok",
		"records": engine.dataset().len(),
		"parties": engine.encoder().len(),
		"prediction_year": engine.prediction_year(),
	})
}

fn predict(state: &ServerState, body: &[u8]) -> Result<Value, Error> {
	let engine = state.engine.snapshot();
	let outcome = serde_json::from_slice::<Value>(body)
		.map_err(Error::from)
		.and_then(|value| parse_scoring_request(&value, engine.prediction_year()))
		.and_then(|request| engine.predict(&request));

	let result = match outcome {
		Ok(result) => {
			prometheus::on_prediction_success();
			result
		},
		Err(e) => {
			prometheus::on_prediction_failure();
			return Err(e);
		},
	};

	let party_info = engine.profile(&result.party_name).ok();
	Ok(json!({
		"success": true,
		"party_name": result.party_name,
		"win_probability": result.win_probability,
		"prediction": result.prediction,
		"party_info": party_info,
	}))
}

fn parties(state: &ServerState) -> Value {
	let engine = state.engine.snapshot();
	json!({ "success": true, "parties": engine.profiles_by_strength() })
}

fn party(state: &ServerState, name: &str) -> Result<Value, Error> {
	let engine = state.engine.snapshot();
	let profile = engine.profile(name)?;
	Ok(json!({ "success": true, "party": profile }))
}

fn stats(state: &ServerState) -> Value {
	let stats = state.engine.snapshot().stats();
	json!({
		"success": true,
		"total_records": stats.total_records,
		"unique_parties": stats.unique_parties,
		"years": stats.years,
		"party_wins": stats.party_wins,
	})
}

fn predictions(state: &ServerState, query: Option<&str>) -> Result<Value, Error> {
	let engine = state.engine.snapshot();
	let year = match query_param(query, YEAR).filter(|y| !y.trim().is_empty()) {
		Some(y) => y
			.trim()
			.parse::<Year>()
			.map_err(|_| Error::invalid_field(YEAR, "must be a whole number"))?,
		None => engine.prediction_year(),
	};

	let ranking = engine.rank_all(year)?;
	Ok(json!({
		"success": true,
		"year": ranking.year,
		"predictions": ranking.predictions,
		"winner": ranking.winner,
		"runner_up": ranking.runner_up,
	}))
}

fn model(state: &ServerState) -> Value {
	let engine = state.engine.snapshot();
	json!({ "success": true, "diagnostics": engine.diagnostics() })
}

async fn reload(state: &ServerState) -> Result<Value, Error> {
	let shared = state.engine.clone();
	let config = state.config.clone();

	let (engine, elapsed) =
		tokio::task::spawn_blocking(move || shared.reload(&config)).timed().await;
	let engine = engine??;

	let diagnostics = engine.diagnostics();
	prometheus::on_model_reload();
	prometheus::observe_training_duration(elapsed.as_millis() as f64);
	prometheus::set_model(diagnostics.records, diagnostics.evaluation.as_ref().map(|e| e.accuracy));

	Ok(json!({
		"success": true,
		"records": diagnostics.records,
		"parties": engine.encoder().len(),
		"accuracy": diagnostics.evaluation.as_ref().map(|e| e.accuracy),
	}))
}

async fn handle_request(
	state: Arc<ServerState>,
	req: Request<hyper::body::Incoming>,
) -> Result<Response<Body>, hyper::Error> {
	prometheus::on_request();
	let (parts, body) = req.into_parts();

	let response = async {
		let bytes = match body.collect().await {
			Ok(collected) => collected.to_bytes(),
			Err(e) =>
				return ApiResponse::failure(
					StatusCode::BAD_REQUEST,
					format!("Failed to read body: {e}"),
				),
		};
		route(&state, &parts.method, parts.uri.path(), parts.uri.query(), &bytes).await
	};
	let (response, elapsed) = response.timed().await;
	prometheus::observe_request_duration(elapsed.as_secs_f64() * 1000.0);

	log::debug!(
		target: LOG_TARGET,
		"{} {} -> {} in {elapsed:?}",
		parts.method,
		parts.uri.path(),
		response.status
	);

	Ok(to_http(response))
}

fn to_http(response: ApiResponse) -> Response<Body> {
	let bytes = serde_json::to_vec(&response.body).unwrap_or_default();
	let mut http = Response::new(Body::from(bytes));
	*http.status_mut() = response.status;
	http.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	http
}

pub async fn server_cmd(state: ServerState, config: ServerConfig) -> Result<(), Error> {
	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = TcpListener::bind(&addr)
		.await
		.map_err(|e| Error::Other(format!("Failed to bind to port {}: {}", config.port, e)))?;

	log::info!(target: LOG_TARGET, "REST API server listening on http://{addr}");

	let state = Arc::new(state);
	loop {
		let (stream, _) = match listener.accept().await {
			Ok(conn) => conn,
			Err(e) => {
				log::error!(target: LOG_TARGET, "Failed to accept connection: {e}");
				continue;
			},
		};

		let state = state.clone();
		let io = TokioIo::new(stream);
		let builder = Builder::new(TokioExecutor::new());
		let conn = builder
			.serve_connection_with_upgrades(
				io,
				service_fn(move |req| handle_request(state.clone(), req)),
			)
			.into_owned();

		tokio::spawn(async move {
			if let Err(e) = conn.await {
				log::error!(target: LOG_TARGET, "Error serving connection: {e}");
			}
		});
	}
}
