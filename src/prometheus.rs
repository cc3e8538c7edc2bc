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

use crate::prelude::LOG_TARGET;
use http_body_util::Full;
pub use hidden::*;
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
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn serve_req<B>(req: Request<B>) -> Result<Response<Full<Bytes>>, hyper::Error> {
	let response = match (req.method(), req.uri().path()) {
		(&Method::GET, "/metrics") => {
			let mut buffer = vec![];
			let encoder = TextEncoder::new();
			let metric_families = prometheus::gather();
			match encoder.encode(&metric_families, &mut buffer) {
				Ok(()) => {
					let mut response = Response::new(Full::from(buffer));
					if let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) {
						response.headers_mut().insert(CONTENT_TYPE, content_type);
					}
					response
				},
				Err(e) => {
					log::warn!(target: LOG_TARGET, "Failed to encode metrics: {e}");
					with_status(StatusCode::INTERNAL_SERVER_ERROR)
				},
			}
		},
		(&Method::GET, "/") => with_status(StatusCode::OK),
		_ => with_status(StatusCode::NOT_FOUND),
	};

	Ok(response)
}

fn with_status(status: StatusCode) -> Response<Full<Bytes>> {
	let mut response = Response::new(Full::new(Bytes::new()));
	*response.status_mut() = status;
	response
}

/// Bind the metrics endpoint and serve it in the background.
pub async fn run(port: u16) -> Result<(), String> {
	let addr = SocketAddr::from(([0, 0, 0, 0], port));
	let listener = TcpListener::bind(&addr)
		.await
		.map_err(|e| format!("Failed bind socket on port {port} {e:?}"))?;

	log::info!(target: LOG_TARGET, "Started prometheus endpoint on http://{addr}");

	tokio::spawn(async move {
		loop {
			let (stream, _) = match listener.accept().await {
				Ok(conn) => conn,
				Err(e) => {
					log::warn!(target: LOG_TARGET, "Prometheus accept error: {e}");
					continue;
				},
			};

			let conn = Builder::new(TokioExecutor::new())
				.serve_connection_with_upgrades(TokioIo::new(stream), service_fn(serve_req))
				.into_owned();

			tokio::spawn(async move {
				if let Err(e) = conn.await {
					log::debug!(target: LOG_TARGET, "Prometheus connection error: {e}");
				}
			});
		}
	});

	Ok(())
}

mod hidden {
	use once_cell::sync::Lazy;
	use prometheus::{Counter, Gauge, opts, register_counter, register_gauge};

	static HTTP_REQUESTS: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"rajya_sabha_predictor_http_requests",
			"Number of API requests handled",
		))
		.unwrap()
	});

	static HTTP_REQUEST_DURATION: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(
			"rajya_sabha_predictor_http_request_duration_ms",
			"The time in milliseconds it took to answer the last API request"
		)
		.unwrap()
	});

	static PREDICTIONS_SERVED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"rajya_sabha_predictor_predictions_served",
			"Number of scenarios scored successfully",
		))
		.unwrap()
	});

	static PREDICTION_FAILURES: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"rajya_sabha_predictor_prediction_failures",
			"Number of scoring requests that were rejected",
		))
		.unwrap()
	});

	static MODEL_RELOADS: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"rajya_sabha_predictor_model_reloads",
			"Number of times a retrained model was published",
		))
		.unwrap()
	});

	static TRAINING_DURATION: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(
			"rajya_sabha_predictor_training_duration_ms",
			"The time in milliseconds it took to load the dataset and train the model"
		)
		.unwrap()
	});

	static TRAINING_RECORDS: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(opts!(
			"rajya_sabha_predictor_training_records",
			"Number of records in the dataset the served model was trained on"
		))
		.unwrap()
	});

	static MODEL_ACCURACY: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(opts!(
			"rajya_sabha_predictor_model_accuracy",
			"Held-out accuracy of the served model, -1 when nothing was held out"
		))
		.unwrap()
	});

	pub fn on_request() {
		HTTP_REQUESTS.inc();
	}

	pub fn observe_request_duration(time: f64) {
		HTTP_REQUEST_DURATION.set(time);
	}

	pub fn on_prediction_success() {
		PREDICTIONS_SERVED.inc();
	}

	pub fn on_prediction_failure() {
		PREDICTION_FAILURES.inc();
	}

	pub fn on_model_reload() {
		MODEL_RELOADS.inc();
	}

	pub fn observe_training_duration(time: f64) {
		TRAINING_DURATION.set(time);
	}

	pub fn set_model(records: usize, accuracy: Option<f64>) {
		TRAINING_RECORDS.set(records as f64);
		MODEL_ACCURACY.set(accuracy.unwrap_or(-1.0));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn metrics_endpoint_serves_text_format() {
		on_prediction_success();

		let req = Request::builder().uri("/metrics").body(()).unwrap();
		let response = serve_req(req).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);

		let req = Request::builder().uri("/nope").body(()).unwrap();
		assert_eq!(serve_req(req).await.unwrap().status(), StatusCode::NOT_FOUND);
	}
}
