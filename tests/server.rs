//! Tests for the server command

mod common;

use clap::Parser;
use common::{BJP_NCP, config_for, write_dataset};
use hyper::{Method, StatusCode};
use rajya_sabha_predictor::{
	commands::{
		server::{ApiResponse, ServerState, route},
		types::ServerConfig,
	},
	engine::{Engine, SharedEngine},
};
use serde_json::json;
use tempfile::NamedTempFile;

/// Test server command help works
#[test]
fn server_help_works() {
	use assert_cmd::Command;
	let mut cmd = Command::new(assert_cmd::cargo::cargo_bin(env!("CARGO_PKG_NAME")));
	cmd.args(["server", "--help"]);
	cmd.assert().success();
}

/// Test ServerConfig parsing
#[test]
fn server_config_parsing() {
	let config = ServerConfig::try_parse_from(["server", "--port", "9090"]).unwrap();
	assert_eq!(config.port, 9090);
}

/// The port default and `PORT` fallback, checked in a child process.
#[test]
fn server_port_env_fallback() {
	let help = |port: Option<&str>| {
		let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin(env!("CARGO_PKG_NAME")));
		cmd.env_remove("PORT").args(["server", "--help"]);
		if let Some(port) = port {
			cmd.env("PORT", port);
		}
		let output = cmd.output().unwrap();
		assert!(output.status.success());
		String::from_utf8_lossy(&output.stdout).into_owned()
	};

	assert!(help(None).contains("[default: 5000]"));
	assert!(help(Some("7070")).contains("PORT=7070"));
}

fn state() -> (ServerState, NamedTempFile) {
	let file = write_dataset(BJP_NCP);
	let config = config_for(&file);
	let engine = Engine::from_config(&config).unwrap();
	(ServerState::new(SharedEngine::new(engine), config), file)
}

async fn get(state: &ServerState, path: &str, query: Option<&str>) -> ApiResponse {
	route(state, &Method::GET, path, query, &[]).await
}

async fn post(state: &ServerState, path: &str, body: &str) -> ApiResponse {
	route(state, &Method::POST, path, None, body.as_bytes()).await
}

#[tokio::test]
async fn predict_returns_canonical_schema() {
	let (state, _file) = state();
	let body = json!({
		"party_name": "BJP",
		"mla_strength": "132",
		"alliance_mla_strength": 132,
		"past_rs_wins": 3,
		"candidate_type": "incumbent",
	});

	let res = post(&state, "/predict", &body.to_string()).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["success"], true);
	assert_eq!(res.body["party_name"], "BJP");
	let pct = res.body["win_probability"].as_f64().unwrap();
	assert!((0.0..=100.0).contains(&pct));
	assert_eq!(res.body["prediction"], pct >= 50.0);
	assert_eq!(res.body["party_info"]["total_rs_wins"], 6);
}

#[tokio::test]
async fn predict_rejects_bad_input() {
	let (state, _file) = state();

	let negative = json!({
		"party_name": "BJP",
		"mla_strength": -4,
		"alliance_mla_strength": 132,
		"past_rs_wins": 3,
		"candidate_type": "incumbent",
	});
	let res = post(&state, "/predict", &negative.to_string()).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["success"], false);
	assert_eq!(res.body["error"], "mla_strength: must not be negative");

	let missing = json!({ "party_name": "BJP", "candidate_type": "new" });
	let res = post(&state, "/predict", &missing.to_string()).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert!(res.body["error"].as_str().unwrap().contains("past_rs_wins: is required"));

	let res = post(&state, "/predict", "{not json").await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body["success"], false);
}

#[tokio::test]
async fn predict_unknown_party_is_not_found() {
	let (state, _file) = state();
	let body = json!({
		"party_name": "UnknownParty",
		"mla_strength": 10,
		"alliance_mla_strength": 20,
		"past_rs_wins": 0,
		"candidate_type": "new",
	});

	let res = post(&state, "/predict", &body.to_string()).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.body["error"], "Party \"UnknownParty\" not found");
}

#[tokio::test]
async fn parties_are_ordered_by_strength() {
	let (state, _file) = state();

	let res = get(&state, "/api/parties", None).await;
	assert_eq!(res.status, StatusCode::OK);
	let names: Vec<_> = res.body["parties"]
		.as_array()
		.unwrap()
		.iter()
		.map(|p| p["party_name"].as_str().unwrap().to_string())
		.collect();
	assert_eq!(names, vec!["BJP", "NCP"]);
}

#[tokio::test]
async fn single_party_lookup() {
	let (state, _file) = state();

	let res = get(&state, "/api/party/NCP", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["party"]["mla_strength"], 42);
	assert_eq!(res.body["party"]["alliance_share"], 0.3403);
	assert_eq!(res.body["party"]["history"].as_array().unwrap().len(), 7);

	let res = get(&state, "/api/party/Shiv%20Sena", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.body["error"], "Party \"Shiv Sena\" not found");
}

#[tokio::test]
async fn stats_summarise_dataset() {
	let (state, _file) = state();

	let res = get(&state, "/api/stats", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["total_records"], 14);
	assert_eq!(res.body["unique_parties"], json!(["BJP", "NCP"]));
	assert_eq!(res.body["years"], json!([2010, 2012, 2014, 2016, 2018, 2020, 2024]));
	assert_eq!(res.body["party_wins"], json!({ "BJP": 6, "NCP": 1 }));
}

#[tokio::test]
async fn predictions_rank_all_parties() {
	let (state, _file) = state();

	let res = get(&state, "/api/predictions", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["year"], 2027);
	assert_eq!(res.body["winner"]["party_name"], "BJP");
	assert_eq!(res.body["runner_up"]["party_name"], "NCP");
	assert_eq!(res.body["predictions"].as_array().unwrap().len(), 2);

	let res = get(&state, "/api/predictions", Some("year=2030")).await;
	assert_eq!(res.body["year"], 2030);

	let res = get(&state, "/api/predictions", Some("year=soon")).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn model_and_schema_are_described() {
	let (state, _file) = state();

	let res = get(&state, "/api/model", None).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["diagnostics"]["weighting"], "uniform");
	assert_eq!(res.body["diagnostics"]["test_size"], 2);
	assert_eq!(res.body["diagnostics"]["party_encoding"][1], json!({ "party": "NCP", "code": 1 }));

	let res = get(&state, "/api/schema", None).await;
	let fields = res.body["fields"].as_array().unwrap();
	assert_eq!(fields[0]["name"], "party_name");
	assert_eq!(fields[1]["kind"], "count");
	assert_eq!(fields[1]["min"], 0.0);
}

#[tokio::test]
async fn reload_retrains_from_dataset_file() {
	let (state, file) = state();
	std::fs::write(file.path(), format!("{BJP_NCP}2024,INC,16,46,0,0,0\n")).unwrap();

	let res = post(&state, "/api/reload", "").await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.body["records"], 15);
	assert_eq!(res.body["parties"], 3);

	let res = get(&state, "/api/party/INC", None).await;
	assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn failed_reload_is_reported() {
	let (state, file) = state();
	std::fs::write(file.path(), "year,party\n").unwrap();

	let res = post(&state, "/api/reload", "").await;
	assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(res.body["success"], false);

	// Still serving the previous model.
	assert_eq!(get(&state, "/api/stats", None).await.body["total_records"], 14);
}

#[tokio::test]
async fn unknown_routes_are_json_404() {
	let (state, _file) = state();

	let res = get(&state, "/nope", None).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
	assert_eq!(res.body, json!({ "success": false, "error": "Not found" }));

	assert_eq!(get(&state, "/", None).await.status, StatusCode::OK);
}
