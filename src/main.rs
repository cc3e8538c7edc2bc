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

//! # Rajya Sabha Predictor.
//!
//! Predicts the outcome of Maharashtra Rajya Sabha elections from assembly strength, alliance
//! strength, past wins and candidate experience, using a classifier trained on a historical
//! CSV dataset. See `help` for more information.
//!
//! # Implementation Notes:
//!
//! The dataset is loaded and the model trained once at start. If that fails the process exits
//! without serving anything. The `server` command keeps running until it receives SIGINT or
//! SIGTERM; `/api/reload` retrains in the background and swaps the new model in.

#![cfg_attr(docsrs, feature(doc_cfg))]

use clap::Parser;
use futures::future::{BoxFuture, FutureExt};
use rajya_sabha_predictor::{
	commands::{
		self,
		server::ServerState,
		types::{PredictConfig, RankConfig, ServerConfig, TrainConfig},
	},
	engine::{Engine, SharedEngine},
	error::Error,
	opt::EngineConfig,
	prelude::{DEFAULT_PROMETHEUS_PORT, LOG_TARGET},
	prometheus,
	utils::TimedFuture,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
#[clap(author, version, about)]
pub struct Opt {
	#[clap(subcommand)]
	pub command: Command,

	/// The prometheus endpoint TCP port. Only used by `server`.
	#[clap(long, short, env = "PROMETHEUS_PORT", default_value_t = DEFAULT_PROMETHEUS_PORT)]
	pub prometheus_port: u16,

	/// Sets a custom logging filter. Syntax is `<target>=<level>`, e.g.
	/// -lrajya-sabha-predictor=debug.
	///
	/// Log levels (least to most verbose) are error, warn, info, debug, and trace.
	/// By default, all targets log `info`. The global log level can be set with `-l<level>`.
	#[clap(long, short, default_value = "info")]
	pub log: String,

	#[clap(flatten)]
	pub engine: EngineConfig,
}

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
pub enum Command {
	/// Serve the JSON API.
	Server(ServerConfig),
	/// Score a single scenario.
	Predict(PredictConfig),
	/// Rank every party for an election year.
	Rank(RankConfig),
	/// Train the model and print its diagnostics.
	Train(TrainConfig),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let Opt { command, prometheus_port, log, engine: engine_config } = Opt::parse();
	let filter = EnvFilter::from_default_env().add_directive(log.parse()?);
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	engine_config.validate()?;

	if let Command::Server(_) = command {
		if let Err(e) = prometheus::run(prometheus_port).await {
			log::warn!("Failed to start prometheus endpoint: {e}");
		}
	}

	let engine = load_engine(engine_config.clone()).await?;

	let fut = match command {
		Command::Server(cfg) => {
			let state = ServerState::new(SharedEngine::new(engine), engine_config);
			commands::server_cmd(state, cfg).boxed()
		},
		Command::Predict(cfg) => commands::predict_cmd(Arc::new(engine), cfg).boxed(),
		Command::Rank(cfg) => commands::rank_cmd(Arc::new(engine), cfg).boxed(),
		Command::Train(cfg) => commands::train_cmd(Arc::new(engine), cfg).boxed(),
	};

	let res = run_command(fut).await;

	log::debug!(target: LOG_TARGET, "execution finished. outcome = {res:?}");
	res
}

/// Load the dataset and train on a blocking thread.
async fn load_engine(config: EngineConfig) -> Result<Engine, Error> {
	let path = config.dataset.clone();
	let (engine, elapsed) =
		tokio::task::spawn_blocking(move || Engine::from_config(&config)).timed().await;

	let engine = engine?.inspect_err(|e| {
		log::error!(target: LOG_TARGET, "failed to load {}: {e}", path.display());
	})?;

	let diagnostics = engine.diagnostics();
	prometheus::observe_training_duration(elapsed.as_millis() as f64);
	prometheus::set_model(diagnostics.records, diagnostics.evaluation.as_ref().map(|e| e.accuracy));
	log::info!(
		target: LOG_TARGET,
		"model ready in {elapsed:?}: {} records, {} parties",
		diagnostics.records,
		engine.encoder().len()
	);

	Ok(engine)
}

#[cfg(target_family = "unix")]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::unix::{SignalKind, signal};

	let mut stream_int = signal(SignalKind::interrupt()).map_err(Error::Io)?;
	let mut stream_term = signal(SignalKind::terminate()).map_err(Error::Io)?;

	tokio::select! {
		_ = stream_int.recv() => {
			Ok(())
		}
		_ = stream_term.recv() => {
			Ok(())
		}
		res = fut => res,
	}
}

#[cfg(not(unix))]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::ctrl_c;
	tokio::select! {
		_ = ctrl_c() => Ok(()),
		res = fut => res,
	}
}
