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

use crate::{
	classifier::TrainParams,
	error::Error,
	prelude::{
		DEFAULT_DATASET, DEFAULT_LEGISLATURE_SIZE, DEFAULT_MAJORITY_THRESHOLD,
		DEFAULT_PREDICTION_YEAR, DEFAULT_RECENCY_DECAY, Year,
	},
};

use clap::*;
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// How training records are weighted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
	/// Every record has weight 1.
	Uniform,
	/// Records are weighted `decay^(latest_year - year)`.
	Recency,
}

impl Weighting {
	pub fn sample_weight(self, decay: f64, latest_year: Year, year: Year) -> f64 {
		match self {
			Self::Uniform => 1.0,
			Self::Recency => recency_weight(decay, latest_year, year),
		}
	}
}

impl fmt::Display for Weighting {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let w = match self {
			Self::Uniform => "uniform",
			Self::Recency => "recency",
		};
		write!(f, "{}", w)
	}
}

/// Exponential decay relative to `reference_year`. Records from the reference year weigh 1.
pub fn recency_weight(decay: f64, reference_year: Year, year: Year) -> f64 {
	decay.powi(reference_year - year)
}

/// When an alliance controls the legislative assembly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MajorityRule {
	pub threshold: u32,
	pub legislature_size: u32,
}

impl Default for MajorityRule {
	fn default() -> Self {
		Self { threshold: DEFAULT_MAJORITY_THRESHOLD, legislature_size: DEFAULT_LEGISLATURE_SIZE }
	}
}

impl MajorityRule {
	pub fn has_majority(&self, alliance_mla_strength: f64) -> bool {
		alliance_mla_strength >= f64::from(self.threshold)
	}

	/// `seats` as a fraction of the whole legislative assembly.
	pub fn share(&self, seats: f64) -> f64 {
		seats / f64::from(self.legislature_size)
	}
}

/// Options that decide how the engine is trained.
///
/// Shared by every subcommand and by the `/api/reload` endpoint.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct EngineConfig {
	/// Path to the historical dataset (CSV with a header row).
	#[clap(long, env = "DATASET", default_value = DEFAULT_DATASET)]
	pub dataset: PathBuf,

	/// How training records are weighted.
	#[clap(long, value_enum, default_value_t = Weighting::Uniform)]
	pub weighting: Weighting,

	/// Per-year decay used by `--weighting recency` and the recent win rate.
	#[clap(long, default_value_t = DEFAULT_RECENCY_DECAY)]
	pub decay: f64,

	/// Share of each class held out for the diagnostics.
	#[clap(long, default_value_t = 0.2)]
	pub test_fraction: f64,

	/// Seed of the train/test split.
	#[clap(long, default_value_t = 42)]
	pub seed: u64,

	/// Seats an alliance needs for a majority.
	#[clap(long, default_value_t = DEFAULT_MAJORITY_THRESHOLD)]
	pub majority_threshold: u32,

	/// Seats in the legislative assembly.
	#[clap(long, default_value_t = DEFAULT_LEGISLATURE_SIZE)]
	pub legislature_size: u32,

	/// Don't feed the alliance-majority flag to the classifier.
	#[clap(long)]
	pub no_majority_feature: bool,

	/// Don't feed the MLA and alliance seat shares to the classifier.
	#[clap(long)]
	pub no_share_features: bool,

	/// Gradient descent iterations.
	#[clap(long, default_value_t = 2000)]
	pub iterations: usize,

	/// Gradient descent step size.
	#[clap(long, default_value_t = 0.5)]
	pub learning_rate: f64,

	/// L2 regularisation strength.
	#[clap(long, default_value_t = 0.01)]
	pub l2: f64,

	/// The year scored when a request does not name one.
	#[clap(long, default_value_t = DEFAULT_PREDICTION_YEAR)]
	pub prediction_year: Year,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			dataset: PathBuf::from(DEFAULT_DATASET),
			weighting: Weighting::Uniform,
			decay: DEFAULT_RECENCY_DECAY,
			test_fraction: 0.2,
			seed: 42,
			majority_threshold: DEFAULT_MAJORITY_THRESHOLD,
			legislature_size: DEFAULT_LEGISLATURE_SIZE,
			no_majority_feature: false,
			no_share_features: false,
			iterations: 2000,
			learning_rate: 0.5,
			l2: 0.01,
			prediction_year: DEFAULT_PREDICTION_YEAR,
		}
	}
}

impl EngineConfig {
	pub fn majority_rule(&self) -> MajorityRule {
		MajorityRule { threshold: self.majority_threshold, legislature_size: self.legislature_size }
	}

	pub fn train_params(&self) -> TrainParams {
		TrainParams { iterations: self.iterations, learning_rate: self.learning_rate, l2: self.l2 }
	}

	pub fn validate(&self) -> Result<(), Error> {
		if !(self.decay > 0.0 && self.decay <= 1.0) {
			return Err(Error::Config(format!("decay must be in (0, 1], got {}", self.decay)));
		}
		if !(0.0..1.0).contains(&self.test_fraction) {
			return Err(Error::Config(format!(
				"test fraction must be in [0, 1), got {}",
				self.test_fraction
			)));
		}
		if self.legislature_size == 0 || self.majority_threshold > self.legislature_size {
			return Err(Error::Config(format!(
				"majority threshold {} does not fit a legislature of {} seats",
				self.majority_threshold, self.legislature_size
			)));
		}
		if self.iterations == 0 {
			return Err(Error::Config("at least one iteration is required".into()));
		}
		if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
			return Err(Error::Config(format!(
				"learning rate must be positive, got {}",
				self.learning_rate
			)));
		}
		if !(self.l2.is_finite() && self.l2 >= 0.0) {
			return Err(Error::Config(format!("l2 must not be negative, got {}", self.l2)));
		}
		Ok(())
	}
}
