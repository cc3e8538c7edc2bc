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
	prelude::{DEFAULT_PORT, Year},
	types::{CandidateType, ScoringRequest},
};

/// Serve the JSON API.
#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct ServerConfig {
	/// Port to listen on.
	#[clap(long, env = "PORT", default_value_t = DEFAULT_PORT)]
	pub port: u16,
}

/// Score a single scenario.
#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct PredictConfig {
	/// Party label as it appears in the dataset.
	#[clap(long)]
	pub party: String,

	/// Seats the party holds in the assembly.
	#[clap(long, allow_negative_numbers = true)]
	pub mla: f64,

	/// Seats of the party and its coalition partners.
	#[clap(long, allow_negative_numbers = true)]
	pub alliance: f64,

	/// Rajya Sabha seats won in earlier cycles.
	#[clap(long, allow_negative_numbers = true)]
	pub past_wins: f64,

	/// new, mixed or incumbent (aliases such as `veteran` or `fresh` are accepted).
	#[clap(long)]
	pub candidate_type: CandidateType,

	/// Election year to score. Defaults to `--prediction-year`.
	#[clap(long)]
	pub year: Option<Year>,

	/// Print the result as JSON.
	#[clap(long)]
	pub json: bool,
}

impl PredictConfig {
	pub fn to_request(&self, default_year: Year) -> ScoringRequest {
		ScoringRequest {
			party_name: self.party.clone(),
			mla_strength: self.mla,
			alliance_mla_strength: self.alliance,
			past_rs_wins: self.past_wins,
			candidate_type: self.candidate_type,
			year: self.year.unwrap_or(default_year),
		}
	}
}

/// Rank every party in the dataset.
#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct RankConfig {
	/// Election year to score. Defaults to `--prediction-year`.
	#[clap(long)]
	pub year: Option<Year>,

	/// Print the ranking as JSON.
	#[clap(long)]
	pub json: bool,
}

/// Train the model and print its diagnostics.
#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct TrainConfig {
	/// Print the diagnostics as JSON.
	#[clap(long)]
	pub json: bool,
}
