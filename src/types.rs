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

use crate::prelude::Year;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Experience profile of the candidates a party fields.
///
/// The numeric codes follow the cleaned dataset and are what the model sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateType {
	New,
	Mixed,
	Incumbent,
}

impl CandidateType {
	pub fn code(self) -> u8 {
		match self {
			CandidateType::New => 0,
			CandidateType::Mixed => 1,
			CandidateType::Incumbent => 2,
		}
	}

	pub fn from_code(code: u8) -> Option<Self> {
		match code {
			0 => Some(CandidateType::New),
			1 => Some(CandidateType::Mixed),
			2 => Some(CandidateType::Incumbent),
			_ => None,
		}
	}
}

impl FromStr for CandidateType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_lowercase();
		let candidate = match normalized.as_str() {
			"new" | "first-time" | "firsttime" | "fresh" => CandidateType::New,
			"incumbent" | "experienced" | "experience" | "senior" | "veteran" | "returning" =>
				CandidateType::Incumbent,
			"mixed" | "both" => CandidateType::Mixed,
			other => other
				.parse::<u8>()
				.ok()
				.and_then(CandidateType::from_code)
				.ok_or_else(|| format!("Invalid candidate type `{}`", s.trim()))?,
		};
		Ok(candidate)
	}
}

impl fmt::Display for CandidateType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			CandidateType::New => "new",
			CandidateType::Mixed => "mixed",
			CandidateType::Incumbent => "incumbent",
		};
		f.write_str(s)
	}
}

/// One historical observation: how a party stood in one election year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionRecord {
	pub year: Year,
	pub party: String,
	pub mla_strength: u32,
	pub alliance_mla_strength: u32,
	pub past_rs_wins: u32,
	pub candidate_type: CandidateType,
	pub winner: bool,
}

/// A party's record in one year, as listed in its profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
	pub year: Year,
	pub mla_strength: u32,
	pub alliance_mla_strength: u32,
	pub past_rs_wins: u32,
	pub candidate_type: CandidateType,
	pub winner: bool,
}

impl From<&ElectionRecord> for HistoryEntry {
	fn from(r: &ElectionRecord) -> Self {
		Self {
			year: r.year,
			mla_strength: r.mla_strength,
			alliance_mla_strength: r.alliance_mla_strength,
			past_rs_wins: r.past_rs_wins,
			candidate_type: r.candidate_type,
			winner: r.winner,
		}
	}
}

/// Aggregated view of a party, built once from the dataset.
///
/// The `mla_strength`, `alliance_mla_strength`, `current_past_rs_wins` and
/// `current_candidate_type` fields come from the party's most recent record and serve as the
/// default scenario when every party is ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyProfile {
	pub party_name: String,
	pub latest_year: Year,
	pub mla_strength: u32,
	pub alliance_mla_strength: u32,
	pub current_past_rs_wins: u32,
	pub current_candidate_type: CandidateType,
	pub appearances: u32,
	pub total_rs_wins: u32,
	/// `total_rs_wins / appearances * 100`.
	pub win_rate: f64,
	/// Win rate with older elections decayed, rounded to one decimal.
	pub recent_win_rate: f64,
	pub has_majority: bool,
	/// Current seats as a fraction of the assembly, rounded to four decimals.
	pub mla_share: f64,
	pub alliance_share: f64,
	/// Newest first.
	pub history: Vec<HistoryEntry>,
}

/// A scenario to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
	pub party_name: String,
	pub mla_strength: f64,
	pub alliance_mla_strength: f64,
	pub past_rs_wins: f64,
	pub candidate_type: CandidateType,
	pub year: Year,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
	pub party_name: String,
	/// Percentage in `[0, 100]`, two decimals.
	pub win_probability: f64,
	pub prediction: bool,
}

/// One row of a [`Ranking`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedParty {
	#[serde(flatten)]
	pub result: PredictionResult,
	pub mla_strength: u32,
	pub alliance_mla_strength: u32,
	pub has_majority: bool,
}

/// Every known party scored for the same year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
	pub year: Year,
	pub predictions: Vec<RankedParty>,
	pub winner: RankedParty,
	pub runner_up: Option<RankedParty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
	pub total_records: usize,
	/// In order of first appearance in the dataset.
	pub unique_parties: Vec<String>,
	pub years: Vec<Year>,
	pub party_wins: BTreeMap<String, u32>,
}
