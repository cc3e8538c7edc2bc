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
	opt::{MajorityRule, recency_weight},
	types::{ElectionRecord, HistoryEntry, PartyProfile},
	utils::round_to,
};
use std::collections::BTreeMap;

/// Build one [`PartyProfile`] per distinct party, keyed by party name.
///
/// `decay` drives `recent_win_rate`, relative to each party's own latest year.
pub fn build_profiles(
	records: &[ElectionRecord],
	majority: &MajorityRule,
	decay: f64,
) -> BTreeMap<String, PartyProfile> {
	let mut by_party: BTreeMap<&str, Vec<&ElectionRecord>> = BTreeMap::new();
	for record in records {
		by_party.entry(record.party.as_str()).or_default().push(record);
	}

	by_party
		.into_iter()
		.filter_map(|(party, mut history)| {
			history.sort_by(|a, b| b.year.cmp(&a.year));
			let latest = *history.first()?;

			let appearances = history.len() as u32;
			let total_rs_wins = history.iter().filter(|r| r.winner).count() as u32;

			let (weighted_wins, weight_sum) =
				history.iter().fold((0.0, 0.0), |(wins, sum), r| {
					let w = recency_weight(decay, latest.year, r.year);
					(wins + if r.winner { w } else { 0.0 }, sum + w)
				});

			let profile = PartyProfile {
				party_name: party.to_string(),
				latest_year: latest.year,
				mla_strength: latest.mla_strength,
				alliance_mla_strength: latest.alliance_mla_strength,
				current_past_rs_wins: latest.past_rs_wins,
				current_candidate_type: latest.candidate_type,
				appearances,
				total_rs_wins,
				win_rate: f64::from(total_rs_wins) / f64::from(appearances) * 100.0,
				recent_win_rate: round_to(weighted_wins / weight_sum * 100.0, 1),
				has_majority: majority.has_majority(f64::from(latest.alliance_mla_strength)),
				mla_share: round_to(majority.share(f64::from(latest.mla_strength)), 4),
				alliance_share: round_to(majority.share(f64::from(latest.alliance_mla_strength)), 4),
				history: history.into_iter().map(HistoryEntry::from).collect(),
			};
			Some((party.to_string(), profile))
		})
		.collect()
}
