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
	commands::types::RankConfig, engine::Engine, error::Error, prelude::LOG_TARGET,
	types::Ranking,
};
use std::{fmt::Write, sync::Arc};

pub async fn rank_cmd(engine: Arc<Engine>, config: RankConfig) -> Result<(), Error> {
	let year = config.year.unwrap_or(engine.prediction_year());
	let ranking = engine.rank_all(year)?;

	log::info!(
		target: LOG_TARGET,
		"ranked {} parties for {year}, winner {}",
		ranking.predictions.len(),
		ranking.winner.result.party_name
	);

	if config.json {
		println!("{}", serde_json::to_string_pretty(&ranking)?);
	} else {
		print!("{}", render_table(&ranking));
	}

	Ok(())
}

fn render_table(ranking: &Ranking) -> String {
	let width = ranking
		.predictions
		.iter()
		.map(|p| p.result.party_name.len())
		.max()
		.unwrap_or(0)
		.max("Party".len());

	let mut out = String::new();
	let _ = writeln!(out, "Rajya Sabha prediction for {}", ranking.year);
	let _ = writeln!(out, "{:>3}  {:<width$}  {:>8}  {:>5}  {:>8}  Majority", "#", "Party", "Win %", "MLAs", "Alliance");
	for (i, p) in ranking.predictions.iter().enumerate() {
		let _ = writeln!(
			out,
			"{:>3}  {:<width$}  {:>8.2}  {:>5}  {:>8}  {}",
			i + 1,
			p.result.party_name,
			p.result.win_probability,
			p.mla_strength,
			p.alliance_mla_strength,
			if p.has_majority { "yes" } else { "no" },
		);
	}
	let _ = writeln!(out, "Winner: {}", ranking.winner.result.party_name);
	if let Some(runner_up) = &ranking.runner_up {
		let _ = writeln!(out, "Runner-up: {}", runner_up.result.party_name);
	}
	out
}
