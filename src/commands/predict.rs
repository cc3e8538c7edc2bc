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

//! Predict command implementation

use crate::{
	commands::types::PredictConfig, engine::Engine, error::Error, prelude::LOG_TARGET,
	types::PredictionResult,
};
use std::sync::Arc;

pub async fn predict_cmd(engine: Arc<Engine>, config: PredictConfig) -> Result<(), Error> {
	let request = config.to_request(engine.prediction_year());
	log::debug!(target: LOG_TARGET, "scoring {request:?}");

	let result = engine.predict(&request)?;

	if config.json {
		println!("{}", serde_json::to_string_pretty(&result)?);
	} else {
		println!("{}", describe(&result, request.year));
	}

	Ok(())
}

fn describe(result: &PredictionResult, year: i32) -> String {
	format!(
		"{}: {:.2}% chance of winning in {} ({})",
		result.party_name,
		result.win_probability,
		year,
		if result.prediction { "predicted win" } else { "predicted loss" }
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn describes_outcome() {
		let result =
			PredictionResult { party_name: "NCP".into(), win_probability: 12.5, prediction: false };
		assert_eq!(describe(&result, 2027), "NCP: 12.50% chance of winning in 2027 (predicted loss)");
	}
}
