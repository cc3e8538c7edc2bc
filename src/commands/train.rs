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

use crate::{commands::types::TrainConfig, engine::Engine, error::Error};
use std::sync::Arc;

pub async fn train_cmd(engine: Arc<Engine>, config: TrainConfig) -> Result<(), Error> {
	let d = engine.diagnostics();

	if config.json {
		println!("{}", serde_json::to_string_pretty(d)?);
		return Ok(());
	}

	println!("Records: {} (train {}, test {})", d.records, d.train_size, d.test_size);
	match d.decay {
		Some(decay) => println!("Weighting: {} (decay {decay})", d.weighting),
		None => println!("Weighting: {}", d.weighting),
	}
	println!(
		"Majority: {} of {} seats",
		d.majority.threshold, d.majority.legislature_size
	);

	match &d.evaluation {
		Some(e) => {
			println!("Accuracy: {:.4}", e.accuracy);
			println!("Log loss: {:.4}  Brier: {:.4}", e.log_loss, e.brier);
			println!("Confusion matrix: {:?}", e.confusion_matrix);
			println!("{:>6}  {:>9}  {:>6}  {:>6}  {:>7}", "class", "precision", "recall", "f1", "support");
			for c in &e.report {
				println!(
					"{:>6}  {:>9.2}  {:>6.2}  {:>6.2}  {:>7}",
					c.label, c.precision, c.recall, c.f1, c.support
				);
			}
		},
		None => println!("No held-out records, evaluation skipped"),
	}

	println!("Coefficients (standardised):");
	for f in &d.features {
		println!("  {:<22} {:>8.4}", f.feature, f.coefficient);
	}
	println!("  {:<22} {:>8.4}", "intercept", d.intercept);

	println!("Party encoding:");
	for p in &d.party_encoding {
		println!("  {:>2}  {}", p.code, p.party);
	}

	Ok(())
}
