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

//! Weighted, L2-regularised logistic regression.
//!
//! Features are z-score standardised with statistics of the training rows, then the weighted mean
//! log loss is minimised with plain batch gradient descent. The procedure has no randomness:
//! the same rows, weights and parameters always produce the same coefficients.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainParams {
	pub iterations: usize,
	pub learning_rate: f64,
	pub l2: f64,
}

impl Default for TrainParams {
	fn default() -> Self {
		Self { iterations: 2000, learning_rate: 0.5, l2: 0.01 }
	}
}

/// Column means and standard deviations of the training matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
	mean: Vec<f64>,
	scale: Vec<f64>,
}

impl Standardizer {
	pub fn fit(rows: &[&[f64]]) -> Self {
		let dim = rows.first().map_or(0, |r| r.len());
		let n = rows.len().max(1) as f64;

		let mut mean = vec![0.0; dim];
		for row in rows {
			for (m, x) in mean.iter_mut().zip(row.iter()) {
				*m += x / n;
			}
		}

		let mut scale = vec![0.0; dim];
		for row in rows {
			for ((s, x), m) in scale.iter_mut().zip(row.iter()).zip(mean.iter()) {
				*s += (x - m).powi(2) / n;
			}
		}
		// Constant columns are centred but not scaled.
		for s in scale.iter_mut() {
			*s = if *s > f64::EPSILON { s.sqrt() } else { 1.0 };
		}

		Self { mean, scale }
	}

	pub fn transform(&self, row: &[f64]) -> Vec<f64> {
		row.iter()
			.zip(self.mean.iter().zip(self.scale.iter()))
			.map(|(x, (m, s))| (x - m) / s)
			.collect()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
	standardizer: Standardizer,
	/// In standardised feature space.
	coefficients: Vec<f64>,
	intercept: f64,
}

impl LogisticRegression {
	pub fn fit(
		rows: &[&[f64]],
		labels: &[bool],
		weights: &[f64],
		params: &TrainParams,
	) -> Result<Self, Error> {
		if rows.is_empty() {
			return Err(Error::Training("no training rows".into()));
		}
		if rows.len() != labels.len() || rows.len() != weights.len() {
			return Err(Error::Training(format!(
				"{} rows, {} labels and {} weights",
				rows.len(),
				labels.len(),
				weights.len()
			)));
		}
		let dim = rows[0].len();
		if rows.iter().any(|r| r.len() != dim) {
			return Err(Error::Training("feature rows differ in length".into()));
		}
		if !(labels.iter().any(|l| *l) && labels.iter().any(|l| !*l)) {
			return Err(Error::Training(
				"the winner column needs at least 2 distinct classes".into(),
			));
		}
		let weight_sum: f64 = weights.iter().sum();
		if !(weight_sum.is_finite() && weight_sum > 0.0) || weights.iter().any(|w| *w < 0.0) {
			return Err(Error::Training("sample weights must be non-negative and not all zero".into()));
		}

		let standardizer = Standardizer::fit(rows);
		let xs: Vec<Vec<f64>> = rows.iter().map(|r| standardizer.transform(r)).collect();

		let mut coefficients = vec![0.0; dim];
		let mut intercept = 0.0;
		let mut grad = vec![0.0; dim];

		for _ in 0..params.iterations {
			grad.iter_mut().for_each(|g| *g = 0.0);
			let mut grad_intercept = 0.0;

			for ((x, label), w) in xs.iter().zip(labels).zip(weights) {
				let p = sigmoid(intercept + dot(&coefficients, x));
				let err = w * (p - if *label { 1.0 } else { 0.0 });
				for (g, xi) in grad.iter_mut().zip(x) {
					*g += err * xi;
				}
				grad_intercept += err;
			}

			for (c, g) in coefficients.iter_mut().zip(&grad) {
				*c -= params.learning_rate * (g / weight_sum + params.l2 * *c);
			}
			intercept -= params.learning_rate * grad_intercept / weight_sum;
		}

		Ok(Self { standardizer, coefficients, intercept })
	}

	/// Probability of the positive class.
	pub fn predict_proba(&self, row: &[f64]) -> f64 {
		let x = self.standardizer.transform(row);
		sigmoid(self.intercept + dot(&self.coefficients, &x))
	}

	pub fn coefficients(&self) -> &[f64] {
		&self.coefficients
	}

	pub fn intercept(&self) -> f64 {
		self.intercept
	}
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
	if z >= 0.0 {
		1.0 / (1.0 + (-z).exp())
	} else {
		let e = z.exp();
		e / (1.0 + e)
	}
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}
