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

//! Held-out evaluation of a fitted model. The numbers are reported, never used to decide whether
//! a model is served.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::Serialize;

/// Row indices of a train/test split, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
	pub train: Vec<usize>,
	pub test: Vec<usize>,
}

/// Split rows so that both sets keep the class balance of `labels`.
///
/// Each class is shuffled with a seeded RNG and `round(n * test_fraction)` of its rows go to the
/// test set. At least one row of every class always stays in training.
pub fn stratified_split(labels: &[bool], test_fraction: f64, seed: u64) -> Split {
	let mut rng = StdRng::seed_from_u64(seed);
	let mut train = Vec::with_capacity(labels.len());
	let mut test = Vec::new();

	for class in [false, true] {
		let mut idx: Vec<usize> =
			labels.iter().enumerate().filter(|(_, l)| **l == class).map(|(i, _)| i).collect();
		idx.shuffle(&mut rng);

		let n_test =
			((idx.len() as f64 * test_fraction).round() as usize).min(idx.len().saturating_sub(1));
		test.extend_from_slice(&idx[..n_test]);
		train.extend_from_slice(&idx[n_test..]);
	}

	train.sort_unstable();
	test.sort_unstable();
	Split { train, test }
}

/// Binary confusion matrix with "win" as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
	pub true_negative: usize,
	pub false_positive: usize,
	pub false_negative: usize,
	pub true_positive: usize,
}

impl ConfusionMatrix {
	pub fn from_predictions(predicted: &[bool], actual: &[bool]) -> Self {
		let mut m = Self::default();
		for (p, a) in predicted.iter().zip(actual) {
			match (p, a) {
				(false, false) => m.true_negative += 1,
				(true, false) => m.false_positive += 1,
				(false, true) => m.false_negative += 1,
				(true, true) => m.true_positive += 1,
			}
		}
		m
	}

	pub fn total(&self) -> usize {
		self.true_negative + self.false_positive + self.false_negative + self.true_positive
	}

	pub fn accuracy(&self) -> f64 {
		ratio(self.true_negative + self.true_positive, self.total())
	}

	/// `[[tn, fp], [fn, tp]]`, rows are the actual class.
	pub fn as_rows(&self) -> [[usize; 2]; 2] {
		[
			[self.true_negative, self.false_positive],
			[self.false_negative, self.true_positive],
		]
	}
}

/// One line of a classification report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
	pub label: &'static str,
	pub precision: f64,
	pub recall: f64,
	pub f1: f64,
	pub support: usize,
}

impl ClassMetrics {
	fn new(label: &'static str, tp: usize, fp: usize, fn_: usize) -> Self {
		let precision = ratio(tp, tp + fp);
		let recall = ratio(tp, tp + fn_);
		let f1 = if precision + recall > 0.0 {
			2.0 * precision * recall / (precision + recall)
		} else {
			0.0
		};
		Self { label, precision, recall, f1, support: tp + fn_ }
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
	pub samples: usize,
	pub accuracy: f64,
	pub confusion_matrix: [[usize; 2]; 2],
	pub report: Vec<ClassMetrics>,
	pub log_loss: f64,
	pub brier: f64,
}

/// Score predicted win probabilities (`0..=1`) against the actual outcomes.
///
/// `None` when there is nothing to evaluate.
pub fn evaluate(probabilities: &[f64], actual: &[bool]) -> Option<Evaluation> {
	if probabilities.is_empty() || probabilities.len() != actual.len() {
		return None;
	}

	let predicted: Vec<bool> = probabilities.iter().map(|p| *p >= 0.5).collect();
	let confusion = ConfusionMatrix::from_predictions(&predicted, actual);

	let n = probabilities.len() as f64;
	let mut log_loss = 0.0;
	let mut brier = 0.0;
	for (p, a) in probabilities.iter().zip(actual) {
		let y = if *a { 1.0 } else { 0.0 };
		let p_actual = if *a { *p } else { 1.0 - *p };
		log_loss -= p_actual.clamp(1e-15, 1.0).ln();
		brier += (p - y).powi(2);
	}

	let report = vec![
		ClassMetrics::new(
			"lose",
			confusion.true_negative,
			confusion.false_negative,
			confusion.false_positive,
		),
		ClassMetrics::new(
			"win",
			confusion.true_positive,
			confusion.false_positive,
			confusion.false_negative,
		),
	];

	Some(Evaluation {
		samples: probabilities.len(),
		accuracy: confusion.accuracy(),
		confusion_matrix: confusion.as_rows(),
		report,
		log_loss: log_loss / n,
		brier: brier / n,
	})
}

fn ratio(num: usize, den: usize) -> f64 {
	if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
