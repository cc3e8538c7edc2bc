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

use serde::Serialize;

/// Maps party labels to the index the model was trained with.
///
/// Labels are sorted, so the same set of parties always produces the same codes regardless of
/// the order they were read in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartyEncoder {
	labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyCode {
	pub party: String,
	pub code: usize,
}

impl PartyEncoder {
	pub fn fit<'a>(parties: impl IntoIterator<Item = &'a str>) -> Self {
		let mut labels: Vec<String> = parties.into_iter().map(str::to_string).collect();
		labels.sort();
		labels.dedup();
		Self { labels }
	}

	/// `None` for a party the encoder was not fitted with.
	pub fn encode(&self, party: &str) -> Option<usize> {
		self.labels.binary_search_by(|l| l.as_str().cmp(party)).ok()
	}

	pub fn decode(&self, code: usize) -> Option<&str> {
		self.labels.get(code).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn table(&self) -> Vec<PartyCode> {
		self.labels
			.iter()
			.enumerate()
			.map(|(code, party)| PartyCode { party: party.clone(), code })
			.collect()
	}
}
