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

//! Loading and validating the historical election records.

use crate::{
	error::Error,
	prelude::{LOG_TARGET, Year},
	types::{CandidateType, DatasetStats, ElectionRecord},
};
use std::{
	collections::{BTreeMap, BTreeSet, HashSet},
	io,
	path::Path,
};

const COLUMNS: [&str; 7] = [
	"year",
	"party",
	"mla_strength",
	"alliance_mla_strength",
	"past_rs_wins",
	"candidate_type",
	"winner",
];

/// A validated, read-only set of [`ElectionRecord`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
	records: Vec<ElectionRecord>,
}

impl Dataset {
	/// Validate `records` and wrap them.
	///
	/// Fails with [`Error::Data`] on an empty input, an empty party name, an alliance smaller
	/// than the party itself or a repeated `(year, party)` pair.
	pub fn load(records: Vec<ElectionRecord>) -> Result<Self, Error> {
		if records.is_empty() {
			return Err(Error::Data("the dataset has no records".into()));
		}

		let mut seen = HashSet::new();
		for (i, record) in records.iter().enumerate() {
			check_record(record).map_err(|e| Error::Data(format!("record {}: {e}", i + 1)))?;
			if !seen.insert((record.year, record.party.as_str())) {
				return Err(Error::Data(format!(
					"record {}: duplicate entry for `{}` in {}",
					i + 1,
					record.party,
					record.year
				)));
			}
		}

		Ok(Self { records })
	}

	pub fn from_csv_path(path: &Path) -> Result<Self, Error> {
		let file = std::fs::File::open(path).map_err(|e| {
			Error::Data(format!("failed to open dataset `{}`: {e}", path.display()))
		})?;
		let dataset = Self::from_csv_reader(file)?;
		log::debug!(target: LOG_TARGET, "loaded {} records from {}", dataset.len(), path.display());
		Ok(dataset)
	}

	/// Read CSV with a header row. Columns may appear in any order and extra columns are ignored.
	pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, Error> {
		let mut rdr =
			csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

		let headers = rdr.headers().map_err(malformed)?.clone();
		let mut index = [0usize; COLUMNS.len()];
		for (slot, column) in index.iter_mut().zip(COLUMNS) {
			*slot = headers
				.iter()
				.position(|h| h.eq_ignore_ascii_case(column))
				.ok_or_else(|| Error::Data(format!("missing column `{column}`")))?;
		}

		let mut records = Vec::new();
		for row in rdr.records() {
			let row = row.map_err(malformed)?;
			let line = row.position().map_or(0, |p| p.line());
			let field = |i: usize| row.get(index[i]).unwrap_or("");

			let record = parse_row(field).map_err(|e| Error::Data(format!("line {line}: {e}")))?;
			records.push(record);
		}

		Self::load(records)
	}

	pub fn records(&self) -> &[ElectionRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn latest_year(&self) -> Option<Year> {
		self.records.iter().map(|r| r.year).max()
	}

	/// Distinct parties in order of first appearance.
	pub fn parties(&self) -> Vec<&str> {
		let mut seen = HashSet::new();
		self.records
			.iter()
			.map(|r| r.party.as_str())
			.filter(|p| seen.insert(*p))
			.collect()
	}

	pub fn stats(&self) -> DatasetStats {
		let years: BTreeSet<Year> = self.records.iter().map(|r| r.year).collect();
		let mut party_wins = BTreeMap::new();
		for r in &self.records {
			*party_wins.entry(r.party.clone()).or_insert(0) += u32::from(r.winner);
		}

		DatasetStats {
			total_records: self.records.len(),
			unique_parties: self.parties().into_iter().map(str::to_string).collect(),
			years: years.into_iter().collect(),
			party_wins,
		}
	}
}

/// A row the CSV reader could not split into fields. Read failures stay I/O errors.
fn malformed(e: csv::Error) -> Error {
	if let csv::ErrorKind::Io(_) = e.kind() {
		return Error::Csv(e);
	}
	match e.position() {
		Some(pos) => Error::Data(format!("line {}: {e}", pos.line())),
		None => Error::Data(e.to_string()),
	}
}

fn check_record(record: &ElectionRecord) -> Result<(), String> {
	if record.party.trim().is_empty() {
		return Err("party is empty".into());
	}
	if record.party.trim() != record.party {
		return Err(format!("party `{}` has surrounding whitespace", record.party));
	}
	if record.alliance_mla_strength < record.mla_strength {
		return Err(format!(
			"alliance_mla_strength {} is smaller than mla_strength {}",
			record.alliance_mla_strength, record.mla_strength
		));
	}
	Ok(())
}

fn parse_row<'a>(field: impl Fn(usize) -> &'a str) -> Result<ElectionRecord, String> {
	let required = |i: usize| {
		let value = field(i);
		if value.is_empty() { Err(format!("`{}` is missing", COLUMNS[i])) } else { Ok(value) }
	};

	let year = required(0)?
		.parse::<Year>()
		.map_err(|_| format!("`year` is not a whole number: {}", field(0)))?;
	let party = required(1)?.to_string();
	let mla_strength = parse_count(COLUMNS[2], required(2)?)?;
	let alliance_mla_strength = parse_count(COLUMNS[3], required(3)?)?;
	let past_rs_wins = parse_count(COLUMNS[4], required(4)?)?;
	let candidate_type = required(5)?.parse::<CandidateType>()?;
	let winner = match required(6)?.to_ascii_lowercase().as_str() {
		"1" | "true" => true,
		"0" | "false" => false,
		other => return Err(format!("`winner` must be 0 or 1, got {other}")),
	};

	Ok(ElectionRecord {
		year,
		party,
		mla_strength,
		alliance_mla_strength,
		past_rs_wins,
		candidate_type,
		winner,
	})
}

fn parse_count(column: &str, value: &str) -> Result<u32, String> {
	let n = value
		.parse::<i64>()
		.or_else(|_| match value.parse::<f64>() {
			Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
			_ => Err(()),
		})
		.map_err(|_| format!("`{column}` is not a whole number: {value}"))?;
	if n < 0 {
		return Err(format!("`{column}` must not be negative, got {n}"));
	}
	u32::try_from(n).map_err(|_| format!("`{column}` is too large: {n}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	const CSV: &str = "\
year,party,mla_strength,alliance_mla_strength,past_rs_wins,candidate_type,winner
2019,BJP,105,161,2,2,1
2019,NCP,54,98,1,1,0
2024,BJP,132,230,3,incumbent,1
";

	#[test]
	fn reads_csv_with_codes_and_names() {
		let dataset = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
		assert_eq!(dataset.len(), 3);
		assert!(!dataset.is_empty());
		assert_eq!(dataset.records()[0].candidate_type, CandidateType::Incumbent);
		assert_eq!(dataset.records()[1].candidate_type, CandidateType::Mixed);
		assert_eq!(dataset.latest_year(), Some(2024));
		assert_eq!(dataset.parties(), vec!["BJP", "NCP"]);
	}

	#[test]
	fn columns_can_be_reordered() {
		let csv = "party,winner,year,candidate_type,past_rs_wins,alliance_mla_strength,mla_strength,notes\n\
			INC,0,2014,new,0,83,42,split\n";
		let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
		let r = &dataset.records()[0];
		assert_eq!((r.party.as_str(), r.year, r.mla_strength, r.alliance_mla_strength), ("INC", 2014, 42, 83));
	}

	#[test]
	fn negative_count_names_the_line() {
		let csv = format!("{CSV}2024,NCP,-3,98,1,1,0\n");
		let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err().to_string();
		assert!(err.contains("line 5"), "{err}");
		assert!(err.contains("mla_strength"), "{err}");
	}

	#[test]
	fn short_row_is_a_data_error() {
		let csv = format!("{CSV}2024,NCP,41\n");
		match Dataset::from_csv_reader(csv.as_bytes()) {
			Err(Error::Data(msg)) => assert!(msg.starts_with("line 5:"), "{msg}"),
			other => panic!("expected a data error, got {other:?}"),
		}

		let long = "year,party,mla_strength,alliance_mla_strength,past_rs_wins,candidate_type,winner\n\
			2024,BJP,132,230,3,2,1,extra\n";
		assert!(matches!(Dataset::from_csv_reader(long.as_bytes()), Err(Error::Data(_))));
	}

	#[test]
	fn missing_value_is_rejected() {
		let csv = format!("{CSV}2024,NCP,41,,1,1,0\n");
		let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err().to_string();
		assert!(err.contains("`alliance_mla_strength` is missing"), "{err}");
	}

	#[test]
	fn missing_column_is_rejected() {
		let csv = "year,party,mla_strength\n2024,BJP,132\n";
		assert!(matches!(
			Dataset::from_csv_reader(csv.as_bytes()),
			Err(Error::Data(e)) if e.contains("alliance_mla_strength")
		));
	}

	#[test]
	fn duplicates_and_small_alliances_are_rejected() {
		let dup = format!("{CSV}2024,BJP,100,200,1,1,0\n");
		assert!(Dataset::from_csv_reader(dup.as_bytes()).unwrap_err().to_string().contains("duplicate"));

		let small = format!("{CSV}2024,SS,60,40,1,1,0\n");
		assert!(
			Dataset::from_csv_reader(small.as_bytes())
				.unwrap_err()
				.to_string()
				.contains("smaller than mla_strength")
		);
	}

	#[test]
	fn empty_dataset_is_rejected() {
		let header = CSV.lines().next().unwrap();
		assert!(matches!(Dataset::from_csv_reader(header.as_bytes()), Err(Error::Data(_))));
		assert!(matches!(Dataset::load(vec![]), Err(Error::Data(_))));
	}

	#[test]
	fn stats_count_wins_per_party() {
		let stats = Dataset::from_csv_reader(CSV.as_bytes()).unwrap().stats();
		assert_eq!(stats.total_records, 3);
		assert_eq!(stats.years, vec![2019, 2024]);
		assert_eq!(stats.party_wins["BJP"], 2);
		assert_eq!(stats.party_wins["NCP"], 0);
	}
}
