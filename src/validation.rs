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

//! The request contract for scoring a scenario.
//!
//! [`SCORING_FIELDS`] is the single description of what a scoring request must contain. The
//! JSON parser and the engine's typed check both walk it and dispatch on each rule's kind, `min`
//! and `required`, and `/api/schema` serves it, so a form renderer validates input with exactly
//! the rules the server applies.

use crate::{
	error::Error,
	prelude::Year,
	types::{CandidateType, ScoringRequest},
};
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// The kind of value a request field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	/// Non-empty free text.
	Text,
	/// Finite, non-negative number.
	Count,
	/// A [`CandidateType`] name, alias or code.
	CandidateType,
	/// Whole election year.
	Year,
}

/// Constraint on a single request field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRule {
	pub name: &'static str,
	pub kind: FieldKind,
	pub required: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<f64>,
	pub description: &'static str,
}

pub const PARTY_NAME: &str = "party_name";
pub const MLA_STRENGTH: &str = "mla_strength";
pub const ALLIANCE_MLA_STRENGTH: &str = "alliance_mla_strength";
pub const PAST_RS_WINS: &str = "past_rs_wins";
pub const CANDIDATE_TYPE: &str = "candidate_type";
pub const YEAR: &str = "year";

pub const SCORING_FIELDS: &[FieldRule] = &[
	FieldRule {
		name: PARTY_NAME,
		kind: FieldKind::Text,
		required: true,
		min: None,
		description: "Party label as it appears in the historical dataset",
	},
	FieldRule {
		name: MLA_STRENGTH,
		kind: FieldKind::Count,
		required: true,
		min: Some(0.0),
		description: "Seats the party holds in the legislative assembly",
	},
	FieldRule {
		name: ALLIANCE_MLA_STRENGTH,
		kind: FieldKind::Count,
		required: true,
		min: Some(0.0),
		description: "Combined seats of the party and its coalition partners",
	},
	FieldRule {
		name: PAST_RS_WINS,
		kind: FieldKind::Count,
		required: true,
		min: Some(0.0),
		description: "Rajya Sabha seats won by the party in earlier cycles",
	},
	FieldRule {
		name: CANDIDATE_TYPE,
		kind: FieldKind::CandidateType,
		required: true,
		min: None,
		description: "One of new, mixed or incumbent (or the codes 0, 1, 2)",
	},
	FieldRule {
		name: YEAR,
		kind: FieldKind::Year,
		required: false,
		min: None,
		description: "Election year to score, defaults to the configured prediction year",
	},
];

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
	pub field: String,
	pub message: String,
}

impl FieldError {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self { field: field.into(), message: message.into() }
	}
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

/// A request field once it has been read as its rule's [`FieldKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	Text(String),
	Count(f64),
	CandidateType(CandidateType),
	Year(Year),
}

impl FieldRule {
	/// Check a typed value against this rule. Values below `min` are rejected, never clamped.
	pub fn check(&self, value: &FieldValue) -> Result<(), FieldError> {
		let number = match value {
			FieldValue::Text(s) if s.trim().is_empty() =>
				return Err(FieldError::new(self.name, "is required")),
			FieldValue::Text(_) | FieldValue::CandidateType(_) => return Ok(()),
			FieldValue::Count(n) => *n,
			FieldValue::Year(y) => f64::from(*y),
		};

		if !number.is_finite() {
			return Err(FieldError::new(self.name, "must be a finite number"));
		}
		match self.min {
			Some(min) if number < min => {
				let message = if min == 0.0 {
					"must not be negative".to_string()
				} else {
					format!("must be at least {min}")
				};
				Err(FieldError::new(self.name, message))
			},
			_ => Ok(()),
		}
	}

	/// Read a raw JSON value as this rule's kind and check it.
	///
	/// `null` and blank strings count as missing. A missing optional field reads as `None`.
	pub fn read(&self, value: Option<&Value>) -> Result<Option<FieldValue>, FieldError> {
		let Some(value) = value.filter(|v| !is_blank(v)) else {
			return if self.required { Err(FieldError::new(self.name, "is required")) } else { Ok(None) };
		};

		let typed = match self.kind {
			FieldKind::Text => value
				.as_str()
				.map(|s| FieldValue::Text(s.trim().to_string()))
				.ok_or_else(|| FieldError::new(self.name, "must be a string"))?,
			FieldKind::Count => number(value)
				.map(FieldValue::Count)
				.ok_or_else(|| FieldError::new(self.name, "must be a number"))?,
			FieldKind::CandidateType => candidate_type(value)
				.map(FieldValue::CandidateType)
				.ok_or_else(|| {
					FieldError::new(self.name, "must be one of new, mixed or incumbent")
				})?,
			FieldKind::Year => number(value)
				.filter(|y| y.fract() == 0.0 && y.abs() < 1e6)
				.map(|y| FieldValue::Year(y as Year))
				.ok_or_else(|| FieldError::new(self.name, "must be a whole number"))?,
		};
		self.check(&typed)?;
		Ok(Some(typed))
	}
}

fn request_value(request: &ScoringRequest, field: &str) -> Option<FieldValue> {
	match field {
		PARTY_NAME => Some(FieldValue::Text(request.party_name.clone())),
		MLA_STRENGTH => Some(FieldValue::Count(request.mla_strength)),
		ALLIANCE_MLA_STRENGTH => Some(FieldValue::Count(request.alliance_mla_strength)),
		PAST_RS_WINS => Some(FieldValue::Count(request.past_rs_wins)),
		CANDIDATE_TYPE => Some(FieldValue::CandidateType(request.candidate_type)),
		YEAR => Some(FieldValue::Year(request.year)),
		_ => None,
	}
}

/// Validate an already typed request against [`SCORING_FIELDS`], collecting every failing field.
pub fn validate_request(request: &ScoringRequest) -> Result<(), Error> {
	let errors: Vec<_> = SCORING_FIELDS
		.iter()
		.filter_map(|rule| match request_value(request, rule.name) {
			Some(value) => rule.check(&value).err(),
			None if rule.required => Some(FieldError::new(rule.name, "is required")),
			None => None,
		})
		.collect();

	if errors.is_empty() { Ok(()) } else { Err(Error::Validation(errors)) }
}

/// Parse a JSON request body into a [`ScoringRequest`], reading each of [`SCORING_FIELDS`].
///
/// Numbers may be sent as JSON numbers or numeric strings. `null` and the empty string count as
/// missing. All field errors are reported together.
pub fn parse_scoring_request(body: &Value, default_year: Year) -> Result<ScoringRequest, Error> {
	let Some(object) = body.as_object() else {
		return Err(Error::invalid_field("body", "must be a JSON object"));
	};

	let mut values = BTreeMap::new();
	let mut errors = Vec::new();
	for rule in SCORING_FIELDS {
		match rule.read(object.get(rule.name)) {
			Ok(Some(value)) => {
				values.insert(rule.name, value);
			},
			Ok(None) => {},
			Err(e) => errors.push(e),
		}
	}
	if !errors.is_empty() {
		return Err(Error::Validation(errors));
	}

	let count = |name: &str| match values.get(name) {
		Some(FieldValue::Count(n)) => Some(*n),
		_ => None,
	};
	let party_name = match values.get(PARTY_NAME) {
		Some(FieldValue::Text(s)) => Some(s.clone()),
		_ => None,
	};
	let candidate_type = match values.get(CANDIDATE_TYPE) {
		Some(FieldValue::CandidateType(c)) => Some(*c),
		_ => None,
	};
	let year = match values.get(YEAR) {
		Some(FieldValue::Year(y)) => *y,
		_ => default_year,
	};

	match (
		party_name,
		count(MLA_STRENGTH),
		count(ALLIANCE_MLA_STRENGTH),
		count(PAST_RS_WINS),
		candidate_type,
	) {
		(
			Some(party_name),
			Some(mla_strength),
			Some(alliance_mla_strength),
			Some(past_rs_wins),
			Some(candidate_type),
		) => Ok(ScoringRequest {
			party_name,
			mla_strength,
			alliance_mla_strength,
			past_rs_wins,
			candidate_type,
			year,
		}),
		_ => Err(Error::Validation(
			[PARTY_NAME, MLA_STRENGTH, ALLIANCE_MLA_STRENGTH, PAST_RS_WINS, CANDIDATE_TYPE]
				.into_iter()
				.filter(|name| !values.contains_key(*name))
				.map(|name| FieldError::new(name, "is required"))
				.collect(),
		)),
	}
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		_ => false,
	}
}

fn number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	}
}

fn candidate_type(value: &Value) -> Option<CandidateType> {
	match value {
		Value::String(s) => CandidateType::from_str(s).ok(),
		Value::Number(n) => n.as_u64().and_then(|c| u8::try_from(c).ok()).and_then(CandidateType::from_code),
		_ => None,
	}
}
