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

use crate::validation::FieldError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Failed to parse log directive: `{0}´")]
	LogParse(#[from] tracing_subscriber::filter::ParseError),
	#[error("I/O error: `{0}`")]
	Io(#[from] std::io::Error),
	#[error("CSV error: `{0}`")]
	Csv(#[from] csv::Error),
	#[error("Invalid JSON: `{0}`")]
	Json(#[from] serde_json::Error),
	#[error("Invalid configuration: {0}")]
	Config(String),
	#[error("Invalid dataset: {0}")]
	Data(String),
	#[error("Training failed: {0}")]
	Training(String),
	#[error("{}", join_field_errors(.0))]
	Validation(Vec<FieldError>),
	#[error("Party \"{0}\" not found")]
	UnknownParty(String),
	#[error("No parties available to rank")]
	InsufficientData,
	#[error("{0}")]
	JoinError(#[from] tokio::task::JoinError),
	#[error("Other error: `{0}`")]
	Other(String),
}

impl Error {
	/// Shorthand for a validation error on a single field.
	pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
		Error::Validation(vec![FieldError::new(field, message)])
	}
}

fn join_field_errors(errors: &[FieldError]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
