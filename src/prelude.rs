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

//! Types and constants that are shared by the engine, the server and the command line.
//!
//! The seat numbers describe the Maharashtra Legislative Assembly; they are only defaults and
//! can be overridden through [`crate::opt::EngineConfig`].

pub use crate::error::Error;

/// Election year.
pub type Year = i32;

/// Default location of the historical dataset.
pub const DEFAULT_DATASET: &str = "data/clean_election.csv";
/// Default port of the REST API.
pub const DEFAULT_PORT: u16 = 5000;
/// Default port to start the prometheus server on.
pub const DEFAULT_PROMETHEUS_PORT: u16 = 9999;
/// The logging target.
pub const LOG_TARGET: &str = "rajya-sabha-predictor";

/// Seats in the legislative assembly.
pub const DEFAULT_LEGISLATURE_SIZE: u32 = 288;
/// Seats an alliance needs for a majority in the assembly.
pub const DEFAULT_MAJORITY_THRESHOLD: u32 = 145;
/// The year that is scored when a request does not name one.
pub const DEFAULT_PREDICTION_YEAR: Year = 2027;
/// Per-year decay of the recency weighting.
pub const DEFAULT_RECENCY_DECAY: f64 = 0.85;
/// Win probability (in percent) at or above which a party is predicted to win.
pub const WIN_THRESHOLD_PCT: f64 = 50.0;
