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

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classifier;
pub mod commands;
pub mod dataset;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod opt;
pub mod prelude;
pub mod profile;
pub mod prometheus;
pub mod types;
pub mod utils;
pub mod validation;
