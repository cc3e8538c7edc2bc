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

//! The prediction engine.
//!
//! An [`Engine`] is built once from a [`Dataset`] and never changes afterwards: it owns the
//! party profiles, the party encoding and the fitted classifier. Scoring only needs `&Engine`,
//! so any number of callers may score concurrently. Retraining produces a new `Engine` which is
//! published through [`SharedEngine`].

use crate::{
	classifier::LogisticRegression,
	dataset::Dataset,
	encoding::{PartyCode, PartyEncoder},
	error::Error,
	evaluation::{Evaluation, evaluate, stratified_split},
	opt::{EngineConfig, MajorityRule, Weighting},
	prelude::{LOG_TARGET, WIN_THRESHOLD_PCT, Year},
	profile::build_profiles,
	types::{
		CandidateType, DatasetStats, PartyProfile, PredictionResult, RankedParty, Ranking,
		ScoringRequest,
	},
	utils::round_to,
	validation::validate_request,
};
use serde::Serialize;
use std::{
	collections::BTreeMap,
	sync::{Arc, PoisonError, RwLock},
};

/// Every model input, in row order. Disabled optional inputs are left out of the row.
pub const FEATURE_NAMES: [&str; 9] = [
	"year",
	"party_index",
	"mla_strength",
	"alliance_mla_strength",
	"past_rs_wins",
	"candidate_type",
	"has_majority",
	"mla_share",
	"alliance_share",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
	pub feature: &'static str,
	/// On standardised inputs.
	pub coefficient: f64,
}

/// What training produced, for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDiagnostics {
	pub records: usize,
	pub train_size: usize,
	pub test_size: usize,
	pub weighting: Weighting,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub decay: Option<f64>,
	pub majority: MajorityRule,
	pub features: Vec<FeatureWeight>,
	pub intercept: f64,
	/// `None` when no rows were held out.
	pub evaluation: Option<Evaluation>,
	pub party_encoding: Vec<PartyCode>,
}

#[derive(Debug, Clone)]
pub struct Engine {
	dataset: Dataset,
	profiles: BTreeMap<String, PartyProfile>,
	encoder: PartyEncoder,
	model: LogisticRegression,
	features: FeatureSet,
	prediction_year: Year,
	diagnostics: ModelDiagnostics,
}

struct Inputs {
	year: Year,
	party_index: usize,
	mla_strength: f64,
	alliance_mla_strength: f64,
	past_rs_wins: f64,
	candidate_type: CandidateType,
}

/// The optional inputs the classifier sees, and the rule they are derived with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FeatureSet {
	rule: MajorityRule,
	majority: bool,
	shares: bool,
}

impl FeatureSet {
	fn from_config(config: &EngineConfig) -> Self {
		Self {
			rule: config.majority_rule(),
			majority: !config.no_majority_feature,
			shares: !config.no_share_features,
		}
	}

	fn names(&self) -> Vec<&'static str> {
		FEATURE_NAMES
			.into_iter()
			.filter(|name| match *name {
				"has_majority" => self.majority,
				"mla_share" | "alliance_share" => self.shares,
				_ => true,
			})
			.collect()
	}

	fn row(&self, inputs: Inputs) -> Vec<f64> {
		let mut row = vec![
			f64::from(inputs.year),
			inputs.party_index as f64,
			inputs.mla_strength,
			inputs.alliance_mla_strength,
			inputs.past_rs_wins,
			f64::from(inputs.candidate_type.code()),
		];
		if self.majority {
			row.push(if self.rule.has_majority(inputs.alliance_mla_strength) { 1.0 } else { 0.0 });
		}
		if self.shares {
			row.push(self.rule.share(inputs.mla_strength));
			row.push(self.rule.share(inputs.alliance_mla_strength));
		}
		row
	}
}

impl Engine {
	/// Read the dataset named by `config` and train on it.
	pub fn from_config(config: &EngineConfig) -> Result<Self, Error> {
		let dataset = Dataset::from_csv_path(&config.dataset)?;
		Self::train(dataset, config)
	}

	/// Fit the classifier and build the party profiles.
	///
	/// The model is fitted on the training part of a stratified split; the held-out rows only
	/// feed [`ModelDiagnostics`].
	pub fn train(dataset: Dataset, config: &EngineConfig) -> Result<Self, Error> {
		config.validate()?;

		let records = dataset.records();
		let encoder = PartyEncoder::fit(records.iter().map(|r| r.party.as_str()));
		if encoder.is_empty() {
			return Err(Error::Training("no parties to encode".into()));
		}
		let labels: Vec<bool> = records.iter().map(|r| r.winner).collect();
		if labels.iter().all(|l| *l) || labels.iter().all(|l| !*l) {
			return Err(Error::Training(
				"the winner column needs at least 2 distinct classes".into(),
			));
		}

		let feature_set = FeatureSet::from_config(config);
		let latest_year = dataset.latest_year().unwrap_or(config.prediction_year);

		let mut rows = Vec::with_capacity(records.len());
		let mut weights = Vec::with_capacity(records.len());
		for r in records {
			let party_index = encoder
				.encode(&r.party)
				.ok_or_else(|| Error::Training(format!("party `{}` was not encoded", r.party)))?;
			rows.push(feature_set.row(Inputs {
				year: r.year,
				party_index,
				mla_strength: f64::from(r.mla_strength),
				alliance_mla_strength: f64::from(r.alliance_mla_strength),
				past_rs_wins: f64::from(r.past_rs_wins),
				candidate_type: r.candidate_type,
			}));
			weights.push(config.weighting.sample_weight(config.decay, latest_year, r.year));
		}

		let split = stratified_split(&labels, config.test_fraction, config.seed);
		let pick = |idx: &[usize]| {
			(
				idx.iter().map(|i| rows[*i].as_slice()).collect::<Vec<_>>(),
				idx.iter().map(|i| labels[*i]).collect::<Vec<_>>(),
				idx.iter().map(|i| weights[*i]).collect::<Vec<_>>(),
			)
		};

		let (train_rows, train_labels, train_weights) = pick(&split.train);
		let model = LogisticRegression::fit(
			&train_rows,
			&train_labels,
			&train_weights,
			&config.train_params(),
		)?;

		let (test_rows, test_labels, _) = pick(&split.test);
		let test_probs: Vec<f64> = test_rows.iter().map(|r| model.predict_proba(r)).collect();
		let evaluation = evaluate(&test_probs, &test_labels);

		match &evaluation {
			Some(e) => log::info!(
				target: LOG_TARGET,
				"trained on {} of {} records ({} weighting), held-out accuracy {:.2}, confusion {:?}",
				split.train.len(),
				records.len(),
				config.weighting,
				e.accuracy,
				e.confusion_matrix,
			),
			None => log::info!(
				target: LOG_TARGET,
				"trained on {} records ({} weighting), nothing held out",
				split.train.len(),
				config.weighting,
			),
		}

		let features = feature_set
			.names()
			.into_iter()
			.zip(model.coefficients().iter().copied())
			.map(|(feature, coefficient)| FeatureWeight { feature, coefficient })
			.collect();

		let diagnostics = ModelDiagnostics {
			records: records.len(),
			train_size: split.train.len(),
			test_size: split.test.len(),
			weighting: config.weighting,
			decay: (config.weighting == Weighting::Recency).then_some(config.decay),
			majority: feature_set.rule,
			features,
			intercept: model.intercept(),
			evaluation,
			party_encoding: encoder.table(),
		};

		let profiles = build_profiles(records, &feature_set.rule, config.decay);

		Ok(Self {
			dataset,
			profiles,
			encoder,
			model,
			features: feature_set,
			prediction_year: config.prediction_year,
			diagnostics,
		})
	}

	/// Score one scenario.
	pub fn predict(&self, request: &ScoringRequest) -> Result<PredictionResult, Error> {
		validate_request(request)?;

		let party_name = request.party_name.trim();
		let party_index = self
			.encoder
			.encode(party_name)
			.ok_or_else(|| Error::UnknownParty(party_name.to_string()))?;

		let row = self.features.row(Inputs {
			year: request.year,
			party_index,
			mla_strength: request.mla_strength,
			alliance_mla_strength: request.alliance_mla_strength,
			past_rs_wins: request.past_rs_wins,
			candidate_type: request.candidate_type,
		});

		let win_probability = round_to(self.model.predict_proba(&row) * 100.0, 2);
		Ok(PredictionResult {
			party_name: party_name.to_string(),
			win_probability,
			prediction: win_probability >= WIN_THRESHOLD_PCT,
		})
	}

	/// Score every known party with its current profile in `year`.
	///
	/// Sorted by probability, highest first; equal probabilities are ordered by party name.
	pub fn rank_all(&self, year: Year) -> Result<Ranking, Error> {
		let mut predictions = self
			.profiles
			.values()
			.map(|p| -> Result<RankedParty, Error> {
				let result = self.predict(&Self::scenario(p, year))?;
				Ok(RankedParty {
					result,
					mla_strength: p.mla_strength,
					alliance_mla_strength: p.alliance_mla_strength,
					has_majority: p.has_majority,
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		sort_predictions(&mut predictions);

		let winner = predictions.first().cloned().ok_or(Error::InsufficientData)?;
		let runner_up = predictions.get(1).cloned();

		Ok(Ranking { year, predictions, winner, runner_up })
	}

	/// The scenario `rank_all` scores for a party.
	pub fn scenario(profile: &PartyProfile, year: Year) -> ScoringRequest {
		ScoringRequest {
			party_name: profile.party_name.clone(),
			mla_strength: f64::from(profile.mla_strength),
			alliance_mla_strength: f64::from(profile.alliance_mla_strength),
			past_rs_wins: f64::from(profile.current_past_rs_wins),
			candidate_type: profile.current_candidate_type,
			year,
		}
	}

	pub fn profile(&self, party: &str) -> Result<&PartyProfile, Error> {
		self.profiles.get(party.trim()).ok_or_else(|| Error::UnknownParty(party.trim().to_string()))
	}

	/// Profiles ordered by current MLA strength, strongest first, then by name.
	pub fn profiles_by_strength(&self) -> Vec<&PartyProfile> {
		let mut profiles: Vec<_> = self.profiles.values().collect();
		profiles.sort_by(|a, b| {
			b.mla_strength.cmp(&a.mla_strength).then_with(|| a.party_name.cmp(&b.party_name))
		});
		profiles
	}

	pub fn stats(&self) -> DatasetStats {
		self.dataset.stats()
	}

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn encoder(&self) -> &PartyEncoder {
		&self.encoder
	}

	pub fn diagnostics(&self) -> &ModelDiagnostics {
		&self.diagnostics
	}

	pub fn majority(&self) -> &MajorityRule {
		&self.features.rule
	}

	pub fn prediction_year(&self) -> Year {
		self.prediction_year
	}
}

/// Highest probability first, equal probabilities by party name ascending.
pub fn sort_predictions(predictions: &mut [RankedParty]) {
	predictions.sort_by(|a, b| {
		b.result
			.win_probability
			.total_cmp(&a.result.win_probability)
			.then_with(|| a.result.party_name.cmp(&b.result.party_name))
	});
}

/// The engine currently being served.
///
/// Readers take an `Arc<Engine>` snapshot and drop the lock before scoring, so a swap never
/// waits for in-flight requests and never changes the engine a request already holds.
#[derive(Debug, Clone)]
pub struct SharedEngine(Arc<RwLock<Arc<Engine>>>);

impl SharedEngine {
	pub fn new(engine: Engine) -> Self {
		SharedEngine(Arc::new(RwLock::new(Arc::new(engine))))
	}

	pub fn snapshot(&self) -> Arc<Engine> {
		self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Publish `engine`, returning the snapshot it replaced.
	pub fn replace(&self, engine: Engine) -> Arc<Engine> {
		self.publish(Arc::new(engine))
	}

	/// Retrain from the dataset file and return the snapshot this call published. The current
	/// engine stays in place if this fails.
	pub fn reload(&self, config: &EngineConfig) -> Result<Arc<Engine>, Error> {
		let engine = Arc::new(Engine::from_config(config)?);
		let records = engine.dataset().len();
		self.publish(engine.clone());
		log::info!(target: LOG_TARGET, "reloaded engine from {} ({records} records)", config.dataset.display());
		Ok(engine)
	}

	fn publish(&self, engine: Arc<Engine>) -> Arc<Engine> {
		let mut current = self.0.write().unwrap_or_else(PoisonError::into_inner);
		std::mem::replace(&mut *current, engine)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ElectionRecord;

	fn record(year: Year, party: &str, mla: u32, alliance: u32, wins: u32, winner: bool) -> ElectionRecord {
		ElectionRecord {
			year,
			party: party.into(),
			mla_strength: mla,
			alliance_mla_strength: alliance,
			past_rs_wins: wins,
			candidate_type: CandidateType::Incumbent,
			winner,
		}
	}

	fn engine() -> Engine {
		let dataset = Dataset::load(vec![
			record(2014, "BJP", 122, 185, 1, true),
			record(2014, "INC", 42, 83, 1, false),
			record(2019, "BJP", 105, 161, 2, true),
			record(2019, "INC", 44, 98, 1, false),
			record(2024, "BJP", 132, 230, 3, true),
			record(2024, "INC", 16, 46, 1, false),
		])
		.unwrap();
		Engine::train(dataset, &EngineConfig { test_fraction: 0.0, ..Default::default() }).unwrap()
	}

	fn inputs() -> Inputs {
		Inputs {
			year: 2027,
			party_index: 3,
			mla_strength: 100.0,
			alliance_mla_strength: 150.0,
			past_rs_wins: 2.0,
			candidate_type: CandidateType::Mixed,
		}
	}

	#[test]
	fn feature_row_follows_feature_names() {
		let all = FeatureSet::from_config(&EngineConfig {
			majority_threshold: 100,
			legislature_size: 200,
			..Default::default()
		});
		let row = all.row(inputs());
		assert_eq!(row, vec![2027.0, 3.0, 100.0, 150.0, 2.0, 1.0, 1.0, 0.5, 0.75]);
		assert_eq!(all.names(), FEATURE_NAMES);
	}

	#[test]
	fn disabled_features_leave_the_row() {
		let base = FeatureSet::from_config(&EngineConfig {
			no_majority_feature: true,
			no_share_features: true,
			..Default::default()
		});
		assert_eq!(base.row(inputs()), vec![2027.0, 3.0, 100.0, 150.0, 2.0, 1.0]);
		assert_eq!(base.names(), &FEATURE_NAMES[..6]);

		let shares_only =
			FeatureSet { majority: false, ..FeatureSet::from_config(&EngineConfig::default()) };
		assert_eq!(shares_only.names().len(), shares_only.row(inputs()).len());
		assert!(!shares_only.names().contains(&"has_majority"));
	}

	#[test]
	fn ties_are_broken_by_name() {
		let row = |name: &str, pct: f64| RankedParty {
			result: PredictionResult {
				party_name: name.into(),
				win_probability: pct,
				prediction: pct >= WIN_THRESHOLD_PCT,
			},
			mla_strength: 0,
			alliance_mla_strength: 0,
			has_majority: false,
		};
		let mut rows = vec![row("SS", 12.5), row("INC", 40.0), row("BJP", 12.5), row("NCP", 99.0)];
		sort_predictions(&mut rows);

		let names: Vec<_> = rows.iter().map(|r| r.result.party_name.as_str()).collect();
		assert_eq!(names, vec!["NCP", "INC", "BJP", "SS"]);
	}

	#[test]
	fn diagnostics_without_holdout() {
		let engine = engine();
		let d = engine.diagnostics();
		assert_eq!(d.train_size, 6);
		assert_eq!(d.test_size, 0);
		assert!(d.evaluation.is_none());
		assert_eq!(d.features.len(), FEATURE_NAMES.len());
		assert_eq!(d.party_encoding[0].party, "BJP");
	}

	#[test]
	fn unknown_party_is_not_scored() {
		let request = ScoringRequest {
			party_name: "UnknownParty".into(),
			mla_strength: 10.0,
			alliance_mla_strength: 20.0,
			past_rs_wins: 0.0,
			candidate_type: CandidateType::New,
			year: 2027,
		};
		assert!(matches!(engine().predict(&request), Err(Error::UnknownParty(p)) if p == "UnknownParty"));
	}

	#[test]
	fn single_class_dataset_fails_training() {
		let dataset = Dataset::load(vec![
			record(2019, "BJP", 105, 161, 2, true),
			record(2024, "BJP", 132, 230, 3, true),
		])
		.unwrap();
		assert!(matches!(
			Engine::train(dataset, &EngineConfig::default()),
			Err(Error::Training(_))
		));
	}

	#[test]
	fn replace_keeps_old_snapshot_alive() {
		let shared = SharedEngine::new(engine());
		let before = shared.snapshot();

		let retrained = Engine::train(
			before.dataset().clone(),
			&EngineConfig { weighting: Weighting::Recency, test_fraction: 0.0, ..Default::default() },
		)
		.unwrap();
		let replaced = shared.replace(retrained);

		assert!(Arc::ptr_eq(&before, &replaced));
		assert_eq!(before.diagnostics().weighting, Weighting::Uniform);
		assert_eq!(shared.snapshot().diagnostics().weighting, Weighting::Recency);
	}

	#[test]
	fn reload_returns_the_snapshot_it_published() {
		use std::io::Write;

		let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
		file.write_all(
			b"year,party,mla_strength,alliance_mla_strength,past_rs_wins,candidate_type,winner
2019,BJP,105,161,2,2,1
2019,INC,44,98,1,1,0
2024,BJP,132,230,3,2,1
2024,INC,16,46,1,1,0
",
		)
		.unwrap();
		let config =
			EngineConfig { dataset: file.path().to_path_buf(), test_fraction: 0.0, ..Default::default() };

		let shared = SharedEngine::new(engine());
		let published = shared.reload(&config).unwrap();

		assert!(Arc::ptr_eq(&published, &shared.snapshot()));
		assert_eq!(published.dataset().len(), 4);
	}
}
