#![allow(dead_code)]

use rajya_sabha_predictor::{
	dataset::Dataset,
	engine::Engine,
	opt::EngineConfig,
};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Two parties over seven cycles. BJP wins every cycle but 2014.
pub const BJP_NCP: &str = "\
year,party,mla_strength,alliance_mla_strength,past_rs_wins,candidate_type,winner
2010,BJP,90,120,0,1,1
2010,NCP,40,100,0,0,0
2012,BJP,95,120,1,2,1
2012,NCP,60,110,0,1,0
2014,BJP,100,125,1,2,0
2014,NCP,105,130,0,1,1
2016,BJP,120,150,2,2,1
2016,NCP,45,95,1,1,0
2018,BJP,122,150,2,2,1
2018,NCP,41,98,1,2,0
2020,BJP,105,113,3,2,1
2020,NCP,54,98,1,2,0
2024,BJP,132,132,3,2,1
2024,NCP,42,98,1,1,0
";

pub fn init_logger() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

/// Write `contents` to a temporary CSV file that lives as long as the handle.
pub fn write_dataset(contents: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	file.flush().unwrap();
	file
}

pub fn config_for(file: &NamedTempFile) -> EngineConfig {
	EngineConfig { dataset: file.path().to_path_buf(), ..Default::default() }
}

pub fn engine_from(contents: &str, config: &EngineConfig) -> Engine {
	init_logger();
	let dataset = Dataset::from_csv_reader(contents.as_bytes()).unwrap();
	Engine::train(dataset, config).unwrap()
}

pub fn bjp_ncp_engine() -> Engine {
	engine_from(BJP_NCP, &EngineConfig::default())
}
