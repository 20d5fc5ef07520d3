pub mod app_config;
pub mod config;
pub mod input;
pub mod report;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use input::{ProductSet, TargetSpec};
pub use report::{
    KeywordOutcome, MatchCandidate, PartialReport, RunReport, SearchStatus, SetReport,
};
