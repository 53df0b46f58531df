//! CLI command implementations.
//!
//! - **estimate**: run the pipeline for a scenario and write a report
//! - **validate**: report every configuration error and drift finding
//! - **init**: write the baseline configuration file

pub mod estimate;
pub mod init;
pub mod validate;

pub use estimate::run_estimate;
pub use init::init_config;
pub use validate::validate_config_file;
