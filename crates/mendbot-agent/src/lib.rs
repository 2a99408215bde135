pub mod config;
pub mod preflight;
pub mod testrun;
pub mod workflow;
