pub mod config;
pub mod orchestrator;
pub mod providers;
pub mod recommender;
pub mod storage;
