pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod model;
pub mod providers;
pub mod report;
