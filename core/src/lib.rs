//! rosstat-core: synthetic regional statistics and the dashboard
//! queries over them.

pub mod cache;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod index;
pub mod municipal;
pub mod query;
pub mod region;
pub mod rng;
pub mod stats;
pub mod types;
pub mod view;
