// airwatch library crate
// Exposes modules for integration testing

pub mod alerts;
pub mod analysis;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod models;
pub mod output;
pub mod store;
pub mod utils;
