pub mod cli;
pub mod coerce;
pub mod config;
pub mod dotenv;
pub mod env;
pub mod error;
pub mod json;
pub mod naming;
