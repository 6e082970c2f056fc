//! A small polling service: create polls with text answers, list them, fetch a poll with its vote
//! tallies, and cast votes.

pub mod config;
pub mod dao;
pub mod json;
pub mod routes;

pub use routes::AppState;
