pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod ledger;
pub mod present;
pub mod runner;
pub mod sequence;
pub mod session;
pub mod stage;
pub mod summary;
pub mod tracker;
// cmd and reports are binary modules (in main.rs), not part of the library
// surface; integration tests drive the controller directly.
