//! Integration test suite modules

mod explanation;
mod provider;
mod simulation;
