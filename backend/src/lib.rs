//! FitQuest Backend Library
//!
//! Progress scoring and gamification service. Exposes the backend modules
//! for use in integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
