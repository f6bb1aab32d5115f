//! LabTrack server library.
//!
//! Sample registry, test result lifecycle with AI-assisted analysis,
//! password/JWT authentication and the REST API exposing them.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
