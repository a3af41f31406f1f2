//! Home Monitor - backend for a home monitoring device and its dashboard
//!
//! The device reports sensor readings and alarm state, the dashboard reads
//! status and history and configures the alarm. This library exposes the core
//! modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod retention;
pub mod routes;
pub mod services;
pub mod store;
