//! Scheduling Timeline & Compliance Engine for childcare centres
//!
//! This crate derives schedule end dates from enrolment timelines and end-of-care
//! marks, materializes per-group attendance calendars, and captures staffing
//! compliance snapshots against age-based supervision ratios.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod events;
pub mod jobs;
pub mod models;
pub mod repository;
pub mod service;
