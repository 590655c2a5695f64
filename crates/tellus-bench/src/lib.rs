//! Headless frame-time benchmark for the planet pipeline.

pub mod report;
pub mod runner;
pub mod scenes;
