//! Fixture programs and helpers shared by the termtext integration tests.

pub mod helpers;

pub use helpers::{fixture_path, temp_dir, write_config, write_json};
