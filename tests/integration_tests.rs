//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Integration test entry
//!
//! Driver tests under `integration` need live services and are ignored by
//! default: `cargo test --all-features -- --ignored`.

mod common;
mod integration;
mod modules;
