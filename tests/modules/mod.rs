//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Per-module tests through the public API

mod backends;
mod blowfish;
mod throttler;
