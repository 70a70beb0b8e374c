//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! End-to-end scenarios

mod common;
mod e2e;
