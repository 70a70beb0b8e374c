//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! End-to-end scenarios built from configuration files

mod login_flow;
