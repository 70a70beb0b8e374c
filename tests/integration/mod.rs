//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Storage driver tests against live services

#[cfg(feature = "postgres")]
mod postgres_test;
#[cfg(feature = "redis")]
mod redis_test;
