//! Shared types, errors, and configuration for Fairshare.
//!
//! This crate provides common types used across all other crates:
//! - Typed numeric IDs for users and groups
//! - Currency descriptor with minor-unit precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AllocationConfig, AppConfig, BalanceConfig, LoggingConfig, TieBreak};
pub use error::{AppError, AppResult};
