//! Core business logic for Fairshare.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `split` - Fair-share allocation of a transaction among participants
//! - `balance` - Normalization of remote settlement data into net positions

pub mod balance;
pub mod split;
