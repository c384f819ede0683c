//! Attendance ledger engine for overtime and leave exports
//!
//! This crate reconciles uploaded overtime and leave spreadsheets into a
//! per-person, per-day monthly ledger, merges and deduplicates leave exports
//! across correction cycles, and serves both over an HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod store;
