//! Hearth Budget - household budgeting with weekly rollover
//!
//! This library provides the core functionality for the `hearth` application.
//! Households import bank CSV exports, categorise transactions with pattern
//! rules, and compare spending to a weekly budget whose per-category surplus
//! or deficit carries forward from week to week.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (budgets, categories, transactions, ledger, etc.)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (scaling, rollover, ledger, dashboard, import)
//! - `display`: Table formatting for terminal output
//! - `cli`: Command handlers for the `hearth` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_budget::config::{HearthPaths, Settings};
//! use hearth_budget::models::PeriodType;
//! use hearth_budget::services::DashboardService;
//! use hearth_budget::storage::Storage;
//!
//! let paths = HearthPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let household = settings.require_household()?;
//! let summary = DashboardService::new(&storage, settings.week_starts_on)
//!     .dashboard(household, PeriodType::Week)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
