//! # Merchant Board - Wandering Merchant Schedule Service
//!
//! Merchant Board answers questions about the rotating wandering-merchant
//! schedule of an online game: which vendor appears in which region, when,
//! and what they sell. It loads a snapshot of the upstream schedule data,
//! builds an in-memory index, and serves queries from it until the next
//! refresh replaces it.
//!
//! ## Features
//!
//! - **Five queries**: merchant overview, schedule by day, merchant detail,
//!   item search, and merchants active at a given instant.
//! - **Weekly window math**: appearance windows that run past midnight stay
//!   active into the next day.
//! - **Stale-but-available refresh**: a failed upstream fetch keeps the last
//!   good index in service.
//! - **Change alerts**: the `watch` service logs arrivals, departures and
//!   merchants about to close.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use merchant_board::config::Config;
//! use merchant_board::merchant::IndexStore;
//! use merchant_board::source::{Refresher, SnapshotSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = Arc::new(IndexStore::new());
//!     let source = SnapshotSource::from_config(&config.source)?;
//!     let mut refresher = Refresher::new(source, store.clone());
//!     refresher.refresh().await;
//!
//!     let index = store.current();
//!     for seller in index.item_sellers("Box") {
//!         println!("{} - {}: {}", seller.region_name, seller.npc_name, seller.item_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`merchant`] - snapshot model, schedule index, queries and change tracking
//! - [`source`] - snapshot loading (file / HTTP) and the refresh cycle
//! - [`service`] - long-running refresh and alert loop
//! - [`render`] - plain-text output for the CLI
//! - [`config`] - configuration loading and defaults
//! - [`logutil`] - log sanitizing helpers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Snapshot Source │ ← file or HTTP, polled
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Index Store   │ ← current ScheduleIndex, swapped whole
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │     Queries     │ ← pure, read-only
//! └─────────────────┘
//! ```

pub mod config;
pub mod logutil;
pub mod merchant;
pub mod render;
pub mod service;
pub mod source;
