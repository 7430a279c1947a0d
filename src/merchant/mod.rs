//! # Merchant schedule core
//!
//! Everything needed to answer questions about the wandering merchant
//! rotation from one upstream snapshot:
//!
//! - [`model`] - records decoded from the snapshot (items, regions, slots)
//! - [`index`] - [`ScheduleIndex`], built once per snapshot
//! - [`query`] - the read-only queries (overview, day schedule, merchant
//!   detail, item search, active now)
//! - [`window`] - weekly interval math behind the "active now" query
//! - [`tracker`] - arrival / closing / departure detection between checks
//! - [`store`] - [`IndexStore`], the swap point for the index being served
//! - [`labels`] - display names for grades, item types and weekdays
//!
//! Nothing in this module performs I/O or returns an error: malformed data
//! degrades to placeholders and lookups that miss return `None`.
//!
//! ```
//! use merchant_board::merchant::{DayOfWeek, Region, ScheduleIndex, ScheduleSlot, Span};
//! use chrono::NaiveTime;
//!
//! let index = ScheduleIndex::build(
//!     vec![Region::new("Artemis", "Ben", 1)],
//!     vec![ScheduleSlot::new(
//!         DayOfWeek::SUNDAY,
//!         NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
//!         Span::from_hms(5, 30, 0),
//!         vec![1],
//!     )],
//! );
//! assert_eq!(index.merchant_schedule("Ben").unwrap().schedule.len(), 1);
//! assert!(index.merchant_schedule("Nobody").is_none());
//! ```

pub mod index;
pub mod labels;
pub mod model;
pub mod query;
pub mod store;
pub mod tracker;
pub mod window;

pub use index::{IndexStats, ScheduleIndex};
pub use model::{DayOfWeek, Grade, Item, ItemType, Region, ScheduleSlot, Snapshot, Span};
pub use query::{
    ActiveGroup, DaySlot, ItemLabel, MerchantDetail, MerchantLabel, MerchantSummary,
    ScheduleEntry, Seller, Summary,
};
pub use store::IndexStore;
pub use tracker::{ActivityTracker, Appearance, AppearanceKey, MerchantChanges};
