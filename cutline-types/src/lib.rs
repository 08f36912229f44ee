//! # cutline-types
//!
//! Document model and pure consistency logic for the cutline timeline engine.
//! Shared by cutline-core (store + scheduler) and hosts that only need to
//! read or build timeline records.
//!
//! - [`state`]: `Project`, `Track`, `Clip`, `FrameRate` and their partial
//!   input forms (drafts and patches)
//! - [`value`]: soft numeric coercion for loose host values
//! - [`normalize`]: default-filling and timing resolution for new records
//! - [`identifier`] / [`resolve`]: track and clip lookup
//! - [`timing`]: clip timing reconciliation and aggregate duration
//! - [`action`] / [`reduce`]: mutations and their pure reducers

pub mod action;
pub mod dispatch;
pub mod identifier;
pub mod info;
pub mod normalize;
pub mod reduce;
pub mod resolve;
pub mod state;
pub mod timing;
pub mod value;

pub use action::*;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use identifier::Identifier;
pub use info::{collect_timeline_info, TimelineInfo, TrackInfo};
pub use normalize::NormalizeDefaults;

// Re-export all state types at crate root for convenience
pub use state::*;
