//! # cutline-core
//!
//! Store, scheduler and host plumbing for the cutline timeline engine.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cutline_core::config::Config;
//! use cutline_core::hooks::NoopHooks;
//! use cutline_core::scheduler::readiness;
//! use cutline_core::store::ProjectStore;
//!
//! // 1. Build a store whose mutations wait for the host's document root
//! let config = Config::load();
//! let (signal, gate) = readiness();
//! let mut store = ProjectStore::new(&config, gate, Arc::new(NoopHooks));
//!
//! // 2. The host fires the signal once its root exists
//! signal.mark_ready();
//!
//! // 3. Mutate; refresh hooks run once per outermost batch
//! store.batch(|s| {
//!     s.add_track(track);
//!     s.add_clip(clip);
//! });
//!
//! // 4. Read a deep-copied snapshot
//! let info = store.collect_timeline_info();
//! ```
//!
//! ## Module Overview
//!
//! - [`store`]: `ProjectStore`, the single writer and its public operations
//! - [`scheduler`]: batch boundary, readiness gate, debounced index rebuild
//! - [`hooks`]: `RefreshHooks` called after each batch
//! - [`transport`]: outbound `invoke(method, args)` contract to the host
//! - [`dispatch`]: `LocalDispatcher` and by-name host call decoding
//! - [`config`]: TOML configuration (embedded + user override)

pub mod config;
pub mod dispatch;
pub mod hooks;
pub mod scheduler;
pub mod store;
pub mod transport;

pub use cutline_types as types;
