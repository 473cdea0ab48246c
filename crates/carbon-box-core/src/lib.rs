//! Core systems for Carbon Box.
//!
//! This crate provides the runtime primitives the widget crate builds on:
//!
//! - **Signal/Slot System**: synchronous, type-safe change notification
//! - **Timers**: cancellable one-shot timers driven by the host event loop
//! - **Logging**: `tracing` targets and the error reporting hook
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use carbon_box_core::TimerManager;
//!
//! let start = Instant::now();
//! let mut timers = TimerManager::new();
//! let id = timers.start_one_shot(start, Duration::from_millis(300));
//!
//! assert!(timers.process_expired(start).is_empty());
//! assert_eq!(timers.process_expired(start + Duration::from_millis(300)), vec![id]);
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{Result, TimerError};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};
