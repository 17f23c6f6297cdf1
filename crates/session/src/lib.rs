//! The capture-and-analyze workflow.
//!
//! A `Session` owns the device registry, the bound live feed, the analysis
//! client and the `ResultStore`. Every acquisition is submitted right away;
//! views are recomputed from the current state with `compose`.

pub mod acquire;
pub mod session;
pub mod state;
pub mod view;

pub use acquire::{AcquireError, CaptureOptions, acquire_from_file, capture_from_live_feed, snapshot};
pub use session::Session;
pub use state::{RequestState, ResultState, ResultStore};
pub use view::{FeedStatus, View, compose};
