//! Video device access for the jerawat workspace.
//!
//! `DeviceRegistry` enumerates capture devices through a `VideoBackend`
//! and tracks the selected one. `LiveFeed` binds one device and keeps its
//! latest frame available for snapshots until it is released.

mod registry;
pub use registry::*;

mod videoerror;
pub use videoerror::*;

mod videoframe;
pub use videoframe::*;

mod videoin;
pub use videoin::*;
