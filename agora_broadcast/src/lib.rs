#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Room-scoped fan-out of dialogue events.
//!
//! Each room is a tokio broadcast channel. Any number of sessions may publish
//! to different rooms concurrently; subscribers of a room receive its events
//! in publish order.

mod event;
mod observer;
mod registry;

pub use event::RoomEvent;
pub use observer::RoomObserver;
pub use registry::RoomRegistry;
