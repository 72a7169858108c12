//! `todosync` — terminal client for a remote todo collection.
//!
//! The library keeps an ordered local copy of the collection, applies user
//! actions optimistically, and reconciles them as the remote calls settle.

pub mod api;
pub mod app;
pub mod config;
pub mod filter;
pub mod notify;
pub mod session;
pub mod store;
pub mod sync;
pub mod tracker;
pub mod ui;
