//! In-memory todo collection server.
//!
//! Serves `GET/POST /todos` and `PATCH/DELETE /todos/{id}` over a
//! [`TodoCollection`](store::TodoCollection) that can be told to fail
//! specific calls. Used for local development and end-to-end tests.

pub mod config;
pub mod server;
pub mod store;
