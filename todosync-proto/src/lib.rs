//! Shared wire definitions for the `todosync` collection endpoint.

pub mod codec;
pub mod todo;
