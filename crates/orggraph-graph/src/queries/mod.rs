//! Read-side queries built on [`crate::GraphClient`].

pub mod snapshot;
pub mod traversal;
