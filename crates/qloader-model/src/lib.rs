//! Query result model for loader aggregation.
//!
//! This crate describes the observable state of one asynchronous fetch as a
//! query provider reports it, independent of how the fetch is scheduled.
//!
//! # Contents
//!
//! - `query.rs` - [`QueryResult`], [`QueryStatus`], [`RefetchHandle`]
//! - `ready.rs` - [`ReadyQuery`], a result whose payload is present
//! - `phase.rs` - [`LoaderPhase`], the rendering decision for a result
//! - `action.rs` - [`QueryAction`] reducer for locally driven queries
//! - `error.rs` - [`FetchError`], the default error payload

mod action;
mod error;
mod phase;
mod query;
mod ready;

pub use action::QueryAction;
pub use error::FetchError;
pub use phase::LoaderPhase;
pub use query::{QueryResult, QueryStatus, RefetchHandle};
pub use ready::ReadyQuery;
