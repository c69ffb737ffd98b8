//! An in-memory multi-attribute ranked user store, served over a small
//! HTTP adapter.
//!
//! [`store::UserStore`] keeps a [`primary_index::PrimaryIndex`] and one
//! [`ranked_index::RankedIndex`] per registered view in lock-step so that,
//! alongside ordinary CRUD by `uid`, it can answer "what rank does this
//! user hold under this score attribute" in O(log n).

pub mod config;
pub mod error;
pub mod http;
mod llrb_node;
pub mod primary_index;
pub mod ranked_index;
pub mod record;
pub mod server;
pub mod store;

pub use crate::error::{Error, Result};
pub use crate::record::Record;
pub use crate::store::UserStore;
