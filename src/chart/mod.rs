//! Chart configuration and field resolution
//!
//! `form` holds the typed configuration record authored by the chart control
//! surface; `fields` resolves it into concrete row keys and the clustering
//! policy for one transform invocation.

pub mod fields;
pub mod form;

pub use fields::*;
pub use form::*;
