//! Extraction and flattening pipeline for the VK tap.
//!
//! Each [`StreamKind`] binds a routine in [`routines`] to a schema. A routine
//! issues its VK calls one after another, confines per-item failures
//! according to the stream's [`IsolationPolicy`], and returns typed rows.
//! [`StreamKind::produce_records`] then runs those rows through the
//! [`project_rows`] projector and conforms them to the declared schema.
//!
//! The statistics stream is the only one with real reshaping:
//! [`flatten::flatten_periods`] unnests per-period breakdowns into one row per
//! (source, dimension, value).

pub mod catalog;
pub mod definition;
pub mod error;
pub mod flatten;
pub mod isolation;
pub mod projector;
pub mod routines;
pub mod schema;
mod session;

pub use catalog::Catalog;
pub use definition::{Record, StreamKind};
pub use error::StreamError;
pub use flatten::{flatten_periods, flatten_stats, Dimension, Source, StatBase, StatRow};
pub use isolation::{IsolationPolicy, ItemOutcome};
pub use projector::project_rows;
pub use schema::{FieldType, Property, Schema};
pub use session::{open_session, run_stream};
