#![forbid(unsafe_code)]

pub mod catalog;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod history;
pub mod model;
pub mod scoring;
pub mod time;

pub use catalog::{AttributeCatalog, AttributeEntry, AttributeKind, CatalogError, Presentation};
pub use error::Error;
pub use time::{Clock, Countdown, Tick};
