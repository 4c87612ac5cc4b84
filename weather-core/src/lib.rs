//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Place-name validation and the two-stage lookup pipeline
//!   (name search, then current conditions)
//! - Classification of every failure into not-found, network or malformed-response
//! - Condition-code vocabulary and the text report
//! - Configuration handling and an off-thread query session for interactive front ends
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod vocabulary;

pub use config::Config;
pub use error::{InvalidPlaceName, PipelineOutcome, QueryError};
pub use format::render;
pub use model::{ConditionsData, GeoLocation, PlaceName, WeatherSnapshot};
pub use pipeline::WeatherPipeline;
pub use provider::{ConditionsFetcher, LocationResolver};
pub use session::{PendingQuery, QuerySession, SessionBusy};
pub use vocabulary::text_for;
