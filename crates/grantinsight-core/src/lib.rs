// Core dashboard logic - data model, filtering and everything a view derives from it
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod repository;
pub mod theme;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use filter::{count_by_status, count_statuses, filter_opportunities, FilterEngine, FilterQuery, StatusCounts};
pub use models::{Opportunity, Priority, Status, StatusFilter};
pub use repository::{FixtureSource, JsonFileSource, OpportunityRepository, OpportunitySource};
pub use theme::{Color, Theme, ThemeColors};

/// Result type alias so every module can just write Result<T>
pub type Result<T> = std::result::Result<T, Error>;
