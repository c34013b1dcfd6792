pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::tool::{GetMoviesArgs, MovieTool};
pub use crate::config::{ApiConfig, FinderConfig, LocalStorage};
pub use crate::core::{
    aggregator::MovieAggregator, directory::TheatreDirectory, fetcher::ShowtimeFetcher,
    presenter::OutputStyle,
};
pub use crate::utils::error::{FetchError, FinderError, Result};
