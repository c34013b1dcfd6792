pub mod aggregator;
pub mod directory;
pub mod fetcher;
pub mod presenter;

pub use crate::domain::model::{
    AggregatedResult, MovieListing, Showtime, TheatreRecord, TheatreResult,
};
pub use crate::domain::ports::{ShowtimeSource, Storage};
pub use crate::utils::error::Result;
