use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 經過驗證的影院資料，載入後不再變動
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheatreRecord {
    pub id: String,
    pub name: String,
    pub city: String,
    pub province_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showtime {
    pub start_time: NaiveDateTime,
    pub seats_remaining: u32,
    pub is_sold_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieListing {
    pub title: String,
    pub genre: String,
    pub rating: String,
    pub runtime_minutes: u32,
    pub showtimes: Vec<Showtime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheatreResult {
    pub theatre_id: String,
    pub theatre_name: String,
    pub movies: Vec<MovieListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub date: NaiveDate,
    pub theatres: Vec<TheatreResult>,
}

impl AggregatedResult {
    pub fn is_empty(&self) -> bool {
        self.theatres.is_empty()
    }
}
