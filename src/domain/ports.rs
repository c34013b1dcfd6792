use crate::domain::model::{TheatreRecord, TheatreResult};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// 單一影院、單一日期的場次來源
#[async_trait]
pub trait ShowtimeSource: Send + Sync + 'static {
    async fn fetch_for_theatre(
        &self,
        theatre: &TheatreRecord,
        date: NaiveDate,
    ) -> std::result::Result<TheatreResult, FetchError>;
}
