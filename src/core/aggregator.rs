use crate::core::directory::TheatreDirectory;
use crate::domain::model::{AggregatedResult, TheatreResult};
use crate::domain::ports::ShowtimeSource;
use crate::utils::error::{FinderError, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::task::JoinSet;

/// 依城市/省份找出影院，並行抓取場次後彙整
pub struct MovieAggregator<S: ShowtimeSource> {
    directory: Arc<TheatreDirectory>,
    source: Arc<S>,
}

impl<S: ShowtimeSource> Clone for MovieAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: ShowtimeSource> MovieAggregator<S> {
    pub fn new(directory: Arc<TheatreDirectory>, source: S) -> Self {
        Self {
            directory,
            source: Arc::new(source),
        }
    }

    pub fn directory(&self) -> &TheatreDirectory {
        &self.directory
    }

    /// 沒有任何符合的影院時回傳 `NoTheatresFound`；個別抓取失敗只會被略過
    pub async fn get_movies(
        &self,
        city: &str,
        province: &str,
        date: Option<NaiveDate>,
    ) -> Result<AggregatedResult> {
        let theatres = self.directory.find_theatres(city, province);
        if theatres.is_empty() {
            return Err(FinderError::NoTheatresFound {
                city: city.to_string(),
                province: province.to_string(),
            });
        }

        let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
        let requested = theatres.len();

        let mut join_set = JoinSet::new();
        for (index, theatre) in theatres.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            join_set.spawn(async move {
                let outcome = source.fetch_for_theatre(&theatre, date).await;
                (index, theatre, outcome)
            });
        }

        let mut successes: Vec<(usize, TheatreResult)> = Vec::with_capacity(requested);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, _, Ok(result))) => successes.push((index, result)),
                Ok((_, theatre, Err(e))) => {
                    tracing::debug!("Omitting theatre {} from results: {}", theatre.id, e);
                }
                Err(e) => {
                    tracing::error!("❌ Showtime fetch task did not complete: {}", e);
                }
            }
        }

        // 依影院目錄原本的順序輸出
        successes.sort_by_key(|(index, _)| *index);
        let theatres: Vec<TheatreResult> = successes.into_iter().map(|(_, r)| r).collect();

        tracing::info!(
            "✅ Successfully fetched movies from {} out of {} theatres in {}",
            theatres.len(),
            requested,
            city
        );

        Ok(AggregatedResult { date, theatres })
    }
}
