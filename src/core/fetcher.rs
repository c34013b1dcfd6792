use crate::config::ApiConfig;
use crate::core::presenter;
use crate::domain::model::{MovieListing, Showtime, TheatreRecord, TheatreResult};
use crate::domain::ports::ShowtimeSource;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const API_DATE_FORMAT: &str = "%m/%d/%Y";
const SESSION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// 上游 API 的回應結構，只取用到的欄位

#[derive(Debug, Deserialize)]
struct ApiLocation {
    dates: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiDate {
    movies: Option<Vec<ApiMovie>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMovie {
    name: Option<String>,
    genres: Option<Vec<String>>,
    local_rating: Option<String>,
    runtime_in_minutes: Option<u32>,
    experiences: Option<Vec<ApiExperience>>,
}

#[derive(Debug, Deserialize)]
struct ApiExperience {
    sessions: Option<Vec<ApiSession>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSession {
    show_start_date_time: String,
    seats_remaining: Option<i64>,
    is_sold_out: Option<bool>,
}

/// 呼叫上游 showtimes API 的客戶端
#[derive(Debug, Clone)]
pub struct ShowtimeFetcher {
    client: Client,
    config: ApiConfig,
    endpoint: String,
}

impl ShowtimeFetcher {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;
        let endpoint = format!("{}/showtimes", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_listings(
        &self,
        theatre: &TheatreRecord,
        date: NaiveDate,
    ) -> std::result::Result<Vec<MovieListing>, FetchError> {
        let formatted_date = date.format(API_DATE_FORMAT).to_string();

        tracing::debug!(
            "Making API request to: {} (locationId={}, date={})",
            self.endpoint,
            theatre.id,
            formatted_date
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("language", self.config.language.as_str()),
                ("locationId", theatre.id.as_str()),
                ("date", formatted_date.as_str()),
            ])
            .header(SUBSCRIPTION_KEY_HEADER, self.config.subscription_key.as_str())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status for {}: {}", theatre.name, status);

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_movies(&body)
    }
}

#[async_trait]
impl ShowtimeSource for ShowtimeFetcher {
    async fn fetch_for_theatre(
        &self,
        theatre: &TheatreRecord,
        date: NaiveDate,
    ) -> std::result::Result<TheatreResult, FetchError> {
        tracing::info!(
            "🎬 Fetching movies for theatre: {} (ID: {})",
            theatre.name,
            theatre.id
        );

        match self.request_listings(theatre, date).await {
            Ok(movies) => {
                let result = TheatreResult {
                    theatre_id: theatre.id.clone(),
                    theatre_name: theatre.name.clone(),
                    movies,
                };
                if !result.movies.is_empty() {
                    tracing::debug!("{}\n", presenter::render_theatre_table(&result));
                }
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Fetching movies failed for theatre {} (ID: {}): {}",
                    theatre.name,
                    theatre.id,
                    e
                );
                Err(e)
            }
        }
    }
}

/// 解析 showtimes 回應：`[ { dates: [ { movies: [...] } ] } ]`
pub fn parse_movies(body: &str) -> std::result::Result<Vec<MovieListing>, FetchError> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::malformed(format!("invalid JSON: {}", e)))?;

    let first_location = match data {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::malformed("response list is empty"))?,
        _ => return Err(FetchError::malformed("expected a top-level list")),
    };

    let location: ApiLocation = serde_json::from_value(first_location)
        .map_err(|e| FetchError::malformed(format!("location entry: {}", e)))?;

    let first_date = location
        .dates
        .and_then(|dates| dates.into_iter().next())
        .ok_or_else(|| FetchError::malformed("missing or empty 'dates'"))?;

    let date: ApiDate = serde_json::from_value(first_date)
        .map_err(|e| FetchError::malformed(format!("date entry: {}", e)))?;

    date.movies
        .unwrap_or_default()
        .into_iter()
        .map(build_listing)
        .collect()
}

fn build_listing(movie: ApiMovie) -> std::result::Result<MovieListing, FetchError> {
    let mut seen_times = HashSet::new();
    let mut showtimes = Vec::new();

    let sessions = movie
        .experiences
        .unwrap_or_default()
        .into_iter()
        .flat_map(|experience| experience.sessions.unwrap_or_default());

    for session in sessions {
        let start_time =
            NaiveDateTime::parse_from_str(&session.show_start_date_time, SESSION_TIME_FORMAT)
                .map_err(|e| {
                    FetchError::malformed(format!(
                        "showStartDateTime '{}': {}",
                        session.show_start_date_time, e
                    ))
                })?;

        // 同一分鐘只保留第一個場次（不同 experience 會重複）
        if !seen_times.insert(start_time.format("%H:%M").to_string()) {
            continue;
        }

        showtimes.push(Showtime {
            start_time,
            seats_remaining: session
                .seats_remaining
                .unwrap_or(0)
                .clamp(0, u32::MAX as i64) as u32,
            is_sold_out: session.is_sold_out.unwrap_or(false),
        });
    }

    // sort_by_key 是穩定排序
    showtimes.sort_by_key(|showtime| showtime.start_time);

    let genre = match movie.genres {
        Some(genres) if !genres.is_empty() => genres.join(", "),
        _ => "N/A".to_string(),
    };

    Ok(MovieListing {
        title: movie.name.unwrap_or_else(|| "Unknown".to_string()),
        genre,
        rating: movie.local_rating.unwrap_or_else(|| "N/A".to_string()),
        runtime_minutes: movie.runtime_in_minutes.unwrap_or(0),
        showtimes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn theatre() -> TheatreRecord {
        TheatreRecord {
            id: "7130".to_string(),
            name: "Cineplex Forum".to_string(),
            city: "Montreal".to_string(),
            province_code: "QC".to_string(),
        }
    }

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn wrap_movies(movies: Value) -> Value {
        json!([{ "theatreId": 7130, "dates": [{ "startDate": "2024-06-01", "movies": movies }] }])
    }

    #[test]
    fn test_parse_deduplicates_same_minute_first_wins() {
        let body = wrap_movies(json!([{
            "name": "Dune",
            "genres": ["Sci-Fi"],
            "experiences": [
                {"sessions": [{"showStartDateTime": "2024-06-01T14:00:00", "seatsRemaining": 10}]},
                {"sessions": [{"showStartDateTime": "2024-06-01T14:00:00", "seatsRemaining": 99}]}
            ]
        }]));

        let movies = parse_movies(&body.to_string()).unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].showtimes.len(), 1);
        assert_eq!(movies[0].showtimes[0].seats_remaining, 10);
    }

    #[test]
    fn test_parse_sorts_showtimes_across_experiences() {
        let body = wrap_movies(json!([{
            "name": "Inside Out 2",
            "experiences": [
                {"sessions": [
                    {"showStartDateTime": "2024-06-01T21:10:00"},
                    {"showStartDateTime": "2024-06-01T13:00:00"}
                ]},
                {"sessions": [{"showStartDateTime": "2024-06-01T16:45:00", "isSoldOut": true}]}
            ]
        }]));

        let movies = parse_movies(&body.to_string()).unwrap();
        let showtimes = &movies[0].showtimes;

        assert_eq!(showtimes.len(), 3);
        assert!(showtimes.windows(2).all(|w| w[0].start_time <= w[1].start_time));
        assert!(showtimes[1].is_sold_out);
        assert!(!showtimes[0].is_sold_out);
    }

    #[test]
    fn test_parse_applies_movie_defaults() {
        let body = wrap_movies(json!([{ "genres": [] }]));

        let movies = parse_movies(&body.to_string()).unwrap();
        let movie = &movies[0];

        assert_eq!(movie.title, "Unknown");
        assert_eq!(movie.genre, "N/A");
        assert_eq!(movie.rating, "N/A");
        assert_eq!(movie.runtime_minutes, 0);
        assert!(movie.showtimes.is_empty());
    }

    #[test]
    fn test_parse_joins_genres_and_reads_rating() {
        let body = wrap_movies(json!([{
            "name": "Dune: Part Two",
            "genres": ["Sci-Fi", "Adventure"],
            "localRating": "PG-13",
            "runtimeInMinutes": 166,
            "experiences": [{"sessions": [{"showStartDateTime": "2024-06-01T19:00:00", "seatsRemaining": -3}]}]
        }]));

        let movies = parse_movies(&body.to_string()).unwrap();

        assert_eq!(movies[0].genre, "Sci-Fi, Adventure");
        assert_eq!(movies[0].rating, "PG-13");
        assert_eq!(movies[0].runtime_minutes, 166);
        assert_eq!(movies[0].showtimes[0].seats_remaining, 0);
    }

    #[test]
    fn test_parse_missing_movies_key_means_no_movies() {
        let body = json!([{ "dates": [{ "startDate": "2024-06-01" }] }]);
        assert!(parse_movies(&body.to_string()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unexpected_shapes() {
        let cases = [
            "not json".to_string(),
            json!({}).to_string(),
            json!([]).to_string(),
            json!([{}]).to_string(),
            json!([{ "dates": [] }]).to_string(),
            json!([{ "dates": "2024-06-01" }]).to_string(),
            json!([{ "dates": [{ "movies": "none" }] }]).to_string(),
            wrap_movies(json!([{ "experiences": [{ "sessions": [{}] }] }])).to_string(),
            wrap_movies(json!([{
                "experiences": [{ "sessions": [{ "showStartDateTime": "06/01/2024 2pm" }] }]
            }]))
            .to_string(),
        ];

        for body in cases {
            assert!(
                matches!(parse_movies(&body), Err(FetchError::MalformedResponse { .. })),
                "expected malformed response for {}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_subscription_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/showtimes")
                .query_param("language", "en")
                .query_param("locationId", "7130")
                .query_param("date", "06/01/2024")
                .header(SUBSCRIPTION_KEY_HEADER, "test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(wrap_movies(json!([{
                    "name": "Dune",
                    "experiences": [{"sessions": [{"showStartDateTime": "2024-06-01T14:00:00", "seatsRemaining": 5}]}]
                }])));
        });

        let fetcher = ShowtimeFetcher::new(ApiConfig::new(server.base_url(), "test-key")).unwrap();
        let result = fetcher.fetch_for_theatre(&theatre(), june_first()).await.unwrap();

        api_mock.assert();
        assert_eq!(result.theatre_id, "7130");
        assert_eq!(result.theatre_name, "Cineplex Forum");
        assert_eq!(result.movies[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/showtimes");
            then.status(500);
        });

        let fetcher = ShowtimeFetcher::new(ApiConfig::new(server.base_url(), "test-key")).unwrap();
        let result = fetcher.fetch_for_theatre(&theatre(), june_first()).await;

        api_mock.assert();
        assert!(matches!(result, Err(FetchError::Status { status: 500 })));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/showtimes");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"message": "Access denied"}));
        });

        let fetcher = ShowtimeFetcher::new(ApiConfig::new(server.base_url(), "test-key")).unwrap();
        let result = fetcher.fetch_for_theatre(&theatre(), june_first()).await;

        assert!(matches!(result, Err(FetchError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_is_failure() {
        // 沒有服務監聽的位址
        let fetcher =
            ShowtimeFetcher::new(ApiConfig::new("http://127.0.0.1:9", "test-key")).unwrap();
        let result = fetcher.fetch_for_theatre(&theatre(), june_first()).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let fetcher =
            ShowtimeFetcher::new(ApiConfig::new("https://api.example.com/v1/", "k")).unwrap();
        assert_eq!(fetcher.endpoint(), "https://api.example.com/v1/showtimes");
    }
}
