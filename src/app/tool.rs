use crate::core::aggregator::MovieAggregator;
use crate::core::presenter::{self, OutputStyle};
use crate::domain::ports::ShowtimeSource;
use crate::utils::error::{FinderError, Result};
use chrono::NaiveDate;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "get_movies";
pub const TOOL_DESCRIPTION: &str = "Called when the user asks about movies showing in theaters. \
Returns the movies showing in the specified location for the given date.";

const SHOW_DATE_FORMAT: &str = "%Y-%m-%d";

/// 語音平台傳入的工具參數
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetMoviesArgs {
    #[schemars(description = "The city to get movie showtimes for")]
    pub location: String,

    #[schemars(
        description = "The province/state code (e.g. 'qc' for Quebec, 'on' for Ontario)"
    )]
    pub province: String,

    #[serde(default)]
    #[schemars(
        description = "The date to get showtimes for in YYYY-MM-DD format. If not provided, defaults to today."
    )]
    pub show_date: Option<String>,
}

impl GetMoviesArgs {
    pub fn new(location: impl Into<String>, province: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            province: province.into(),
            show_date: None,
        }
    }

    pub fn with_date(mut self, show_date: impl Into<String>) -> Self {
        self.show_date = Some(show_date.into());
        self
    }
}

/// 給模型看的工具定義（名稱、說明、參數 JSON Schema）
pub fn tool_definition() -> Value {
    let schema = schema_for!(GetMoviesArgs);
    json!({
        "type": "function",
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "parameters": serde_json::to_value(&schema).unwrap_or_default(),
    })
}

pub fn apology_message(location: &str) -> String {
    format!(
        "Sorry, I couldn't get the movie listings for {}. Please check the city and province/state names and try again.",
        location
    )
}

pub fn no_theatres_message(city: &str, province: &str) -> String {
    format!(
        "I couldn't find any theatres in {}, {}. Please check the city and province/state names and try again.",
        city, province
    )
}

/// 空白或未提供代表今天
pub fn parse_show_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, SHOW_DATE_FORMAT)
            .map(Some)
            .map_err(|_| FinderError::InvalidDate {
                value: raw.to_string(),
            }),
    }
}

/// 工具呼叫邊界：永遠回傳字串，不會把錯誤往語音 session 拋
pub struct MovieTool<S: ShowtimeSource> {
    aggregator: MovieAggregator<S>,
    style: OutputStyle,
}

impl<S: ShowtimeSource> MovieTool<S> {
    pub fn new(aggregator: MovieAggregator<S>, style: OutputStyle) -> Self {
        Self { aggregator, style }
    }

    pub fn aggregator(&self) -> &MovieAggregator<S> {
        &self.aggregator
    }

    pub async fn get_movies(&self, args: &GetMoviesArgs) -> String {
        tracing::info!(
            "get_movies called with location='{}', province='{}', date='{}'",
            args.location,
            args.province,
            args.show_date.as_deref().unwrap_or("today")
        );

        match self.try_get_movies(args).await {
            Ok(text) => text,
            Err(FinderError::NoTheatresFound { city, province }) => {
                tracing::warn!("No theatres found in '{}', '{}'", city, province);
                no_theatres_message(&city, &province)
            }
            Err(e) => {
                tracing::error!("❌ Error in get_movies: {}", e);
                apology_message(&args.location)
            }
        }
    }

    /// 解析 JSON 參數後呼叫；參數格式錯誤也只回傳道歉訊息
    pub async fn call_json(&self, raw_args: &str) -> String {
        match serde_json::from_str::<GetMoviesArgs>(raw_args) {
            Ok(args) => self.get_movies(&args).await,
            Err(e) => {
                tracing::error!("❌ Invalid get_movies arguments: {}", e);
                apology_message("that location")
            }
        }
    }

    async fn try_get_movies(&self, args: &GetMoviesArgs) -> Result<String> {
        let requested_date = parse_show_date(args.show_date.as_deref())?;
        let result = self
            .aggregator
            .get_movies(&args.location, &args.province, requested_date)
            .await?;

        tracing::info!(
            "Returning movies for {} theatres in '{}', '{}'",
            result.theatres.len(),
            args.location,
            args.province
        );

        Ok(presenter::render(
            &result,
            self.style,
            &args.location,
            &args.province,
            requested_date,
        ))
    }
}
