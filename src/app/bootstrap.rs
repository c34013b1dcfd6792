use crate::app::tool::MovieTool;
use crate::config::FinderConfig;
use crate::core::aggregator::MovieAggregator;
use crate::core::directory::TheatreDirectory;
use crate::core::fetcher::ShowtimeFetcher;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

pub async fn load_directory<St: Storage>(storage: &St, path: &str) -> Result<TheatreDirectory> {
    let bytes = storage.read_file(path).await?;
    TheatreDirectory::from_slice(&bytes)
}

/// 啟動時組好整條呼叫鏈；任何錯誤都是致命的
pub async fn build_tool<St: Storage>(
    config: &FinderConfig,
    storage: &St,
) -> Result<MovieTool<ShowtimeFetcher>> {
    config.validate()?;

    let directory = load_directory(storage, &config.directory.path).await?;
    if directory.is_empty() {
        tracing::warn!(
            "⚠️ Theatre directory '{}' has no usable entries",
            config.directory.path
        );
    }

    let fetcher = ShowtimeFetcher::new(config.api.clone())?;
    tracing::info!("Showtimes endpoint: {}", fetcher.endpoint());

    let aggregator = MovieAggregator::new(Arc::new(directory), fetcher);
    Ok(MovieTool::new(aggregator, config.output.style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, LocalStorage};
    use crate::utils::error::FinderError;
    use tempfile::TempDir;

    fn config_for(path: &str) -> FinderConfig {
        let mut config = FinderConfig::default();
        config.api = ApiConfig::new("http://localhost:8080", "key");
        config.directory.path = path.to_string();
        config
    }

    #[tokio::test]
    async fn test_build_tool_loads_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("theatres.json"),
            r#"{"nearbyTheatres": [{"theatreId": "1", "theatreName": "Forum",
                "location": {"city": "Montreal", "provinceCode": "QC"}}]}"#,
        )
        .unwrap();

        let storage = LocalStorage::new(temp_dir.path());
        let tool = build_tool(&config_for("theatres.json"), &storage).await.unwrap();

        assert_eq!(tool.aggregator().directory().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = build_tool(&config_for("theatres.json"), &storage).await;
        assert!(matches!(result, Err(FinderError::IoError(_))));
    }

    #[tokio::test]
    async fn test_malformed_dataset_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("theatres.json"), "42").unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = build_tool(&config_for("theatres.json"), &storage).await;
        assert!(matches!(
            result,
            Err(FinderError::DirectoryFormatError { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_loading() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let mut config = config_for("theatres.json");
        config.api.subscription_key.clear();

        let result = build_tool(&config, &storage).await;
        assert!(matches!(result, Err(FinderError::MissingConfigError { .. })));
    }
}
