pub mod cli;
pub mod toml_config;

pub use cli::LocalStorage;
pub use toml_config::{ApiConfig, DirectoryConfig, FinderConfig, OutputConfig};

#[cfg(feature = "cli")]
use crate::core::presenter::OutputStyle;
#[cfg(feature = "cli")]
use crate::utils::error::Result;

/// 兩個執行檔共用的命令列覆蓋設定
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CliConfig {
    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override api.base_url")]
    pub base_url: Option<String>,

    #[arg(long, help = "Subscription key (falls back to CINEPLEX_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long, help = "Path to the theatre directory JSON file")]
    pub theatres: Option<String>,

    #[arg(long, help = "Render results as a table")]
    pub table: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（如有），再套用命令列與環境變數
    pub fn resolve(&self) -> Result<FinderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                FinderConfig::from_file(path)?
            }
            None => FinderConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api.subscription_key = api_key.clone();
        }
        if let Some(theatres) = &self.theatres {
            config.directory.path = theatres.clone();
        }
        if self.table {
            config.output.style = OutputStyle::Table;
        }

        config.apply_env_fallback();
        Ok(config)
    }
}
