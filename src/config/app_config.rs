use crate::error::InitProcessError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// 16進ダンプの入力ファイル。未設定なら標準入力
    pub path: Option<PathBuf>,
    /// 完全なパースに失敗したとき、検証なしのペイロード抽出も試す
    pub relaxed: bool,
}

impl LogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InitProcessError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 環境変数の取得元を差し替えて設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InitProcessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("PACKET_VIEW_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        level
            .parse::<LevelFilter>()
            .map_err(|e| InitProcessError::EnvVarParseError(format!("PACKET_VIEW_LOG_LEVEL={}: {}", level, e)))?;

        let relaxed = match lookup("PACKET_VIEW_RELAXED") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|e| InitProcessError::EnvVarParseError(format!("PACKET_VIEW_RELAXED={}: {}", value, e)))?,
            None => false,
        };

        Ok(Self {
            log: LogConfig {
                level,
                file: lookup("PACKET_VIEW_LOG_FILE").filter(|v| !v.is_empty()).map(PathBuf::from),
            },
            input: InputConfig {
                path: lookup("PACKET_VIEW_INPUT").filter(|v| !v.is_empty()).map(PathBuf::from),
                relaxed,
            },
        })
    }

    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            log: LogConfig {
                level: "debug".to_string(),
                file: None,
            },
            input: InputConfig {
                path: None,
                relaxed: true,
            },
        }
    }
}
