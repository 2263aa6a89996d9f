use std::path::Path;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待处理文档所在目录
    pub input_folder: String,
    /// 学习者ID
    pub user_id: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 每日目标测验次数
    pub daily_goal: u32,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "documents".to_string(),
            user_id: "local-user".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            daily_goal: 3,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4".to_string(),
            llm_max_tokens: 2048,
        }
    }
}

impl Config {
    /// 仅从环境变量读取，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(config)
    }

    /// 加载配置：`LEARNING_CONFIG` 指向的 TOML 文件（可选）+ 环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("LEARNING_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(self.input_folder),
            user_id: std::env::var("LEARNER_ID").unwrap_or(self.user_id),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            daily_goal: std::env::var("DAILY_GOAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.daily_goal),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.llm_max_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm_model_name, "gpt-4");
        assert_eq!(config.daily_goal, 3);
        assert!(config.llm_api_key.is_empty());
    }

    #[test]
    fn test_from_toml_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "input_folder = \"lectures\"\nllm_model_name = \"gpt-4o-mini\"").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.input_folder, "lectures");
        assert_eq!(config.llm_model_name, "gpt-4o-mini");
        // 未写的字段保持默认
        assert_eq!(config.llm_max_tokens, 2048);
    }

    #[test]
    fn test_from_toml_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "daily_goal = \"many\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::TomlParseFailed { .. })
        ));
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = Config::from_toml_file(Path::new("/nonexistent/learning.toml")).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::ReadFailed { .. })));
    }
}
