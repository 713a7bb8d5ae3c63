/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "quiz_paper.toml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- MongoDB 配置 ---
    pub mongodb_uri: String,
    pub database_name: String,
    pub collection_name: String,
    /// 连接 / 选择服务器超时（秒）
    pub store_timeout_secs: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    /// 组卷时每个难度查询 `count * factor` 道候选题
    pub pool_oversample_factor: usize,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 运行参数 ---
    pub topic: String,
    pub num_easy: usize,
    pub num_medium: usize,
    pub num_hard: usize,
    pub num_papers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017/".to_string(),
            database_name: "llm_questions".to_string(),
            collection_name: "llm_data".to_string(),
            store_timeout_secs: 5,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "llama3-8b-8192".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 4096,
            pool_oversample_factor: 3,
            output_log_file: "question_generator.log".to_string(),
            verbose_logging: false,
            topic: "INFORMATICS PRACTICES".to_string(),
            num_easy: 1,
            num_medium: 1,
            num_hard: 0,
            num_papers: 1,
        }
    }
}

impl Config {
    /// 按完整顺序加载配置
    ///
    /// 配置文件路径取 `QUIZ_CONFIG`，未设置时尝试当前目录下的 `quiz_paper.toml`，
    /// 文件不存在则跳过
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("QUIZ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::FileParseFailed { reason, .. } => ConfigError::FileParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::FileParseFailed {
            path: String::new(),
            reason: e.to_string(),
        })
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// 用给定的查找函数覆盖配置（便于测试，不依赖进程环境）
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str, current: String| lookup(name).unwrap_or(current);

        Ok(Self {
            mongodb_uri: string("MONGODB_URI", self.mongodb_uri),
            database_name: string("DATABASE_NAME", self.database_name),
            collection_name: string("COLLECTION_NAME", self.collection_name),
            store_timeout_secs: parse_var(&lookup, "STORE_TIMEOUT_SECS", self.store_timeout_secs)?,
            // GROQ_API_KEY 作为兼容的备用变量名
            llm_api_key: lookup("LLM_API_KEY")
                .or_else(|| lookup("GROQ_API_KEY"))
                .unwrap_or(self.llm_api_key),
            llm_api_base_url: string("LLM_API_BASE_URL", self.llm_api_base_url),
            llm_model_name: string("LLM_MODEL_NAME", self.llm_model_name),
            llm_temperature: parse_var(&lookup, "LLM_TEMPERATURE", self.llm_temperature)?,
            llm_max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS", self.llm_max_tokens)?,
            pool_oversample_factor: parse_var(
                &lookup,
                "POOL_OVERSAMPLE_FACTOR",
                self.pool_oversample_factor,
            )?,
            output_log_file: string("OUTPUT_LOG_FILE", self.output_log_file),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", self.verbose_logging)?,
            topic: string("QUIZ_TOPIC", self.topic),
            num_easy: parse_var(&lookup, "QUIZ_NUM_EASY", self.num_easy)?,
            num_medium: parse_var(&lookup, "QUIZ_NUM_MEDIUM", self.num_medium)?,
            num_hard: parse_var(&lookup, "QUIZ_NUM_HARD", self.num_hard)?,
            num_papers: parse_var(&lookup, "QUIZ_NUM_PAPERS", self.num_papers)?,
        })
    }

    /// 检查必填项
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("llm_api_key", &self.llm_api_key),
            ("database_name", &self.database_name),
            ("collection_name", &self.collection_name),
            ("topic", &self.topic),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingValue {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 组卷过采样倍数，小于 1 时按 1 处理
    pub fn oversample_factor(&self) -> usize {
        self.pool_oversample_factor.max(1)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, current: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(current),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value: raw,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_groq_deployment() {
        let config = Config::default();
        assert_eq!(config.database_name, "llm_questions");
        assert_eq!(config.collection_name, "llm_data");
        assert_eq!(config.store_timeout_secs, 5);
        assert_eq!(config.pool_oversample_factor, 3);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_overrides(lookup_from(&[
                ("MONGODB_URI", "mongodb://db:27017/"),
                ("GROQ_API_KEY", "gsk_test"),
                ("QUIZ_NUM_HARD", "4"),
                ("VERBOSE_LOGGING", "true"),
            ]))
            .unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://db:27017/");
        assert_eq!(config.llm_api_key, "gsk_test");
        assert_eq!(config.num_hard, 4);
        assert!(config.verbose_logging);
    }

    #[test]
    fn test_llm_api_key_takes_precedence_over_groq_key() {
        let config = Config::default()
            .with_overrides(lookup_from(&[("LLM_API_KEY", "primary"), ("GROQ_API_KEY", "fallback")]))
            .unwrap();
        assert_eq!(config.llm_api_key, "primary");
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = Config::default()
            .with_overrides(lookup_from(&[("QUIZ_NUM_EASY", "three")]))
            .unwrap_err();

        match err {
            ConfigError::EnvVarParseFailed { var_name, value, .. } => {
                assert_eq!(var_name, "QUIZ_NUM_EASY");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_toml_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            topic = "Algebra"
            num_easy = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.topic, "Algebra");
        assert_eq!(config.num_easy, 3);
        assert_eq!(config.collection_name, "llm_data");
    }

    #[test]
    fn test_validate_requires_api_key() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue { field } if field == "llm_api_key"));
    }

    #[test]
    fn test_oversample_factor_floor() {
        let config = Config {
            pool_oversample_factor: 0,
            ..Config::default()
        };
        assert_eq!(config.oversample_factor(), 1);
    }
}
