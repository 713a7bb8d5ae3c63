use std::fmt;

use crate::models::Difficulty;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 题库存储错误
    Store(StoreError),
    /// LLM 服务错误
    Llm(LlmError),
    /// 组卷错误
    Paper(PaperError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "存储错误: {}", e),
            AppError::Llm(e) => write!(f, "LLM错误: {}", e),
            AppError::Paper(e) => write!(f, "组卷错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store(e) => Some(e),
            AppError::Llm(e) => Some(e),
            AppError::Paper(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 题库存储错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 无法连接数据库
    #[error("无法连接到 MongoDB ({uri}): {source}")]
    ConnectionFailed {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 数据库操作失败
    #[error("MongoDB 操作失败 ({operation}): {source}")]
    OperationFailed {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// LLM 服务错误
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容不是合法的题目 JSON
    #[error("LLM返回内容无法解析: {reason}")]
    MalformedResponse { reason: String, raw: String },
}

/// 组卷错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaperError {
    /// 题库中某个难度的题目不足
    #[error(
        "Not enough {tier} questions available for topic '{topic}'. Required: {required}, Available: {available}"
    )]
    InsufficientQuestions {
        topic: String,
        tier: Difficulty,
        required: usize,
        available: usize,
    },
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必填项为空
    #[error("配置项 {field} 不能为空")]
    MissingValue { field: String },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {reason}")]
    FileParseFailed { path: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err)
    }
}

impl From<PaperError> for AppError {
    fn from(err: PaperError) -> Self {
        AppError::Paper(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON序列化失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl StoreError {
    /// 创建连接错误
    pub fn connection_failed(
        uri: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::ConnectionFailed {
            uri: uri.into(),
            source: Box::new(source),
        }
    }

    /// 创建操作错误
    pub fn operation_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::OperationFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}

impl LlmError {
    /// 创建LLM API调用错误
    pub fn api_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// 创建响应解析错误，保留原始响应用于排查
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        LlmError::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

impl AppError {
    /// 是否为题目不足错误
    pub fn is_insufficient_questions(&self) -> bool {
        matches!(
            self,
            AppError::Paper(PaperError::InsufficientQuestions { .. })
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_questions_message_names_tier_and_counts() {
        let err = PaperError::InsufficientQuestions {
            topic: "Algebra".to_string(),
            tier: Difficulty::Hard,
            required: 1,
            available: 0,
        };
        assert_eq!(
            err.to_string(),
            "Not enough hard questions available for topic 'Algebra'. Required: 1, Available: 0"
        );
    }

    #[test]
    fn test_app_error_wraps_paper_error() {
        let err: AppError = PaperError::InsufficientQuestions {
            topic: "T".to_string(),
            tier: Difficulty::Easy,
            required: 2,
            available: 1,
        }
        .into();

        assert!(err.is_insufficient_questions());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("组卷错误"));
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "server selection timeout");
        let err = StoreError::connection_failed("mongodb://localhost:27017/", io);
        assert!(err.to_string().contains("server selection timeout"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
