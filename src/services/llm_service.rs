//! LLM 服务 - 业务能力层
//!
//! 只负责"调用一次 LLM"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Groq, Azure 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 题目生成服务
///
/// 测试中可以用固定响应替换真实的 LLM
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// 发送一次请求，要求返回 JSON
    async fn generate_json(&self, system_message: &str, user_message: &str)
        -> Result<String, LlmError>;

    /// 连通性检查，返回模型的回复
    async fn ping(&self) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成题目
/// - 不解析题目内容
/// - 不关心难度顺序和入库
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `json_output`: 是否要求以 JSON 对象格式返回
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    ///
    /// # 示例
    /// ```no_run
    /// # use quiz_paper::services::LlmService;
    /// # async fn example(service: &LlmService) -> Result<(), quiz_paper::error::LlmError> {
    /// let response = service
    ///     .send_to_llm("Can you confirm the API is working?", Some("You are a helpful assistant."), false)
    ///     .await?;
    /// println!("LLM 响应: {}", response);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        json_output: bool,
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let mut request_args = CreateChatCompletionRequestArgs::default();
        request_args
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);
        if json_output {
            request_args.response_format(ResponseFormat::JsonObject);
        }
        let request = request_args
            .build()
            .map_err(|e| LlmError::api_call_failed(&self.model_name, e))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl GenerationService for LlmService {
    async fn generate_json(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        self.send_to_llm(user_message, Some(system_message), true).await
    }

    async fn ping(&self) -> Result<String, LlmError> {
        self.send_to_llm(
            "Can you confirm the API is working?",
            Some("You are a helpful assistant."),
            false,
        )
        .await
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的 LlmService（从环境变量读取密钥）
    fn create_test_service() -> LlmService {
        let config = Config::from_env().expect("环境变量格式错误");
        LlmService::new(&config)
    }

    #[test]
    fn test_service_uses_configured_model() {
        let config = Config {
            llm_model_name: "mixtral-8x7b-32768".to_string(),
            ..Config::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.model_name(), "mixtral-8x7b-32768");
    }

    /// 测试 LLM API 连通性
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_llm_ping -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_llm_ping() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        match service.ping().await {
            Ok(response) => {
                println!("✅ LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }

    /// 测试 JSON 模式返回合法 JSON
    #[tokio::test]
    #[ignore]
    async fn test_llm_json_mode() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let response = service
            .generate_json(
                "You are a helpful assistant.",
                r#"Return a JSON object of the form {"ok": true}."#,
            )
            .await
            .expect("LLM 调用失败");

        let value: serde_json::Value = serde_json::from_str(&response).expect("返回内容不是 JSON");
        assert!(value.is_object());
    }
}
