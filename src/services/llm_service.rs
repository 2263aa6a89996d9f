//! LLM 服务 - 业务能力层
//!
//! 只负责"给定消息列表返回一段文本"，不关心提示词内容和结果解析
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

/// 一条带角色的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// 文本生成能力
///
/// 失败直接返回错误，不重试；降级由调用方决定
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

/// LLM 服务
///
/// 进程内只创建一次，以 `Arc<dyn ChatBackend>` 共享
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
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
            max_tokens: config.llm_max_tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut request_messages = Vec::with_capacity(messages.len());
        for message in messages {
            let built = match message.role {
                ChatRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(message.content.as_str())
                        .build()?,
                ),
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(message.content.as_str())
                        .build()?,
                ),
            };
            request_messages.push(built);
        }
        Ok(request_messages)
    }
}

#[async_trait]
impl ChatBackend for LlmService {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        debug!(
            "调用 LLM API，模型: {}，消息数: {}，temperature: {}",
            self.model_name,
            messages.len(),
            temperature
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(Self::build_messages(messages)?)
            .temperature(temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            ..Config::from_env()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_build_messages_keeps_roles_and_order() {
        let messages = vec![
            ChatMessage::system("You are an expert educational content creator."),
            ChatMessage::user("Generate 3 questions"),
        ];
        let built = LlmService::build_messages(&messages).unwrap();
        assert_eq!(built.len(), 2);
        assert!(matches!(built[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(built[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_new_uses_config() {
        let config = Config {
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_tokens: 512,
            ..Config::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.model_name(), "gpt-4o-mini");
        assert_eq!(service.max_tokens, 512);
    }

    /// 测试真实 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_complete_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_complete_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let messages = vec![
            ChatMessage::system("You are a concise assistant."),
            ChatMessage::user("Reply with the single word: ready"),
        ];

        match service.complete(&messages, 0.0).await {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                println!("✅ LLM 调用成功！");
                assert!(!response.is_empty());
            }
            Err(e) => {
                println!("❌ LLM 调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }
}
