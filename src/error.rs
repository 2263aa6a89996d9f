use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档解析错误
    #[error("文档解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 内容分析错误
    #[error("内容分析错误: {0}")]
    Analysis(#[from] AnalysisError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 存储 / 复习调度 / 进度跟踪错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 不支持的文件类型
    #[error("Unsupported file type: {file_type}")]
    UnsupportedFileType { file_type: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// PDF 内容提取失败
    #[error("PDF解析失败 ({path}): {source}")]
    PdfExtractFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// DOCX 内容提取失败
    #[error("DOCX解析失败 ({path}): {message}")]
    DocxFailed { path: String, message: String },
}

/// 内容分析错误
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// NLP 引擎处理失败
    #[error("NLP处理失败: {message}")]
    NlpFailed { message: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
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
    /// 返回内容不是期望的 JSON 结构
    #[error("LLM返回内容无法解析为{expected}: {detail}")]
    MalformedResponse {
        expected: &'static str,
        detail: String,
    },
}

/// 存储协作方错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 记录不存在
    #[error("{kind} 不存在: {id}")]
    NotFound { kind: &'static str, id: String },
    /// 存储不可用
    #[error("存储不可用: {message}")]
    Unavailable { message: String },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 测验没有题目，无法计分
    #[error("测验 {quiz_id} 没有题目，无法计分")]
    EmptyQuiz { quiz_id: String },
    /// 输入目录不存在
    #[error("目录不存在: {path}")]
    FolderNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件 TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建不支持的文件类型错误
    pub fn unsupported_file_type(file_type: impl Into<String>) -> Self {
        AppError::Parse(ParseError::UnsupportedFileType {
            file_type: file_type.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Parse(ParseError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM响应格式错误
    pub fn malformed_response(expected: &'static str, detail: impl Into<String>) -> Self {
        AppError::Llm(LlmError::MalformedResponse {
            expected,
            detail: detail.into(),
        })
    }

    /// 创建记录不存在错误
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::Storage(StorageError::NotFound {
            kind,
            id: id.into(),
        })
    }

    /// 创建存储不可用错误（锁中毒等）
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        AppError::Storage(StorageError::Unavailable {
            message: message.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
