//! 学习会话上下文
//!
//! 封装"谁在学哪份文档"这一信息

use std::fmt::Display;

/// 学习会话上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCtx {
    /// 学习者ID
    pub user_id: String,

    /// 文档ID（命令行模式下为文件名）
    pub document_id: String,
}

impl SessionCtx {
    pub fn new(user_id: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            document_id: document_id.into(),
        }
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[学习者#{} 文档#{}]", self.user_id, self.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = SessionCtx::new("u-1", "cells.pdf");
        assert_eq!(ctx.to_string(), "[学习者#u-1 文档#cells.pdf]");
    }
}
