//! 错误上下文
//!
//! 为错误附加插件名、消息类型等定位信息。

use mavbridge_protocol::MessageKind;
use std::fmt;

/// 错误上下文信息
#[derive(Debug, Clone)]
pub enum ErrorContext {
    /// 出错的插件
    Plugin(&'static str),
    /// 相关的消息类型
    Kind(MessageKind),
    /// 相关的总线话题
    Topic(String),
    /// 自定义上下文
    Custom(String),
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::Plugin(name) => write!(f, "plugin: {}", name),
            ErrorContext::Kind(kind) => write!(f, "message: {}", kind),
            ErrorContext::Topic(topic) => write!(f, "topic: {}", topic),
            ErrorContext::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<MessageKind> for ErrorContext {
    fn from(kind: MessageKind) -> Self {
        ErrorContext::Kind(kind)
    }
}

impl From<String> for ErrorContext {
    fn from(msg: String) -> Self {
        ErrorContext::Custom(msg)
    }
}

impl From<&str> for ErrorContext {
    fn from(msg: &str) -> Self {
        ErrorContext::Custom(msg.to_string())
    }
}
