//! MAVBridge 框架核心错误类型
//!
//! 定义所有框架级别的错误类型。

use super::context::ErrorContext;
use mavbridge_config::ConfigError;
use mavbridge_protocol::ProtocolError;
use std::io;
use thiserror::Error;

/// MAVBridge 框架核心错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 协议错误
    #[error("协议错误: {0}")]
    Protocol(#[from] ProtocolError),

    /// 路由错误
    #[error("路由错误: {0}")]
    Router(String),

    /// 插件错误
    #[error("插件错误: {0}")]
    Plugin(String),

    /// 总线错误
    #[error("总线错误: {0}")]
    Bus(String),

    /// 在初始化完成前使用
    #[error("尚未初始化: {0}")]
    NotInitialized(String),

    /// 重复初始化
    #[error("重复初始化: {0}")]
    AlreadyInitialized(String),

    /// 初始化曾经失败，宿主不可再用
    #[error("初始化已失败: {0}")]
    InitializationFailed(String),

    /// 带上下文的错误
    #[error("{0} ({1})")]
    WithContext(#[source] Box<BridgeError>, ErrorContext),
}

impl BridgeError {
    /// 获取错误类型
    ///
    /// 带上下文的错误返回内部错误的类型。
    pub fn kind(&self) -> BridgeErrorKind {
        match self {
            BridgeError::Io(_) => BridgeErrorKind::Io,
            BridgeError::Config(_) => BridgeErrorKind::Config,
            BridgeError::Protocol(_) => BridgeErrorKind::Protocol,
            BridgeError::Router(_) => BridgeErrorKind::Router,
            BridgeError::Plugin(_) => BridgeErrorKind::Plugin,
            BridgeError::Bus(_) => BridgeErrorKind::Bus,
            BridgeError::NotInitialized(_) => BridgeErrorKind::NotInitialized,
            BridgeError::AlreadyInitialized(_) => BridgeErrorKind::AlreadyInitialized,
            BridgeError::InitializationFailed(_) => BridgeErrorKind::InitializationFailed,
            BridgeError::WithContext(inner, _) => inner.kind(),
        }
    }

    /// 添加上下文信息
    pub fn with_context<C>(self, context: C) -> Self
    where
        C: Into<ErrorContext>,
    {
        BridgeError::WithContext(Box::new(self), context.into())
    }

    /// 创建路由错误
    pub fn router(msg: impl Into<String>) -> Self {
        BridgeError::Router(msg.into())
    }

    /// 创建插件错误
    pub fn plugin(msg: impl Into<String>) -> Self {
        BridgeError::Plugin(msg.into())
    }

    /// 创建总线错误
    pub fn bus(msg: impl Into<String>) -> Self {
        BridgeError::Bus(msg.into())
    }

    /// 创建未初始化错误
    pub fn not_initialized(what: impl Into<String>) -> Self {
        BridgeError::NotInitialized(what.into())
    }

    /// 创建重复初始化错误
    pub fn already_initialized(what: impl Into<String>) -> Self {
        BridgeError::AlreadyInitialized(what.into())
    }

    /// 创建初始化失败错误
    pub fn initialization_failed(what: impl Into<String>) -> Self {
        BridgeError::InitializationFailed(what.into())
    }

    /// 是否为生命周期误用（未初始化或重复初始化）
    pub fn is_lifecycle_violation(&self) -> bool {
        matches!(
            self.kind(),
            BridgeErrorKind::NotInitialized | BridgeErrorKind::AlreadyInitialized
        )
    }
}

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeErrorKind {
    /// IO 错误
    Io,
    /// 配置错误
    Config,
    /// 协议错误
    Protocol,
    /// 路由错误
    Router,
    /// 插件错误
    Plugin,
    /// 总线错误
    Bus,
    /// 未初始化
    NotInitialized,
    /// 重复初始化
    AlreadyInitialized,
    /// 初始化已失败
    InitializationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavbridge_protocol::MessageKind;

    #[test]
    fn test_error_creation() {
        let err = BridgeError::router("duplicate handler");
        assert!(matches!(err, BridgeError::Router(_)));
        assert_eq!(err.kind(), BridgeErrorKind::Router);
    }

    #[test]
    fn test_error_with_context_keeps_kind() {
        let err = BridgeError::router("duplicate handler")
            .with_context(MessageKind::EkfStatusReport);
        assert!(matches!(err, BridgeError::WithContext(_, _)));
        assert_eq!(err.kind(), BridgeErrorKind::Router);
        assert_eq!(
            err.to_string(),
            "路由错误: duplicate handler (message: EKF_STATUS_REPORT(#193))"
        );
    }

    #[test]
    fn test_lifecycle_violation() {
        assert!(BridgeError::not_initialized("ekf_status").is_lifecycle_violation());
        assert!(BridgeError::already_initialized("app").is_lifecycle_violation());
        assert!(!BridgeError::bus("closed").is_lifecycle_violation());
        assert_eq!(
            BridgeError::initialization_failed("App").kind(),
            BridgeErrorKind::InitializationFailed
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: BridgeError = ConfigError::Validation("bad".into()).into();
        assert_eq!(err.kind(), BridgeErrorKind::Config);
    }
}
