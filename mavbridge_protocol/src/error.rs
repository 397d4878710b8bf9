//! 协议错误类型

use thiserror::Error;

/// 协议层错误
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 编码错误
    #[error("消息编码失败: {0}")]
    Encode(#[from] prost::EncodeError),

    /// 解码错误
    #[error("消息解码失败: {0}")]
    Decode(#[from] prost::DecodeError),

    /// 未知的输出消息类型名
    #[error("未知的输出消息类型: {0}")]
    UnknownType(String),
}

/// 协议 Result 类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
