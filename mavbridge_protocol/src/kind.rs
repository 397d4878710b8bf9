//! 消息类型标识
//!
//! MAVLink 消息 ID 到封闭枚举的映射。

use std::fmt;

/// 消息类型
///
/// 每个变体对应一个 MAVLink 消息 ID。未建模的 ID 落入 [`MessageKind::Other`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// HEARTBEAT (#0)
    Heartbeat,
    /// ATTITUDE (#30)
    Attitude,
    /// EKF_STATUS_REPORT (#193, ardupilotmega 方言)
    EkfStatusReport,
    /// 未建模的消息 ID
    Other(u32),
}

impl MessageKind {
    pub const HEARTBEAT_ID: u32 = 0;
    pub const ATTITUDE_ID: u32 = 30;
    pub const EKF_STATUS_REPORT_ID: u32 = 193;

    /// 获取 MAVLink 消息 ID
    pub fn id(self) -> u32 {
        match self {
            MessageKind::Heartbeat => Self::HEARTBEAT_ID,
            MessageKind::Attitude => Self::ATTITUDE_ID,
            MessageKind::EkfStatusReport => Self::EKF_STATUS_REPORT_ID,
            MessageKind::Other(id) => id,
        }
    }

    /// 从 MAVLink 消息 ID 构造
    ///
    /// 已建模的 ID 总是映射到具名变体，因此 `Other` 永远不会携带已建模的 ID。
    pub fn from_id(id: u32) -> Self {
        match id {
            Self::HEARTBEAT_ID => MessageKind::Heartbeat,
            Self::ATTITUDE_ID => MessageKind::Attitude,
            Self::EKF_STATUS_REPORT_ID => MessageKind::EkfStatusReport,
            other => MessageKind::Other(other),
        }
    }

    /// 规范形式
    ///
    /// 携带已建模 ID 的 `Other`（如 `Other(193)`）映射回具名变体。
    pub fn canonical(self) -> Self {
        Self::from_id(self.id())
    }

    /// 获取 MAVLink 消息名
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Heartbeat => "HEARTBEAT",
            MessageKind::Attitude => "ATTITUDE",
            MessageKind::EkfStatusReport => "EKF_STATUS_REPORT",
            MessageKind::Other(_) => "UNKNOWN",
        }
    }
}

impl From<u32> for MessageKind {
    fn from(id: u32) -> Self {
        MessageKind::from_id(id)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(#{})", self.name(), self.id())
    }
}
