//! 已解码消息
//!
//! 传输层交付的消息：消息头加上按类型区分的消息体。
//! 本层信任传输层，只接收已完整解码、类型正确的消息。

use crate::kind::MessageKind;
use bytes::Bytes;

/// MAVLink 消息头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// 发送方系统 ID
    pub system_id: u8,
    /// 发送方组件 ID
    pub component_id: u8,
    /// 包序号
    pub sequence: u8,
}

impl MessageHeader {
    /// 创建消息头
    pub fn new(system_id: u8, component_id: u8, sequence: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence,
        }
    }
}

/// HEARTBEAT 消息体
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Heartbeat {
    pub custom_mode: u32,
    pub mav_type: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub system_status: u8,
    pub mavlink_version: u8,
}

/// ATTITUDE 消息体
///
/// 角度单位 rad，角速度单位 rad/s。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub time_boot_ms: u32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub rollspeed: f32,
    pub pitchspeed: f32,
    pub yawspeed: f32,
}

/// EKF_STATUS_REPORT 消息体
///
/// 各字段均为 EKF 新息检验比（方差量级，非负），单位遵循协议定义，
/// 本层不做任何校验或换算。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EkfStatusReport {
    /// 速度方差
    pub velocity_variance: f32,
    /// 水平位置方差
    pub pos_horiz_variance: f32,
    /// 垂直位置方差
    pub pos_vert_variance: f32,
    /// 罗盘方差
    pub compass_variance: f32,
    /// 地形高度方差
    pub terrain_alt_variance: f32,
    /// 空速方差
    pub airspeed_variance: f32,
}

/// 按消息类型区分的消息体
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Heartbeat(Heartbeat),
    Attitude(Attitude),
    EkfStatusReport(EkfStatusReport),
    /// 未建模的消息：保留消息 ID 和原始负载
    Raw { id: u32, payload: Bytes },
}

impl MessageBody {
    /// 获取消息类型
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageBody::Heartbeat(_) => MessageKind::Heartbeat,
            MessageBody::Attitude(_) => MessageKind::Attitude,
            MessageBody::EkfStatusReport(_) => MessageKind::EkfStatusReport,
            MessageBody::Raw { id, .. } => MessageKind::from_id(*id),
        }
    }
}

/// 已解码消息
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub header: MessageHeader,
    pub body: MessageBody,
}

impl DecodedMessage {
    /// 创建已解码消息
    pub fn new(header: MessageHeader, body: impl Into<MessageBody>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// 创建未建模的原始消息
    pub fn raw(header: MessageHeader, id: u32, payload: Bytes) -> Self {
        Self {
            header,
            body: MessageBody::Raw { id, payload },
        }
    }

    /// 获取消息类型
    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    /// 获取消息头
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// 按具体类型取出消息体
    pub fn get<M: MavMessage>(&self) -> Option<&M> {
        M::extract(&self.body)
    }
}

/// 已建模的 MAVLink 消息
///
/// 把消息类型与 [`MessageBody`] 的对应变体绑定，供类型化的处理器注册使用。
pub trait MavMessage: Sized + Send + Sync + 'static {
    /// 消息类型
    const KIND: MessageKind;

    /// 从消息体中取出本类型，变体不匹配时返回 None
    fn extract(body: &MessageBody) -> Option<&Self>;
}

macro_rules! impl_mav_message {
    ($ty:ident) => {
        impl MavMessage for $ty {
            const KIND: MessageKind = MessageKind::$ty;

            fn extract(body: &MessageBody) -> Option<&Self> {
                match body {
                    MessageBody::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for MessageBody {
            fn from(inner: $ty) -> Self {
                MessageBody::$ty(inner)
            }
        }
    };
}

impl_mav_message!(Heartbeat);
impl_mav_message!(Attitude);
impl_mav_message!(EkfStatusReport);
