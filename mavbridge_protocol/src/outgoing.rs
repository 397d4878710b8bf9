//! 输出消息
//!
//! 发布到总线上的领域消息。每种输出消息都是 Protobuf 消息，
//! 网络总线可以直接序列化转发。

use crate::error::{ProtocolError, Result};
use crate::time::Stamp;
use bytes::Bytes;

/// 输出消息头
#[derive(Clone, PartialEq, prost::Message)]
pub struct Header {
    /// 接收时间戳（秒）
    #[prost(int64, tag = "1")]
    pub stamp_sec: i64,
    /// 接收时间戳（纳秒部分）
    #[prost(uint32, tag = "2")]
    pub stamp_nanosec: u32,
    /// 坐标系 ID
    #[prost(string, tag = "3")]
    pub frame_id: String,
}

impl Header {
    /// 创建消息头
    pub fn new(stamp: Stamp, frame_id: impl Into<String>) -> Self {
        Self {
            stamp_sec: stamp.sec,
            stamp_nanosec: stamp.nanosec,
            frame_id: frame_id.into(),
        }
    }

    /// 获取时间戳
    pub fn stamp(&self) -> Stamp {
        Stamp::new(self.stamp_sec, self.stamp_nanosec)
    }
}

/// EKF 状态
///
/// 字段与 EKF_STATUS_REPORT 一一对应，单位不变。
#[derive(Clone, PartialEq, prost::Message)]
pub struct EkfStatus {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,
    #[prost(float, tag = "2")]
    pub velocity_variance: f32,
    #[prost(float, tag = "3")]
    pub pos_horiz_variance: f32,
    #[prost(float, tag = "4")]
    pub pos_vert_variance: f32,
    #[prost(float, tag = "5")]
    pub compass_variance: f32,
    #[prost(float, tag = "6")]
    pub terrain_alt_variance: f32,
    #[prost(float, tag = "7")]
    pub airspeed_variance: f32,
}

impl EkfStatus {
    pub const TYPE_NAME: &'static str = "mavbridge_msgs/EkfStatus";
}

/// 输出消息
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingMessage {
    EkfStatus(EkfStatus),
}

impl OutgoingMessage {
    /// 获取输出消息类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            OutgoingMessage::EkfStatus(_) => EkfStatus::TYPE_NAME,
        }
    }

    /// 获取消息头
    pub fn header(&self) -> Option<&Header> {
        match self {
            OutgoingMessage::EkfStatus(msg) => msg.header.as_ref(),
        }
    }

    /// 编码为 Protobuf 字节
    pub fn encode_to_bytes(&self) -> Result<Bytes> {
        match self {
            OutgoingMessage::EkfStatus(msg) => encode_message(msg),
        }
    }

    /// 按类型名从 Protobuf 字节解码
    pub fn decode(type_name: &str, data: Bytes) -> Result<Self> {
        match type_name {
            EkfStatus::TYPE_NAME => decode_message(data).map(OutgoingMessage::EkfStatus),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

impl From<EkfStatus> for OutgoingMessage {
    fn from(msg: EkfStatus) -> Self {
        OutgoingMessage::EkfStatus(msg)
    }
}

/// 编码 Protobuf 消息
///
/// 将任意实现了 prost::Message 的类型编码为 Bytes
pub fn encode_message<M: prost::Message>(msg: &M) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(msg.encoded_len());
    msg.encode(&mut buf)?;
    Ok(Bytes::from(buf))
}

/// 解码 Protobuf 消息
///
/// 从 Bytes 解码为指定的消息类型
pub fn decode_message<M: prost::Message + Default>(data: Bytes) -> Result<M> {
    M::decode(data).map_err(ProtocolError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> EkfStatus {
        EkfStatus {
            header: Some(Header::new(Stamp::new(1_700_000_000, 5), "base_link")),
            velocity_variance: 0.1,
            pos_horiz_variance: 0.2,
            pos_vert_variance: 0.3,
            compass_variance: 0.4,
            terrain_alt_variance: 0.5,
            airspeed_variance: 0.6,
        }
    }

    #[test]
    fn test_header_stamp() {
        let header = Header::new(Stamp::new(10, 20), "map");
        assert_eq!(header.stamp(), Stamp::new(10, 20));
        assert_eq!(header.frame_id, "map");
    }

    #[test]
    fn test_encode_decode() {
        let msg = OutgoingMessage::from(status());
        let encoded = msg.encode_to_bytes().unwrap();
        assert!(!encoded.is_empty());

        let decoded = OutgoingMessage::decode(msg.type_name(), encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_decode_unknown_type() {
        let result = OutgoingMessage::decode("mavbridge_msgs/Nope", Bytes::new());
        assert!(matches!(result, Err(ProtocolError::UnknownType(_))));
    }

    #[test]
    fn test_decode_garbage() {
        let result: Result<EkfStatus> = decode_message(Bytes::from_static(&[0x0a, 0xff]));
        assert!(result.is_err());
    }
}
