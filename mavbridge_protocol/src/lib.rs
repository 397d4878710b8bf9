//! MAVBridge 协议类型
//!
//! 定义 MAVLink 消息类型标识、传输层产出的已解码消息，
//! 以及发布到总线上的输出消息。

pub mod error;
pub mod kind;
pub mod message;
pub mod outgoing;
pub mod time;

pub use crate::error::{ProtocolError, Result};
pub use crate::kind::MessageKind;
pub use crate::message::{
    Attitude, DecodedMessage, EkfStatusReport, Heartbeat, MavMessage, MessageBody, MessageHeader,
};
pub use crate::outgoing::{EkfStatus, Header, OutgoingMessage, decode_message, encode_message};
pub use crate::time::{Clock, FixedClock, Stamp, SystemClock};

// 预导出
pub mod prelude {
    pub use crate::kind::MessageKind;
    pub use crate::message::{DecodedMessage, MavMessage, MessageBody, MessageHeader};
    pub use crate::outgoing::OutgoingMessage;
    pub use crate::time::{Clock, Stamp};
}
