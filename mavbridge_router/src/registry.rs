//! 处理器注册表
//!
//! 消息类型到翻译函数的映射。只在插件初始化阶段填充，
//! 之后整体移交给 [`Dispatcher`](crate::Dispatcher)，不再变化。

use mavbridge_core::{BridgeError, Result};
use mavbridge_protocol::{DecodedMessage, MavMessage, MessageHeader, MessageKind, OutgoingMessage};
use std::collections::HashMap;

/// 处理器 trait
///
/// 把一条已解码消息翻译为输出消息。消息体与注册的类型不符时返回 None。
pub trait Handler: Send + Sync + 'static {
    fn call(&self, msg: &DecodedMessage) -> Option<OutgoingMessage>;
}

/// 用于函数指针和闭包的处理器实现
impl<F> Handler for F
where
    F: Fn(&DecodedMessage) -> Option<OutgoingMessage> + Send + Sync + 'static,
{
    fn call(&self, msg: &DecodedMessage) -> Option<OutgoingMessage> {
        self(msg)
    }
}

/// 处理器注册表
///
/// 每个消息 ID 至多一个处理器，重复注册返回路由错误。
/// 键总是规范形式，`Other(193)` 与 `EkfStatusReport` 是同一个键。
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 注册处理器
    pub fn register<H>(&mut self, kind: MessageKind, handler: H) -> Result<&mut Self>
    where
        H: Handler,
    {
        let kind = kind.canonical();
        if self.handlers.contains_key(&kind) {
            return Err(BridgeError::router(format!("处理器已存在: {}", kind)));
        }
        self.handlers.insert(kind, Box::new(handler));
        Ok(self)
    }

    /// 按消息类型注册类型化的处理器
    ///
    /// 处理器直接收到消息头和对应变体的字段。
    pub fn register_message<M, F>(&mut self, handler: F) -> Result<&mut Self>
    where
        M: MavMessage,
        F: Fn(&MessageHeader, &M) -> OutgoingMessage + Send + Sync + 'static,
    {
        self.register(M::KIND, move |msg: &DecodedMessage| {
            msg.get::<M>().map(|body| handler(&msg.header, body))
        })
    }

    /// 查找处理器
    pub fn lookup(&self, kind: MessageKind) -> Option<&dyn Handler> {
        self.handlers
            .get(&kind.canonical())
            .map(|handler| handler.as_ref())
    }

    /// 是否已注册
    pub fn contains(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind.canonical())
    }

    /// 已注册的处理器数量
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 所有已注册的消息类型（按消息 ID 排序）
    pub fn kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<MessageKind> = self.handlers.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.id());
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavbridge_protocol::{EkfStatus, EkfStatusReport, Heartbeat};

    fn to_status(_header: &MessageHeader, report: &EkfStatusReport) -> OutgoingMessage {
        OutgoingMessage::EkfStatus(EkfStatus {
            header: None,
            velocity_variance: report.velocity_variance,
            ..Default::default()
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register_message::<EkfStatusReport, _>(to_status).unwrap();

        assert!(registry.contains(MessageKind::EkfStatusReport));
        assert!(registry.lookup(MessageKind::EkfStatusReport).is_some());
        assert!(registry.lookup(MessageKind::Heartbeat).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_handler_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register_message::<EkfStatusReport, _>(to_status).unwrap();

        let result = registry.register(
            MessageKind::EkfStatusReport,
            |_: &DecodedMessage| -> Option<OutgoingMessage> { None },
        );
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);

        // 保留的是第一次注册的处理器
        let msg = DecodedMessage::new(
            MessageHeader::default(),
            EkfStatusReport {
                velocity_variance: 0.7,
                ..Default::default()
            },
        );
        let handler = registry.lookup(MessageKind::EkfStatusReport).unwrap();
        assert!(handler.call(&msg).is_some());
    }

    #[test]
    fn test_alias_kind_counts_as_duplicate() {
        let mut registry = HandlerRegistry::new();
        registry.register_message::<EkfStatusReport, _>(to_status).unwrap();

        let result = registry.register(
            MessageKind::Other(MessageKind::EKF_STATUS_REPORT_ID),
            |_: &DecodedMessage| -> Option<OutgoingMessage> { None },
        );
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(MessageKind::Other(193)));
        assert!(registry.lookup(MessageKind::Other(193)).is_some());
    }

    #[test]
    fn test_alias_kind_registers_under_canonical_key() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                MessageKind::Other(MessageKind::HEARTBEAT_ID),
                |_: &DecodedMessage| -> Option<OutgoingMessage> { None },
            )
            .unwrap();
        assert_eq!(registry.kinds(), vec![MessageKind::Heartbeat]);
    }

    #[test]
    fn test_typed_handler_ignores_mismatched_body() {
        let mut registry = HandlerRegistry::new();
        registry.register_message::<EkfStatusReport, _>(to_status).unwrap();

        let raw = DecodedMessage::raw(
            MessageHeader::default(),
            MessageKind::EKF_STATUS_REPORT_ID,
            bytes::Bytes::new(),
        );
        let handler = registry.lookup(raw.kind()).unwrap();
        assert!(handler.call(&raw).is_none());
    }

    #[test]
    fn test_kinds_sorted_by_id() {
        let mut registry = HandlerRegistry::new();
        registry
            .register_message::<EkfStatusReport, _>(to_status)
            .unwrap()
            .register_message::<Heartbeat, _>(|_, _| {
                OutgoingMessage::EkfStatus(EkfStatus::default())
            })
            .unwrap();

        assert_eq!(
            registry.kinds(),
            vec![MessageKind::Heartbeat, MessageKind::EkfStatusReport]
        );
    }
}
