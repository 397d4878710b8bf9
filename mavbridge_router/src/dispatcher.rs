//! 分发器
//!
//! 按消息类型查找处理器，翻译后交给发布器。没有处理器的消息被静默丢弃。
//! 每条消息同步处理且至多处理一次，没有重试和缓冲。

use crate::metrics::DispatchMetrics;
use crate::registry::HandlerRegistry;
use mavbridge_core::{DispatchOutcome, MessageSink};
use mavbridge_protocol::DecodedMessage;

/// 分发器
///
/// 构造时接管处理器注册表，此后注册表不可再修改，查找无需同步。
pub struct Dispatcher {
    registry: HandlerRegistry,
    sink: Box<dyn MessageSink>,
    metrics: DispatchMetrics,
    log_unhandled: bool,
}

impl Dispatcher {
    /// 创建分发器
    pub fn new(registry: HandlerRegistry, sink: impl MessageSink + 'static) -> Self {
        Self {
            registry,
            sink: Box::new(sink),
            metrics: DispatchMetrics::new(),
            log_unhandled: false,
        }
    }

    /// 以 debug 级别记录被丢弃的消息（默认 trace）
    pub fn log_unhandled(mut self, enabled: bool) -> Self {
        self.log_unhandled = enabled;
        self
    }

    /// 分发一条消息
    pub fn dispatch(&self, msg: &DecodedMessage) -> DispatchOutcome {
        self.metrics.record_received();
        let kind = msg.kind();

        let translated = self
            .registry
            .lookup(kind)
            .and_then(|handler| handler.call(msg));

        match translated {
            Some(outgoing) => {
                tracing::debug!(
                    kind = %kind,
                    sysid = msg.header.system_id,
                    compid = msg.header.component_id,
                    "publishing {}",
                    outgoing.type_name()
                );
                self.sink.emit(outgoing);
                self.metrics.record_published();
                DispatchOutcome::Published
            }
            None => {
                if self.log_unhandled {
                    tracing::debug!(kind = %kind, "no handler, message discarded");
                } else {
                    tracing::trace!(kind = %kind, "no handler, message discarded");
                }
                self.metrics.record_discarded();
                DispatchOutcome::Discarded
            }
        }
    }

    /// 获取处理器注册表
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// 获取分发指标
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }
}
