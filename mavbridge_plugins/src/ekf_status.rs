//! EKF 状态插件
//!
//! 把飞控发来的 EKF_STATUS_REPORT（ardupilotmega 方言）翻译为 [`EkfStatus`] 并发布到总线。
//! 消息已由传输层解码，这里只做逐字段的结构转换，不换算单位。

use mavbridge_core::{
    BridgeError, DispatchOutcome, ErrorContext, Plugin, PluginContext, Publisher, Result,
};
use mavbridge_protocol::{
    Clock, DecodedMessage, EkfStatus, EkfStatusReport, Header, MessageHeader, MessageKind,
    OutgoingMessage, Stamp,
};
use mavbridge_router::{DispatchSnapshot, Dispatcher, HandlerRegistry};
use std::sync::Arc;

/// 插件名称
pub const NAME: &str = "ekf_status";

/// 翻译一条 EKF 状态报告
///
/// 纯函数：时间戳由调用方给出（接收时刻），其余字段原样复制。
pub fn translate(report: &EkfStatusReport, stamp: Stamp, frame_id: &str) -> EkfStatus {
    EkfStatus {
        header: Some(Header::new(stamp, frame_id)),
        velocity_variance: report.velocity_variance,
        pos_horiz_variance: report.pos_horiz_variance,
        pos_vert_variance: report.pos_vert_variance,
        compass_variance: report.compass_variance,
        terrain_alt_variance: report.terrain_alt_variance,
        airspeed_variance: report.airspeed_variance,
    }
}

/// 初始化后的运行状态
struct Ready {
    dispatcher: Dispatcher,
    publisher: Arc<Publisher>,
}

/// EKF 状态插件
///
/// `new()` 得到未初始化的实例，宿主调用 [`Plugin::initialize`] 后才接受消息。
#[derive(Default)]
pub struct EkfStatusPlugin {
    state: Option<Ready>,
}

impl EkfStatusPlugin {
    /// 创建未初始化的插件
    pub fn new() -> Self {
        Self { state: None }
    }

    /// 输出话题名，未初始化时为 None
    pub fn topic(&self) -> Option<&str> {
        self.state.as_ref().map(|ready| ready.publisher.topic())
    }

    /// 分发指标，未初始化时为 None
    pub fn metrics(&self) -> Option<DispatchSnapshot> {
        self.state
            .as_ref()
            .map(|ready| ready.dispatcher.metrics().snapshot())
    }

    /// 直接发布一条输出消息，返回收到消息的订阅者数量
    ///
    /// 未初始化时返回 [`BridgeError::NotInitialized`]。
    pub fn publish(&self, msg: OutgoingMessage) -> Result<usize> {
        let ready = self.ready()?;
        Ok(ready.publisher.publish(msg))
    }

    fn ready(&self) -> Result<&Ready> {
        self.state
            .as_ref()
            .ok_or_else(|| BridgeError::not_initialized(NAME))
    }

    fn handlers(clock: Arc<dyn Clock>, frame_id: String) -> Result<HandlerRegistry> {
        let mut registry = HandlerRegistry::new();
        registry.register_message::<EkfStatusReport, _>(
            move |_header: &MessageHeader, report: &EkfStatusReport| {
                OutgoingMessage::EkfStatus(translate(report, clock.now(), &frame_id))
            },
        )?;
        Ok(registry)
    }
}

impl Plugin for EkfStatusPlugin {
    fn initialize(&mut self, ctx: &PluginContext) -> Result<()> {
        if self.state.is_some() {
            return Err(BridgeError::already_initialized(NAME));
        }

        let config = &ctx.config().ekf_status;
        let channel = config.channel();

        let publisher = ctx
            .bus()
            .advertise(&channel, config.queue_size)
            .map_err(|e| e.with_context(ErrorContext::Topic(channel.clone())))?;
        let publisher = Arc::new(publisher);

        let registry = Self::handlers(ctx.clock(), config.frame_id.clone())?;
        let dispatcher = Dispatcher::new(registry, Arc::clone(&publisher))
            .log_unhandled(ctx.config().log_unhandled);

        tracing::info!(plugin = NAME, topic = %channel, "EKF status bridge ready");
        self.state = Some(Ready {
            dispatcher,
            publisher,
        });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn handle_message(&self, msg: &DecodedMessage) -> Result<DispatchOutcome> {
        Ok(self.ready()?.dispatcher.dispatch(msg))
    }

    fn subscribed_kinds(&self) -> Vec<MessageKind> {
        vec![MessageKind::EkfStatusReport]
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
