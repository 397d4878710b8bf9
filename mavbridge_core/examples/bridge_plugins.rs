//! 插件系统示例
//!
//! 演示自定义插件与官方 EKF 状态插件一起运行。

use mavbridge_core::{App, BridgeError, DispatchOutcome, Plugin, PluginContext, Result};
use mavbridge_plugins::EkfStatusPlugin;
use mavbridge_protocol::{DecodedMessage, EkfStatusReport, Heartbeat, MessageHeader, MessageKind};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// 统计心跳的插件，依赖 EKF 状态插件
#[derive(Default)]
struct HeartbeatMonitor {
    ready: bool,
    seen: AtomicU64,
}

impl Plugin for HeartbeatMonitor {
    fn initialize(&mut self, _ctx: &PluginContext) -> Result<()> {
        if self.ready {
            return Err(BridgeError::already_initialized(self.name()));
        }
        self.ready = true;
        println!("HeartbeatMonitor 初始化");
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.ready
    }

    fn handle_message(&self, msg: &DecodedMessage) -> Result<DispatchOutcome> {
        if msg.get::<Heartbeat>().is_some() {
            self.seen.fetch_add(1, Ordering::Relaxed);
        }
        Ok(DispatchOutcome::Discarded)
    }

    fn subscribed_kinds(&self) -> Vec<MessageKind> {
        vec![MessageKind::Heartbeat]
    }

    fn name(&self) -> &'static str {
        "heartbeat_monitor"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["ekf_status"]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== MAVBridge 插件系统示例 ===\n");

    // 依赖方先注册，初始化时仍排在依赖之后
    let mut app = App::new()
        .add_plugin(HeartbeatMonitor::default())?
        .add_plugin(EkfStatusPlugin::new())?;
    app.initialize()?;

    println!("已初始化插件: {:?}", app.active_plugins());
    println!("处理的消息类型: {:?}\n", app.subscribed_kinds());

    let bus = app
        .bus()
        .cloned()
        .ok_or_else(|| BridgeError::not_initialized("bus"))?;
    let mut rx = bus.subscribe("ekf_status/ekf_status")?;

    let (tx, transport) = mpsc::channel(8);
    let header = MessageHeader::new(1, 1, 0);
    tx.send(DecodedMessage::new(header, Heartbeat::default()))
        .await
        .map_err(|e| BridgeError::bus(e.to_string()))?;
    tx.send(DecodedMessage::new(
        header,
        EkfStatusReport {
            velocity_variance: 0.1,
            pos_horiz_variance: 0.2,
            ..Default::default()
        },
    ))
    .await
    .map_err(|e| BridgeError::bus(e.to_string()))?;
    drop(tx);

    let processed = app.run(transport).await?;
    println!("处理消息数: {}", processed);

    while let Ok(msg) = rx.try_recv() {
        println!("收到 {}: {:?}", msg.type_name(), msg);
    }

    Ok(())
}
