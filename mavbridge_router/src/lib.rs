//! MAVBridge 消息路由
//!
//! 提供消息类型到处理器的注册表，以及按类型分发并发布的分发器。

pub mod dispatcher;
pub mod metrics;
pub mod registry;

pub use crate::dispatcher::Dispatcher;
pub use crate::metrics::{DispatchMetrics, DispatchSnapshot};
pub use crate::registry::{Handler, HandlerRegistry};

// 重新导出错误类型
pub use mavbridge_core::{BridgeError, Result};

// 预导出
pub mod prelude {
    pub use crate::dispatcher::Dispatcher;
    pub use crate::registry::{Handler, HandlerRegistry};
    pub use mavbridge_core::{BridgeError, DispatchOutcome, Result};
}
