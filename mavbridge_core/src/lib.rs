//! MAVBridge 核心运行时和插件系统
//!
//! 提供插件生命周期、进程内发布/订阅总线和分发宿主。

pub mod app;
pub mod bus;
pub mod context;
pub mod error;
pub mod plugin;

// 导出主要类型到 crate root
pub use crate::app::App;
pub use crate::bus::{Bus, MessageSink, Publisher};
pub use crate::context::PluginContext;
pub use crate::error::{BridgeError, BridgeErrorKind, ErrorContext, Result};
pub use crate::plugin::{DispatchOutcome, Plugin, PluginRegistry};

// 预导出
pub mod prelude {
    pub use crate::app::App;
    pub use crate::bus::{Bus, MessageSink, Publisher};
    pub use crate::context::PluginContext;
    pub use crate::error::{BridgeError, BridgeErrorKind, ErrorContext, Result};
    pub use crate::plugin::{DispatchOutcome, Plugin, PluginRegistry};
}
