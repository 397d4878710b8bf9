//! # MAVBridge - MAVLink 遥测桥接器
//!
//! 把传输层解码好的 MAVLink 消息按类型交给翻译函数，
//! 翻译结果带上接收时间戳后发布到进程内的发布/订阅总线。
//!
//! ## 快速开始
//!
//! ```rust,no_run,ignore
//! use mavbridge::Bridge;
//!
//! #[tokio::main]
//! async fn main() -> mavbridge::Result<()> {
//!     let app = Bridge::from_file("mavbridge.toml")?
//!         .with_default_plugins()
//!         .build()?;
//!
//!     let mut rx = app.bus().unwrap().subscribe("ekf_status/ekf_status")?;
//!     let (tx, transport) = tokio::sync::mpsc::channel(64);
//!     // 传输层把解码后的消息写入 tx
//!     app.run(transport).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## 模块组织
//!
//! - `mavbridge_config` - 配置加载与校验
//! - `mavbridge_protocol` - 消息类型、时间戳、输出消息编解码
//! - `mavbridge_core` - 插件生命周期、总线、分发宿主
//! - `mavbridge_router` - 处理器注册表与分发器
//! - `mavbridge_plugins` - 官方插件（EKF 状态）

mod builder;

pub use crate::builder::Bridge;

pub use mavbridge_config;
pub use mavbridge_core;
pub use mavbridge_protocol;
pub use mavbridge_router;

#[cfg(feature = "plugins")]
pub use mavbridge_plugins;

/// 预导出常用类型
///
/// 通过 `use mavbridge::prelude::*;` 导入所有常用类型
pub mod prelude {
    pub use crate::builder::Bridge;

    pub use mavbridge_config::{BridgeConfig, ConfigError};
    pub use mavbridge_core::prelude::*;
    pub use mavbridge_protocol::prelude::*;
    pub use mavbridge_router::prelude::*;

    #[cfg(feature = "plugins")]
    pub use mavbridge_plugins::prelude::*;
}

/// MAVBridge 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// MAVBridge 统一错误枚举
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 核心错误
    #[error(transparent)]
    Core(#[from] mavbridge_core::BridgeError),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] mavbridge_config::ConfigError),

    /// 协议错误
    #[error(transparent)]
    Protocol(#[from] mavbridge_protocol::ProtocolError),

    /// IO 错误
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// MAVBridge 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MAVBridge 包名
pub const NAME: &str = env!("CARGO_PKG_NAME");
