//! MAVBridge 官方插件集合
//!
//! 每个插件负责一组 MAVLink 消息到输出消息的翻译。

pub mod ekf_status;

pub use crate::ekf_status::EkfStatusPlugin;

// 预导出
pub mod prelude {
    pub use crate::ekf_status::{EkfStatusPlugin, translate};
}
