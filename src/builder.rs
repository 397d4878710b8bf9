//! 桥接器构建器
//!
//! 用最少的样板代码组装并初始化一个 [`App`]。

use crate::Result;
use mavbridge_config::BridgeConfig;
use mavbridge_core::{App, Bus, Plugin};
use mavbridge_protocol::Clock;
use std::path::Path;
use std::sync::Arc;

/// 桥接器构建器
///
/// # Example
///
/// ```rust,no_run,ignore
/// use mavbridge::Bridge;
///
/// let app = Bridge::new().with_default_plugins().build()?;
/// let rx = app.bus().unwrap().subscribe("ekf_status/ekf_status")?;
/// ```
pub struct Bridge {
    config: BridgeConfig,
    plugins: Vec<Box<dyn Plugin>>,
    bus: Option<Arc<Bus>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Bridge {
    /// 使用默认配置创建构建器
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
            plugins: Vec::new(),
            bus: None,
            clock: None,
        }
    }

    /// 从配置文件创建构建器，环境变量覆盖文件中的值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = BridgeConfig::from_file_with_env(path)?;
        Ok(Self::new().config(config))
    }

    /// 设置配置
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// 添加插件
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// 添加官方插件
    #[cfg(feature = "plugins")]
    pub fn with_default_plugins(self) -> Self {
        self.plugin(mavbridge_plugins::EkfStatusPlugin::new())
    }

    /// 使用外部总线
    pub fn bus(mut self, bus: Arc<Bus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// 使用指定时钟生成接收时间戳
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 组装并初始化应用
    ///
    /// 返回的 [`App`] 已初始化，可以直接分发消息。
    pub fn build(self) -> Result<App> {
        let mut app = App::new().set_config(self.config);
        if let Some(bus) = self.bus {
            app = app.set_bus(bus);
        }
        if let Some(clock) = self.clock {
            app = app.set_clock(clock);
        }
        for plugin in self.plugins {
            app = app.add_boxed_plugin(plugin)?;
        }

        app.initialize()?;
        tracing::info!(
            version = crate::VERSION,
            plugins = ?app.active_plugins(),
            "MAVBridge 初始化完成"
        );
        Ok(app)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use mavbridge_core::BridgeError;

    #[test]
    fn test_build_without_plugins() {
        let app = Bridge::new().build().unwrap();
        assert!(app.is_initialized());
        assert!(app.active_plugins().is_empty());
    }

    #[test]
    fn test_build_uses_external_bus() {
        let bus = Arc::new(Bus::default());
        let app = Bridge::new().bus(Arc::clone(&bus)).build().unwrap();
        assert!(Arc::ptr_eq(app.bus().unwrap(), &bus));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = BridgeConfig::default();
        config.ekf_status.queue_size = 0;
        let result = Bridge::new().config(config).build();
        assert!(matches!(result, Err(Error::Core(BridgeError::Config(_)))));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            Bridge::from_file("/nonexistent/mavbridge.toml"),
            Err(Error::Config(_))
        ));
    }

    #[cfg(feature = "plugins")]
    #[test]
    fn test_default_plugins() {
        let app = Bridge::new().with_default_plugins().build().unwrap();
        assert_eq!(app.active_plugins(), &["ekf_status".to_string()]);
        assert_eq!(
            app.bus().unwrap().topics(),
            vec!["ekf_status/ekf_status".to_string()]
        );
    }
}
