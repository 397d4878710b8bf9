//! 插件初始化上下文
//!
//! 宿主在初始化阶段传给每个插件的共享资源。

use crate::bus::Bus;
use mavbridge_config::BridgeConfig;
use mavbridge_protocol::{Clock, SystemClock};
use std::sync::Arc;

/// 插件上下文
#[derive(Clone)]
pub struct PluginContext {
    config: Arc<BridgeConfig>,
    bus: Arc<Bus>,
    clock: Arc<dyn Clock>,
}

impl PluginContext {
    /// 创建新的上下文
    pub fn new(config: Arc<BridgeConfig>, bus: Arc<Bus>, clock: Arc<dyn Clock>) -> Self {
        Self { config, bus, clock }
    }

    /// 使用给定配置、按配置创建的总线和系统时钟
    pub fn from_config(config: BridgeConfig) -> Self {
        let bus = Arc::new(Bus::from_config(&config.bus));
        Self::new(Arc::new(config), bus, Arc::new(SystemClock))
    }

    /// 获取配置
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// 获取总线
    pub fn bus(&self) -> &Arc<Bus> {
        &self.bus
    }

    /// 获取时钟
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

impl Default for PluginContext {
    fn default() -> Self {
        Self::from_config(BridgeConfig::default())
    }
}
