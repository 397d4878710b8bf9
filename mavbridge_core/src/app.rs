//! 应用宿主
//!
//! 持有插件、总线和时钟，负责初始化插件并把传输层交付的消息分发给它们。

use crate::bus::Bus;
use crate::context::PluginContext;
use crate::plugin::{Plugin, PluginRegistry};
use crate::{BridgeError, ErrorContext, Result};
use mavbridge_config::BridgeConfig;
use mavbridge_protocol::{Clock, DecodedMessage, MessageKind, SystemClock};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 应用构建器与宿主
pub struct App {
    /// 插件注册表
    plugin_registry: PluginRegistry,
    /// 桥接器配置
    config: BridgeConfig,
    /// 共享总线
    bus: Option<Arc<Bus>>,
    /// 时间戳来源
    clock: Arc<dyn Clock>,
    /// 总线是否由初始化过程创建
    owns_bus: bool,
    /// 已初始化插件的名称，按初始化顺序
    active: Vec<String>,
    initialized: bool,
    /// 插件初始化失败后置位，之后不能再初始化
    failed: bool,
}

impl App {
    /// 创建新的应用
    pub fn new() -> Self {
        Self {
            plugin_registry: PluginRegistry::new(),
            config: BridgeConfig::default(),
            bus: None,
            clock: Arc::new(SystemClock),
            owns_bus: false,
            active: Vec::new(),
            initialized: false,
            failed: false,
        }
    }

    /// 添加插件
    pub fn add_plugin(self, plugin: impl Plugin + 'static) -> Result<Self> {
        self.add_boxed_plugin(Box::new(plugin))
    }

    /// 添加已装箱的插件
    pub fn add_boxed_plugin(mut self, plugin: Box<dyn Plugin>) -> Result<Self> {
        if self.initialized {
            return Err(BridgeError::already_initialized("初始化后不能再添加插件"));
        }
        self.plugin_registry.add(plugin)?;
        Ok(self)
    }

    /// 设置桥接器配置
    pub fn set_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// 使用外部提供的总线
    ///
    /// 未设置时在初始化阶段按配置创建。
    pub fn set_bus(mut self, bus: Arc<Bus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// 设置时钟
    pub fn set_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 初始化所有插件
    ///
    /// 按依赖顺序初始化。依赖不可用时必需插件导致失败，非必需插件被跳过。
    /// 只能调用一次。任一插件初始化失败后，已初始化的插件无法回退，
    /// 宿主进入失败状态：自建的总线被丢弃，再次调用返回
    /// [`BridgeError::InitializationFailed`]。
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(BridgeError::already_initialized("App"));
        }
        if self.failed {
            return Err(BridgeError::initialization_failed("App"));
        }

        self.config.validate()?;
        let order = self.plugin_registry.initialization_order()?;

        let bus = match &self.bus {
            Some(bus) => Arc::clone(bus),
            None => {
                let bus = Arc::new(Bus::from_config(&self.config.bus));
                self.bus = Some(Arc::clone(&bus));
                self.owns_bus = true;
                bus
            }
        };
        let ctx = PluginContext::new(
            Arc::new(self.config.clone()),
            bus,
            Arc::clone(&self.clock),
        );

        match self.initialize_plugins(&ctx, order) {
            Ok(active) => {
                self.active = active;
                self.initialized = true;
                Ok(())
            }
            Err(e) => {
                self.failed = true;
                if self.owns_bus {
                    self.bus = None;
                    self.owns_bus = false;
                }
                Err(e)
            }
        }
    }

    fn initialize_plugins(
        &mut self,
        ctx: &PluginContext,
        order: Vec<String>,
    ) -> Result<Vec<String>> {
        let mut ready: HashSet<String> = HashSet::new();
        let mut active = Vec::with_capacity(order.len());

        for name in order {
            let missing: Vec<String> = self
                .plugin_registry
                .dependencies_of(&name)
                .iter()
                .filter(|dep| !ready.contains(*dep))
                .cloned()
                .collect();

            let Some(plugin) = self.plugin_registry.get_mut(&name) else {
                continue;
            };

            if !missing.is_empty() {
                if plugin.is_required() {
                    return Err(BridgeError::plugin(format!(
                        "必需插件 {} 的依赖不可用: {}",
                        name,
                        missing.join(", ")
                    )));
                }
                tracing::warn!(
                    plugin = %name,
                    missing = ?missing,
                    "skipping plugin with unavailable dependencies"
                );
                continue;
            }

            let plugin_name = plugin.name();
            plugin
                .initialize(ctx)
                .map_err(|e| e.with_context(ErrorContext::Plugin(plugin_name)))?;
            tracing::info!(
                plugin = %name,
                kinds = ?plugin.subscribed_kinds(),
                "plugin initialized"
            );

            ready.insert(name.clone());
            active.push(name);
        }

        Ok(active)
    }

    /// 是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 分发一条已解码消息
    ///
    /// 依次交给每个已初始化的插件，返回产生的发布次数。单个插件出错只记录
    /// 警告，不影响其余插件和后续消息。
    /// 初始化之前调用返回 [`BridgeError::NotInitialized`]。
    pub fn dispatch(&self, msg: &DecodedMessage) -> Result<usize> {
        if !self.initialized {
            return Err(BridgeError::not_initialized("App"));
        }

        let mut published = 0;
        for name in &self.active {
            let Some(plugin) = self.plugin_registry.get(name) else {
                continue;
            };
            match plugin.handle_message(msg) {
                Ok(outcome) if outcome.is_published() => published += 1,
                Ok(_) => {}
                Err(e) => {
                    let e = e.with_context(msg.kind());
                    tracing::warn!(
                        plugin = %name,
                        error = %e,
                        "plugin failed to handle message"
                    );
                }
            }
        }

        Ok(published)
    }

    /// 从传输层通道持续接收并分发消息，直到通道关闭
    ///
    /// 本任务即传输层的单一工作上下文，消息按到达顺序逐条同步处理。
    /// 返回处理的消息数量。
    pub async fn run(&self, mut receiver: mpsc::Receiver<DecodedMessage>) -> Result<u64> {
        if !self.initialized {
            return Err(BridgeError::not_initialized("App"));
        }

        let mut processed = 0u64;
        while let Some(msg) = receiver.recv().await {
            self.dispatch(&msg)?;
            processed += 1;
        }

        tracing::info!(processed, "transport channel closed");
        Ok(processed)
    }

    /// 获取总线
    ///
    /// 初始化之前且未通过 [`App::set_bus`] 设置时为 None。
    pub fn bus(&self) -> Option<&Arc<Bus>> {
        self.bus.as_ref()
    }

    /// 获取配置
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// 获取插件注册表
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugin_registry
    }

    /// 已初始化插件的名称
    pub fn active_plugins(&self) -> &[String] {
        &self.active
    }

    /// 所有已初始化插件处理的消息类型
    pub fn subscribed_kinds(&self) -> Vec<MessageKind> {
        let mut kinds = Vec::new();
        for name in &self.active {
            if let Some(plugin) = self.plugin_registry.get(name) {
                for kind in plugin.subscribed_kinds() {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
            }
        }
        kinds
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
