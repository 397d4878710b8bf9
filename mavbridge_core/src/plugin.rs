//! 插件系统
//!
//! 定义 Plugin trait 和插件注册表。
//!
//! 插件采用显式的两阶段生命周期：先构造出未初始化的实例，
//! 再由宿主调用一次 [`Plugin::initialize`]。初始化完成前的任何分发都会被拒绝。

use crate::context::PluginContext;
use crate::{BridgeError, Result};
use mavbridge_protocol::{DecodedMessage, MessageKind};
use std::collections::{HashMap, HashSet};

/// 单条消息的分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 已翻译并交给发布器
    Published,
    /// 没有对应的处理器，消息被丢弃
    Discarded,
}

impl DispatchOutcome {
    /// 是否产生了一次发布
    pub fn is_published(self) -> bool {
        matches!(self, DispatchOutcome::Published)
    }
}

/// Plugin trait - 所有插件必须实现此 trait
pub trait Plugin: Send + Sync {
    /// 初始化插件
    ///
    /// 宿主在任何分发之前调用且只调用一次。插件应在此创建发布器并注册全部处理器。
    /// 重复调用必须返回 [`BridgeError::AlreadyInitialized`]。
    fn initialize(&mut self, ctx: &PluginContext) -> Result<()>;

    /// 是否已完成初始化
    fn is_initialized(&self) -> bool;

    /// 处理一条已解码消息
    ///
    /// 未初始化时必须返回 [`BridgeError::NotInitialized`]。
    fn handle_message(&self, msg: &DecodedMessage) -> Result<DispatchOutcome>;

    /// 插件处理的消息类型
    fn subscribed_kinds(&self) -> Vec<MessageKind> {
        Vec::new()
    }

    /// 获取插件名称
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// 是否为必需插件
    ///
    /// 依赖缺失时，必需插件使初始化失败，非必需插件被跳过。
    fn is_required(&self) -> bool {
        false
    }

    /// 获取插件依赖的其他插件
    ///
    /// 返回依赖的插件名称列表
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }
}

/// 插件注册表
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    plugin_names: HashMap<String, usize>,
    dependency_graph: HashMap<String, Vec<String>>,
}

impl PluginRegistry {
    /// 创建新的插件注册表
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            plugin_names: HashMap::new(),
            dependency_graph: HashMap::new(),
        }
    }

    /// 注册插件
    pub fn add(&mut self, plugin: Box<dyn Plugin>) -> Result<&mut Self> {
        let name = plugin.name().to_string();

        if self.plugin_names.contains_key(&name) {
            return Err(BridgeError::plugin(format!("插件已存在: {}", name)));
        }

        let index = self.plugins.len();
        self.plugin_names.insert(name.clone(), index);

        let deps: Vec<String> = plugin.dependencies().iter().map(|s| s.to_string()).collect();
        if !deps.is_empty() {
            self.dependency_graph.insert(name, deps);
        }

        self.plugins.push(plugin);
        Ok(self)
    }

    /// 获取所有插件
    pub fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    /// 按名称查找插件
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugin_names
            .get(name)
            .map(|&index| self.plugins[index].as_ref())
    }

    /// 按名称查找插件（可变）
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn Plugin>> {
        match self.plugin_names.get(name) {
            Some(&index) => self.plugins.get_mut(index),
            None => None,
        }
    }

    /// 获取插件的依赖列表
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.dependency_graph
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 验证插件依赖
    ///
    /// 检查所有插件的依赖是否满足
    pub fn validate_dependencies(&self) -> Result<()> {
        for plugin in &self.plugins {
            let name = plugin.name();
            for dep in self.dependencies_of(name) {
                if !self.plugin_names.contains_key(dep) {
                    return Err(BridgeError::plugin(format!(
                        "插件 {} 依赖的插件 {} 未注册",
                        name, dep
                    )));
                }
            }
        }

        Ok(())
    }

    /// 获取插件初始化顺序
    ///
    /// 依赖总在被依赖者之前；互不依赖的插件保持注册顺序。未注册的依赖被忽略，
    /// 由调用方决定如何处理。
    pub fn initialization_order(&self) -> Result<Vec<String>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut visiting = HashSet::new();

        for plugin in &self.plugins {
            self.visit(plugin.name(), &mut order, &mut visited, &mut visiting)?;
        }

        Ok(order)
    }

    /// 拓扑排序访问
    fn visit(
        &self,
        plugin_name: &str,
        order: &mut Vec<String>,
        visited: &mut HashSet<String>,
        visiting: &mut HashSet<String>,
    ) -> Result<()> {
        if visited.contains(plugin_name) || !self.plugin_names.contains_key(plugin_name) {
            return Ok(());
        }

        if !visiting.insert(plugin_name.to_string()) {
            return Err(BridgeError::plugin(format!(
                "检测到循环依赖: {}",
                plugin_name
            )));
        }

        for dep in self.dependencies_of(plugin_name) {
            self.visit(dep, order, visited, visiting)?;
        }

        visiting.remove(plugin_name);
        visited.insert(plugin_name.to_string());
        order.push(plugin_name.to_string());

        Ok(())
    }

    /// 获取插件数量
    pub fn count(&self) -> usize {
        self.plugins.len()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
