//! 配置管理系统
//!
//! 提供桥接器配置，支持 TOML 文件和环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析配置文件失败: {0}")]
    Parse(String),

    /// 验证错误
    #[error("配置验证失败: {0}")]
    Validation(String),

    /// 环境变量错误
    #[error("环境变量解析失败: {0}")]
    EnvVar(String),
}

/// 配置 Result 类型
pub type Result<T> = std::result::Result<T, ConfigError>;

/// 桥接器配置
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 总线配置
    #[serde(default)]
    pub bus: BusConfig,

    /// 是否以 debug 级别记录被丢弃的消息类型（默认 trace）
    #[serde(default)]
    pub log_unhandled: bool,

    /// EKF 状态插件配置
    #[serde(default)]
    pub ekf_status: EkfStatusConfig,
}

/// 发布/订阅总线配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusConfig {
    /// 订阅方先于发布方创建频道时使用的默认容量
    #[serde(default = "default_bus_capacity")]
    pub default_capacity: usize,
}

/// EKF 状态插件配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EkfStatusConfig {
    /// 话题命名空间
    #[serde(default = "default_ekf_namespace")]
    pub namespace: String,

    /// 输出话题
    #[serde(default = "default_ekf_topic")]
    pub topic: String,

    /// 发布队列长度
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// 输出消息头中的坐标系 ID
    #[serde(default)]
    pub frame_id: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_bus_capacity(),
        }
    }
}

impl Default for EkfStatusConfig {
    fn default() -> Self {
        Self {
            namespace: default_ekf_namespace(),
            topic: default_ekf_topic(),
            queue_size: default_queue_size(),
            frame_id: String::new(),
        }
    }
}

impl EkfStatusConfig {
    /// 完整的输出频道名
    ///
    /// 命名空间为空时直接使用话题名。
    pub fn channel(&self) -> String {
        if self.namespace.is_empty() {
            self.topic.clone()
        } else {
            format!("{}/{}", self.namespace, self.topic)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.topic.is_empty() {
            return Err(ConfigError::Validation("EKF 状态话题不能为空".to_string()));
        }

        if self.topic.chars().any(char::is_whitespace)
            || self.namespace.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Validation(
                "话题和命名空间不能包含空白字符".to_string(),
            ));
        }

        if self.queue_size == 0 {
            return Err(ConfigError::Validation("发布队列长度不能为 0".to_string()));
        }

        Ok(())
    }
}

impl BridgeConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 从环境变量加载配置并覆盖
    ///
    /// 支持的环境变量：
    /// - MAVBRIDGE_BUS_CAPACITY: 总线默认频道容量
    /// - MAVBRIDGE_LOG_UNHANDLED: 记录被丢弃的消息 (true/false)
    /// - MAVBRIDGE_EKF_STATUS_NAMESPACE: EKF 状态命名空间
    /// - MAVBRIDGE_EKF_STATUS_TOPIC: EKF 状态话题
    /// - MAVBRIDGE_EKF_STATUS_QUEUE_SIZE: EKF 状态发布队列长度
    /// - MAVBRIDGE_EKF_STATUS_FRAME_ID: EKF 状态坐标系 ID
    pub fn load_with_env_override(mut self) -> Result<Self> {
        if let Ok(capacity) = std::env::var("MAVBRIDGE_BUS_CAPACITY") {
            self.bus.default_capacity = capacity.parse().map_err(|_| {
                ConfigError::EnvVar("MAVBRIDGE_BUS_CAPACITY 必须是有效的 usize 数字".to_string())
            })?;
        }

        if let Ok(flag) = std::env::var("MAVBRIDGE_LOG_UNHANDLED") {
            self.log_unhandled = flag.parse().map_err(|_| {
                ConfigError::EnvVar("MAVBRIDGE_LOG_UNHANDLED 必须是 true 或 false".to_string())
            })?;
        }

        if let Ok(namespace) = std::env::var("MAVBRIDGE_EKF_STATUS_NAMESPACE") {
            self.ekf_status.namespace = namespace;
        }

        if let Ok(topic) = std::env::var("MAVBRIDGE_EKF_STATUS_TOPIC") {
            self.ekf_status.topic = topic;
        }

        if let Ok(size) = std::env::var("MAVBRIDGE_EKF_STATUS_QUEUE_SIZE") {
            self.ekf_status.queue_size = size.parse().map_err(|_| {
                ConfigError::EnvVar(
                    "MAVBRIDGE_EKF_STATUS_QUEUE_SIZE 必须是有效的 usize 数字".to_string(),
                )
            })?;
        }

        if let Ok(frame_id) = std::env::var("MAVBRIDGE_EKF_STATUS_FRAME_ID") {
            self.ekf_status.frame_id = frame_id;
        }

        Ok(self)
    }

    /// 从文件加载并应用环境变量覆盖
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file(path)?.load_with_env_override()
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.bus.default_capacity == 0 {
            return Err(ConfigError::Validation("总线频道容量不能为 0".to_string()));
        }

        self.ekf_status.validate()
    }

    /// 获取配置摘要信息
    pub fn summary(&self) -> String {
        format!(
            "MAVBridge 配置:\n  总线容量: {}\n  EKF 状态频道: {} (队列 {})\n  记录未处理消息: {}",
            self.bus.default_capacity,
            self.ekf_status.channel(),
            self.ekf_status.queue_size,
            self.log_unhandled
        )
    }
}

// 默认值函数
fn default_bus_capacity() -> usize {
    16
}

fn default_ekf_namespace() -> String {
    "ekf_status".to_string()
}

fn default_ekf_topic() -> String {
    "ekf_status".to_string()
}

fn default_queue_size() -> usize {
    1
}
