//! 进程内发布/订阅总线
//!
//! 每个话题对应一个 tokio broadcast 频道。发布是非阻塞的移交：
//! 没有订阅者时消息直接丢弃，慢订阅者按频道容量丢失旧消息。

use crate::{BridgeError, Result};
use mavbridge_config::BusConfig;
use mavbridge_protocol::OutgoingMessage;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// 输出消息接收端
///
/// 分发器通过该 trait 发布翻译后的消息。发布即忘：不返回送达确认，也不产生背压。
pub trait MessageSink: Send + Sync {
    /// 交出一条输出消息
    fn emit(&self, msg: OutgoingMessage);
}

/// 发布器
///
/// 绑定到单个话题，由创建它的插件实例独占。
#[derive(Debug)]
pub struct Publisher {
    topic: String,
    sender: broadcast::Sender<OutgoingMessage>,
}

impl Publisher {
    /// 获取话题名
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// 发布消息，返回收到消息的订阅者数量
    ///
    /// 没有订阅者不是错误，消息被丢弃并返回 0。
    pub fn publish(&self, msg: OutgoingMessage) -> usize {
        match self.sender.send(msg) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!(topic = %self.topic, "no subscribers, message dropped");
                0
            }
        }
    }
}

impl MessageSink for Publisher {
    fn emit(&self, msg: OutgoingMessage) {
        self.publish(msg);
    }
}

impl<S: MessageSink + ?Sized> MessageSink for Arc<S> {
    fn emit(&self, msg: OutgoingMessage) {
        (**self).emit(msg);
    }
}

/// 发布/订阅总线
#[derive(Debug)]
pub struct Bus {
    channels: RwLock<HashMap<String, broadcast::Sender<OutgoingMessage>>>,
    default_capacity: usize,
}

impl Bus {
    /// 创建总线
    ///
    /// `default_capacity` 用于订阅方先于发布方创建的频道，最小为 1。
    pub fn new(default_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            default_capacity: default_capacity.max(1),
        }
    }

    /// 按配置创建总线
    pub fn from_config(config: &BusConfig) -> Self {
        Self::new(config.default_capacity)
    }

    /// 声明一个话题并返回其发布器
    ///
    /// 话题已存在时复用现有频道，`queue_size` 只在新建频道时生效。
    pub fn advertise(&self, topic: &str, queue_size: usize) -> Result<Publisher> {
        if topic.is_empty() {
            return Err(BridgeError::bus("话题名不能为空"));
        }
        if queue_size == 0 {
            return Err(BridgeError::bus(format!("话题 {} 的队列长度不能为 0", topic)));
        }

        let sender = self.channel(topic, queue_size)?;
        tracing::info!(topic, queue_size, "advertised topic");

        Ok(Publisher {
            topic: topic.to_string(),
            sender,
        })
    }

    /// 订阅话题
    ///
    /// 话题尚未声明时以默认容量创建频道。
    pub fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<OutgoingMessage>> {
        if topic.is_empty() {
            return Err(BridgeError::bus("话题名不能为空"));
        }
        Ok(self.channel(topic, self.default_capacity)?.subscribe())
    }

    /// 获取所有话题名（已排序）
    pub fn topics(&self) -> Vec<String> {
        let channels = match self.channels.read() {
            Ok(channels) => channels,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut topics: Vec<String> = channels.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// 获取话题的订阅者数量，话题不存在时为 0
    pub fn subscriber_count(&self, topic: &str) -> usize {
        match self.channels.read() {
            Ok(channels) => channels.get(topic).map_or(0, |s| s.receiver_count()),
            Err(poisoned) => poisoned
                .into_inner()
                .get(topic)
                .map_or(0, |s| s.receiver_count()),
        }
    }

    fn channel(&self, topic: &str, capacity: usize) -> Result<broadcast::Sender<OutgoingMessage>> {
        let mut channels = self
            .channels
            .write()
            .map_err(|_| BridgeError::bus("频道表锁已损坏"))?;

        let sender = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(capacity).0);

        Ok(sender.clone())
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::from_config(&BusConfig::default())
    }
}
