//! 分发指标
//!
//! 统计每个分发器收到、发布和丢弃的消息数。被丢弃的消息不会产生错误，
//! 这些计数是从外部观察“消息没有桥接出去”的唯一途径。

use std::sync::atomic::{AtomicU64, Ordering};

/// 分发指标
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// 收到的消息数
    received: AtomicU64,
    /// 翻译并发布的消息数
    published: AtomicU64,
    /// 无处理器而丢弃的消息数
    discarded: AtomicU64,
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSnapshot {
    pub received: u64,
    pub published: u64,
    pub discarded: u64,
}

impl DispatchMetrics {
    /// 创建新的分发指标
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录收到消息
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录发布消息
    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录丢弃消息
    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取快照
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            received: self.received.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "分发指标:\n\
             - 收到消息: {}\n\
             - 发布消息: {}\n\
             - 丢弃消息: {}",
            snapshot.received, snapshot.published, snapshot.discarded
        )
    }
}
