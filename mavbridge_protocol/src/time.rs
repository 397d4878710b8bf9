//! 时间戳与时钟
//!
//! 输出消息的时间戳取自接收时刻而非消息的原始发送时刻。

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 时间戳（UNIX 纪元起的秒与纳秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Stamp {
    pub sec: i64,
    pub nanosec: u32,
}

impl Stamp {
    /// 创建时间戳
    pub fn new(sec: i64, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }

    /// 从系统时间构造
    ///
    /// 早于纪元的时间为负秒数，纳秒部分始终落在 [0, 1e9) 内。
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self::new(since.as_secs() as i64, since.subsec_nanos()),
            Err(err) => {
                let before = err.duration();
                let mut sec = -(before.as_secs() as i64);
                let mut nanosec = 0;
                if before.subsec_nanos() > 0 {
                    sec -= 1;
                    nanosec = 1_000_000_000 - before.subsec_nanos();
                }
                Self::new(sec, nanosec)
            }
        }
    }

    /// 纪元起的总纳秒数
    pub fn as_nanos(&self) -> i128 {
        self.sec as i128 * 1_000_000_000 + self.nanosec as i128
    }

    /// 转换为系统时间
    pub fn to_system_time(&self) -> SystemTime {
        if self.sec >= 0 {
            UNIX_EPOCH + Duration::new(self.sec as u64, self.nanosec)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.sec.unsigned_abs())
                + Duration::from_nanos(self.nanosec as u64)
        }
    }
}

/// 时钟
///
/// 翻译器通过时钟获取接收时间戳，测试和回放时可替换为固定时钟。
pub trait Clock: Send + Sync {
    /// 当前时间
    fn now(&self) -> Stamp;
}

/// 系统墙钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Stamp {
        Stamp::from_system_time(SystemTime::now())
    }
}

/// 固定时钟，总是返回同一时间戳
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub Stamp);

impl Clock for FixedClock {
    fn now(&self) -> Stamp {
        self.0
    }
}
