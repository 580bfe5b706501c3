//! 有界重试策略
//!
//! 重试次数和间隔都是参数，等待通过 Delay 抽象注入，
//! 测试无需真实挂钟即可验证重试边界

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// 重试间隔的等待抽象
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, interval: Duration);
}

/// 生产实现: tokio 定时器
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// 有界重试策略
///
/// 默认值沿用 CDN 传播延迟的经验参数: 20 次 × 500ms，约 10 秒上限
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 两次尝试之间的固定间隔
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// 执行操作直到成功或预算耗尽
    ///
    /// 恰好执行 `max_attempts` 次（全部失败时），最后一次失败后不再等待；
    /// 返回首个成功值，或最后一次的错误
    pub async fn run<T, E, F, Fut>(&self, delay: &dyn Delay, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts => return Err(err),
                Err(_) => {}
            }
            attempt += 1;
            delay.wait(self.interval).await;
        }
    }
}
