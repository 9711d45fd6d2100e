use std::time::{Duration, Instant};

/// 阶段计时结构，累计同一类外部命令（训练或测试）的总耗时。
#[derive(Clone, Debug)]
pub struct StageTimer {
    consumed: Duration,
    since: Option<Instant>,
    rounds: usize,
}

impl StageTimer {
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: None,
            rounds: 0,
        }
    }

    /// 开始计时。重复调用会覆盖上一次的起点。
    #[inline]
    pub fn start(&mut self) {
        self.since = Some(Instant::now());
    }

    /// 结束计时，并将这一区间累计起来。之前没有调用`self.start()`时不做任何事。
    #[inline]
    pub fn stop(&mut self) {
        if let Some(since) = self.since.take() {
            self.consumed += since.elapsed();
            self.rounds += 1;
        }
    }

    /// 已完成的计时区间个数。
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// 累计时间（毫秒）。
    #[inline]
    pub fn total_ms(&self) -> u64 {
        self.consumed.as_millis() as u64
    }
}

impl Default for StageTimer {
    fn default() -> Self {
        Self::new()
    }
}
