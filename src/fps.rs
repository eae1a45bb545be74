use std::time::Instant;

/// 直前フレームとの時間差から瞬間FPSを求める
pub struct FrameClock {
    prev: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// 経過時間が 0 のとき（および最初のフレーム）は None
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let fps = self.prev.and_then(|prev| {
            let dt = now.saturating_duration_since(prev).as_secs_f32();
            if dt > 0.0 {
                Some(1.0 / dt)
            } else {
                None
            }
        });
        self.prev = Some(now);
        fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// 1秒ごとの平均FPS（ログ用）
pub struct FpsMeter {
    frames: u32,
    since: Instant,
}

impl FpsMeter {
    pub fn new(now: Instant) -> Self {
        Self { frames: 0, since: now }
    }

    /// 1秒経過したら平均FPSを返してリセット
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.since).as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }
        let fps = self.frames as f32 / elapsed;
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}
