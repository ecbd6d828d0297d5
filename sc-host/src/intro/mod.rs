//! # Intro 模块
//!
//! 启动时的开场淡入淡出（显示游戏开发者名）。
//!
//! 两个进度值都以指数方式逼近 [`FADE_TARGET`]：先淡入，淡入接近完成后开始淡出。
//! 跳过后逼近速度乘以 [`SKIP_FACTOR`]。

/// 进度目标值
pub const FADE_TARGET: f32 = 3.0;
/// 淡入进度超过此值后开始淡出
pub const FADE_OUT_START: f32 = 2.6;
/// 淡出进度超过此值时开场结束
pub const FINISH_THRESHOLD: f32 = 2.8;
/// 跳过后的速度倍率
pub const SKIP_FACTOR: f32 = 8.0;
/// 淡入比淡出慢的量
const FADE_IN_LAG: f32 = 0.6;

/// 开场淡入淡出
#[derive(Debug, Clone, PartialEq)]
pub struct IntroFade {
    /// 淡入进度（透明度上升）
    rise: f32,
    /// 淡出进度（透明度下降）
    fall: f32,
    factor: f32,
}

impl Default for IntroFade {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroFade {
    /// 创建开场动画
    pub fn new() -> Self {
        Self {
            rise: 0.0,
            fall: 0.0,
            factor: 1.0,
        }
    }

    /// 推进动画，`dt` 为秒数
    pub fn update(&mut self, dt: f32) {
        self.rise = lerp(self.rise, FADE_TARGET, dt * (self.factor - FADE_IN_LAG));
        if self.rise > FADE_OUT_START {
            self.fall = lerp(self.fall, FADE_TARGET, dt * self.factor);
        }
    }

    /// 加速跳过
    pub fn skip(&mut self) {
        self.factor = SKIP_FACTOR;
    }

    /// 是否已跳过
    pub fn is_skipped(&self) -> bool {
        self.factor > 1.0
    }

    /// 当前透明度（0.0 - 1.0）
    pub fn alpha(&self) -> f32 {
        (self.rise - self.fall).clamp(0.0, 1.0)
    }

    /// 是否结束
    pub fn is_finished(&self) -> bool {
        self.fall > FINISH_THRESHOLD
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn frames_until_finished(mut intro: IntroFade) -> usize {
        let mut frames = 0;
        while !intro.is_finished() && frames < 10_000 {
            intro.update(DT);
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_fade_in_then_out() {
        let mut intro = IntroFade::new();
        assert_eq!(intro.alpha(), 0.0);

        for _ in 0..60 {
            intro.update(DT);
        }
        assert!(intro.alpha() > 0.0);
        assert!(!intro.is_finished());
    }

    #[test]
    fn test_intro_finishes() {
        let frames = frames_until_finished(IntroFade::new());
        assert!(frames < 1_200, "took {frames} frames");
    }

    #[test]
    fn test_skip_is_faster() {
        let normal = frames_until_finished(IntroFade::new());

        let mut skipped = IntroFade::new();
        skipped.skip();
        assert!(skipped.is_skipped());
        let fast = frames_until_finished(skipped);

        assert!(fast < normal);
        assert!(fast < 120, "took {fast} frames");
    }
}
