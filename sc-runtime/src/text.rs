//! # Text 模块
//!
//! 对话文本的派生计算：说话者焦点、名字横幅、玩家名替换和逐字显示。
//!
//! ## 设计原则
//!
//! - 每帧从原始台词重新计算，不缓存替换结果（玩家名在开局前未知）
//! - 逐字显示保留“阈值门”节奏：每个达标帧最多追加一个字符

use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// 玩家名占位符
pub const PLAYER_NAME_MARKER: &str = "@MAINCHARACTERNAME";

/// 横幅中多个说话者的连接符
pub const BANNER_JOINER: &str = "&";

/// 逐字显示的阈值
const REVEAL_THRESHOLD: f32 = 0.01;

/// 当前焦点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    /// 无人说话
    Nobody,
    /// NPC 槽位（0-based）
    Speaker(usize),
    /// 主角
    MainCharacter,
}

/// 单个场景的对话视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueView {
    /// 名字横幅（空字符串表示不显示）
    pub banner: String,
    /// 完整台词（已替换玩家名）
    pub text: String,
    /// 焦点
    pub focus: Focus,
}

/// 计算场景的对话视图
///
/// 说话顺序为 NPC 1-4，然后是主角：
/// - 横幅把所有说话者的名字用 `&` 连接
/// - 台词取第一个非空的台词
/// - 焦点是第一个说话的 NPC；主角说话时焦点总是主角
///
/// 仅主角说话且台词以 `@` 结尾时，去掉结尾的 `@` 并隐藏横幅。
pub fn resolve_dialogue(scene: &Scene, player_name: &str) -> DialogueView {
    let mut names: Vec<&str> = Vec::new();
    let mut text = "";
    let mut focus = Focus::Nobody;

    for (index, slot) in scene.speakers.iter().enumerate() {
        let Some(line) = slot.line.as_deref() else {
            continue;
        };
        names.push(slot.name.as_deref().unwrap_or_default());
        if text.is_empty() {
            text = line;
        }
        if focus == Focus::Nobody {
            focus = Focus::Speaker(index);
        }
    }

    let npc_talking = !names.is_empty();

    if let Some(line) = scene.main_character.line.as_deref() {
        names.push(player_name);
        if text.is_empty() {
            text = line;
        }
        focus = Focus::MainCharacter;
    }

    let mut banner = names.join(BANNER_JOINER);
    let mut text = text.to_string();

    if focus == Focus::MainCharacter && !npc_talking && text.ends_with('@') {
        text.pop();
        banner.clear();
    }

    DialogueView {
        banner,
        text: substitute_player_name(&text, player_name),
        focus,
    }
}

/// 替换台词中的玩家名占位符
///
/// `@MAINCHARACTERNAME@` 与不带结尾 `@` 的 `@MAINCHARACTERNAME` 都会被替换。
pub fn substitute_player_name(line: &str, player_name: &str) -> String {
    if !line.contains(PLAYER_NAME_MARKER) {
        return line.to_string();
    }

    let bounded = format!("{PLAYER_NAME_MARKER}@");
    line.replace(&bounded, player_name)
        .replace(PLAYER_NAME_MARKER, player_name)
}

/// 逐字显示状态
///
/// 每帧：
///
/// ```text
/// lerp += (1 - lerp) * dt * speed / 100     （暂停时不推进）
/// if lerp > 0.01 且还有未显示字符 → 追加一个字符
/// if lerp > 0.01 → lerp = 0
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextReveal {
    lerp: f32,
    revealed: usize,
}

impl TextReveal {
    /// 创建逐字显示状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 重置（切换场景时）
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 已显示字符数
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// 推进一帧
    ///
    /// - `speed`: 1-100
    /// - `paused`: 暂停菜单打开时插值不推进
    pub fn step(&mut self, full_text: &str, dt: f32, speed: u32, paused: bool) {
        if !paused {
            let t = dt * (speed as f32 / 100.0);
            self.lerp += (1.0 - self.lerp) * t;
        }

        if self.lerp > REVEAL_THRESHOLD {
            if self.revealed < full_text.chars().count() {
                self.revealed += 1;
            }
            self.lerp = 0.0;
        }
    }

    /// 当前可见文本
    pub fn visible<'a>(&self, full_text: &'a str) -> &'a str {
        match full_text.char_indices().nth(self.revealed) {
            Some((byte_index, _)) => &full_text[..byte_index],
            None => full_text,
        }
    }

    /// 是否已全部显示
    pub fn is_complete(&self, full_text: &str) -> bool {
        self.revealed >= full_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talk(scene: &mut Scene, slot: usize, name: &str, line: &str) {
        scene.speakers[slot].name = Some(name.to_string());
        scene.speakers[slot].line = Some(line.to_string());
    }

    #[test]
    fn test_single_speaker() {
        let mut scene = Scene::blank();
        talk(&mut scene, 1, "Sayori", "Morning!");

        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.banner, "Sayori");
        assert_eq!(view.text, "Morning!");
        assert_eq!(view.focus, Focus::Speaker(1));
    }

    #[test]
    fn test_banner_joins_in_priority_order() {
        let mut scene = Scene::blank();
        talk(&mut scene, 2, "Yuri", "Second");
        talk(&mut scene, 0, "Monika", "First");

        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.banner, "Monika&Yuri");
        assert_eq!(view.text, "First");
        assert_eq!(view.focus, Focus::Speaker(0));
    }

    #[test]
    fn test_main_character_takes_focus() {
        let mut scene = Scene::blank();
        talk(&mut scene, 0, "Monika", "Together");
        scene.main_character.line = Some("Together".to_string());

        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.banner, "Monika&Alex");
        assert_eq!(view.text, "Together");
        assert_eq!(view.focus, Focus::MainCharacter);
    }

    #[test]
    fn test_first_non_empty_line_wins() {
        let mut scene = Scene::blank();
        talk(&mut scene, 0, "Monika", "");
        talk(&mut scene, 3, "Natsuki", "Hmph.");

        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.text, "Hmph.");
        assert_eq!(view.focus, Focus::Speaker(0));
    }

    #[test]
    fn test_nobody_talking() {
        let view = resolve_dialogue(&Scene::blank(), "Alex");
        assert_eq!(view.banner, "");
        assert_eq!(view.text, "");
        assert_eq!(view.focus, Focus::Nobody);
    }

    #[test]
    fn test_trailing_at_hides_banner() {
        let mut scene = Scene::blank();
        scene.main_character.line = Some("(I should hurry.)@".to_string());

        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.banner, "");
        assert_eq!(view.text, "(I should hurry.)");

        // 有 NPC 同时说话时不生效
        talk(&mut scene, 0, "Monika", "Wait!");
        let view = resolve_dialogue(&scene, "Alex");
        assert_eq!(view.banner, "Monika&Alex");
        assert_eq!(view.text, "Wait!");
    }

    #[test]
    fn test_substitution() {
        assert_eq!(
            substitute_player_name("Hi @MAINCHARACTERNAME@, welcome", "Alex"),
            "Hi Alex, welcome"
        );
        assert_eq!(
            substitute_player_name("@MAINCHARACTERNAME@ and @MAINCHARACTERNAME@", "Alex"),
            "Alex and Alex"
        );
        assert_eq!(substitute_player_name("Bye @MAINCHARACTERNAME", "Alex"), "Bye Alex");
        assert_eq!(substitute_player_name("no marker", "Alex"), "no marker");
    }

    #[test]
    fn test_substitution_redone_per_player_name() {
        let mut scene = Scene::blank();
        talk(&mut scene, 0, "Monika", "Hi @MAINCHARACTERNAME@, welcome");

        assert_eq!(resolve_dialogue(&scene, "Alex").text, "Hi Alex, welcome");
        assert_eq!(resolve_dialogue(&scene, "Sam").text, "Hi Sam, welcome");
        // 原始台词保持不变
        assert_eq!(
            scene.speakers[0].line.as_deref(),
            Some("Hi @MAINCHARACTERNAME@, welcome")
        );
    }

    #[test]
    fn test_reveal_one_char_per_qualifying_frame() {
        let mut reveal = TextReveal::new();
        let text = "Héllo";

        // dt * speed / 100 = 1.0：每帧都越过阈值
        for expected in 1..=5 {
            reveal.step(text, 1.0, 100, false);
            assert_eq!(reveal.revealed(), expected);
        }
        assert_eq!(reveal.visible(text), "Héllo");
        assert!(reveal.is_complete(text));

        reveal.step(text, 1.0, 100, false);
        assert_eq!(reveal.revealed(), 5);
    }

    #[test]
    fn test_reveal_threshold_gate() {
        let mut reveal = TextReveal::new();
        let text = "abc";

        // 每帧 t = 0.016 * 0.3 = 0.0048，需要累积三帧才越过 0.01
        reveal.step(text, 0.016, 30, false);
        reveal.step(text, 0.016, 30, false);
        assert_eq!(reveal.revealed(), 0);
        assert_eq!(reveal.visible(text), "");

        reveal.step(text, 0.016, 30, false);
        assert_eq!(reveal.revealed(), 1);
        assert_eq!(reveal.visible(text), "a");
    }

    #[test]
    fn test_reveal_paused_and_reset() {
        let mut reveal = TextReveal::new();
        for _ in 0..10 {
            reveal.step("abc", 1.0, 100, true);
        }
        assert_eq!(reveal.revealed(), 0);

        reveal.step("abc", 1.0, 100, false);
        reveal.reset();
        assert_eq!(reveal, TextReveal::new());
    }
}
