//! # Writer 模块
//!
//! 将场景列表写回 `.sc` 文本，输出可被 [`Parser`](super::Parser) 在同一布局下原样读回。

use std::fmt::Write;

use crate::scene::Scene;
use crate::script::parser::field_token;
use crate::script::{SCENE_END_MARKER, SCENE_START_MARKER, SceneLayout};

/// 写出剧本文本
pub fn write_scenario(scenes: &[Scene], layout: SceneLayout) -> String {
    let mut out = String::new();
    for scene in scenes {
        write_scene(&mut out, scene, layout);
    }
    out
}

/// 新建剧本的模板：一个空白场景
pub fn blank_scenario(layout: SceneLayout) -> String {
    write_scenario(&[Scene::blank()], layout)
}

fn write_scene(out: &mut String, scene: &Scene, layout: SceneLayout) {
    let advanced = layout.is_advanced();

    // 写入 String 不会失败
    let _ = writeln!(out, "{SCENE_START_MARKER}");

    let mut header = vec![field_token(&scene.background)];
    if advanced {
        header.push(field_token(&scene.background_overlay));
    }
    header.push(field_token(&scene.music));
    header.push(field_token(&scene.sound));
    let _ = writeln!(out, "{}", header.join(":"));

    for slot in &scene.speakers {
        let mut fields = vec![
            field_token(&slot.name),
            field_token(&slot.texture),
            field_token(&slot.line),
        ];
        if advanced {
            fields.push(field_token(&slot.texture_left));
            fields.push(field_token(&slot.texture_right));
            fields.push(field_token(&slot.texture_head));
        }
        let _ = writeln!(out, "{}", fields.join(":"));
    }

    let _ = writeln!(out, "{}", field_token(&scene.main_character.line));

    for button in &scene.buttons {
        let _ = writeln!(
            out,
            "{}:{}",
            field_token(&button.label),
            field_token(&button.target)
        );
    }

    if advanced {
        let _ = writeln!(out, "{}", field_token(&scene.overlay));
    }

    let _ = writeln!(out, "{SCENE_END_MARKER}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_simple_template() {
        let text = blank_scenario(SceneLayout::Simple);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "[scene_start]");
        assert_eq!(lines[1], "NONE:NONE:NONE");
        assert_eq!(lines[2], "NONE:NONE:NONE");
        assert_eq!(lines[6], "NONE");
        assert_eq!(lines[7], "NONE:NONE");
        assert_eq!(lines[11], "[scene_end]");
    }

    #[test]
    fn test_blank_advanced_template() {
        let text = blank_scenario(SceneLayout::Advanced);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[1], "NONE:NONE:NONE:NONE");
        assert_eq!(lines[2], "NONE:NONE:NONE:NONE:NONE:NONE");
        assert_eq!(lines[11], "NONE");
        assert_eq!(lines[12], "[scene_end]");
    }

    #[test]
    fn test_write_fields() {
        let mut scene = Scene::blank();
        scene.background = Some("park".to_string());
        scene.music = Some("theme".to_string());
        scene.speakers[0].name = Some("Monika".to_string());
        scene.speakers[0].line = Some("Hello".to_string());

        let text = write_scenario(&[scene], SceneLayout::Simple);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "park:theme:NONE");
        assert_eq!(lines[2], "Monika:NONE:Hello");
    }

    #[test]
    fn test_write_choice_scene_snapshot() {
        let mut scene = Scene::blank();
        scene.background = Some("club".to_string());
        scene.music = Some("theme".to_string());
        scene.speakers[1].name = Some("Yuri".to_string());
        scene.speakers[1].texture = Some("yuri_shy".to_string());
        scene.speakers[1].line = Some("Which one?".to_string());
        scene.buttons[0] = crate::scene::ChoiceButton::new("Stay", None);
        scene.buttons[1] = crate::scene::ChoiceButton::new("Leave", Some("chapter2.sc"));

        insta::assert_snapshot!(write_scenario(&[scene], SceneLayout::Simple), @r"
        [scene_start]
        club:theme:NONE
        NONE:NONE:NONE
        Yuri:yuri_shy:Which one?
        NONE:NONE:NONE
        NONE:NONE:NONE
        NONE
        Stay:NONE
        Leave:chapter2.sc
        NONE:NONE
        NONE:NONE
        [scene_end]
        ");
    }
}
