use std::collections::HashMap;

use super::*;
use sc_runtime::{Focus, MENU_MUSIC_NAME, SpriteView};

#[derive(Default)]
struct RecordingRender {
    calls: Vec<String>,
}

impl RenderBackend for RecordingRender {
    fn begin_frame(&mut self, _state: &PlaybackState) {
        self.calls.clear();
    }
    fn draw_background(&mut self, texture: &TextureHandle) {
        self.calls.push(format!("bg:{}", texture.name));
    }
    fn draw_background_overlay(&mut self, texture: &TextureHandle) {
        self.calls.push(format!("bg_overlay:{}", texture.name));
    }
    fn draw_sprite(&mut self, slot: usize, parts: &[&TextureHandle], focused: bool) {
        let names: Vec<&str> = parts.iter().map(|t| t.name.as_str()).collect();
        self.calls
            .push(format!("sprite:{slot}:{}:{focused}", names.join("+")));
    }
    fn draw_dialogue(&mut self, banner: &str, text: &str) {
        self.calls.push(format!("dialogue:{banner}:{text}"));
    }
    fn draw_choices(&mut self, buttons: &[ButtonView]) {
        self.calls.push(format!("choices:{}", buttons.len()));
    }
    fn draw_overlay(&mut self, texture: &TextureHandle) {
        self.calls.push(format!("overlay:{}", texture.name));
    }
    fn draw_pause_menu(&mut self) {
        self.calls.push("pause".to_string());
    }
    fn draw_status(&mut self, message: &str) {
        self.calls.push(format!("status:{message}"));
    }
    fn end_frame(&mut self) {}
    fn draw_intro(&mut self, developer: &str, _alpha: f32) {
        self.calls.push(format!("intro:{developer}"));
    }
    fn show_list(&mut self, title: &str, items: &[String]) {
        self.calls.push(format!("list:{title}:{}", items.len()));
    }
}

#[derive(Default)]
struct RecordingAudio {
    events: Vec<String>,
}

impl AudioBackend for RecordingAudio {
    fn play_music(&mut self, name: &str, _path: &Path, _volume: f32) {
        self.events.push(format!("play:{name}"));
    }
    fn stop_music(&mut self) {
        self.events.push("stop".to_string());
    }
    fn set_music_paused(&mut self, paused: bool) {
        self.events.push(format!("paused:{paused}"));
    }
    fn play_sound(&mut self, name: &str, _path: &Path, _volume: f32) {
        self.events.push(format!("sound:{name}"));
    }
    fn stop_sound(&mut self) {
        self.events.push("sound_stop".to_string());
    }
}

fn texture(name: &str) -> TextureHandle {
    TextureHandle {
        name: name.to_string(),
        path: PathBuf::from(format!("{name}.png")),
        width: 1,
        height: 1,
    }
}

fn textures(names: &[&str]) -> HashMap<String, TextureHandle> {
    names
        .iter()
        .map(|name| (name.to_string(), texture(name)))
        .collect()
}

fn music() -> MusicRegistry<PathBuf> {
    [MENU_MUSIC_NAME, "theme", "door"]
        .into_iter()
        .map(|name| (name.to_string(), PathBuf::from(format!("{name}.ogg"))))
        .collect()
}

fn playing_frame() -> Frame {
    let mut frame = Frame::menu(
        PlaybackState::Playing {
            scenario: "main.sc".to_string(),
            scene_index: 0,
        },
        None,
        false,
    );
    frame.scene_serial = 1;
    frame.music = Some("theme".to_string());
    frame.background = Some("park".to_string());
    frame.banner = "Monika".to_string();
    frame.text = "Hi".to_string();
    frame.focus = Focus::Speaker(0);
    frame
}

fn driver() -> PresentationDriver<RecordingRender, RecordingAudio> {
    PresentationDriver::new(RecordingRender::default(), RecordingAudio::default())
}

#[test]
fn test_draw_order_and_missing_textures() {
    let mut driver = driver();
    let store = textures(&["park", "monika_body", "monika_happy", "rain"]);

    let mut frame = playing_frame();
    frame.background_overlay = Some("missing".to_string());
    frame.overlay = Some("rain".to_string());
    frame.sprites = vec![SpriteView {
        slot: 0,
        parts: vec![
            "monika_body".to_string(),
            "missing".to_string(),
            "monika_happy".to_string(),
        ],
        focused: true,
    }];
    frame.status = Some("oops".to_string());

    driver.present(&frame, |name| store.get(name), &music());

    assert_eq!(
        driver.render().calls,
        vec![
            "bg:park",
            "sprite:0:monika_body+monika_happy:true",
            "dialogue:Monika:Hi",
            "overlay:rain",
            "status:oops",
        ]
    );
}

#[test]
fn test_choices_and_pause_menu() {
    let mut driver = driver();
    let store = textures(&[]);

    let mut frame = playing_frame();
    frame.choice_menu_open = true;
    frame.buttons = vec![ButtonView {
        index: 0,
        label: "Yes".to_string(),
    }];
    driver.present(&frame, |name| store.get(name), &music());
    assert!(driver.render().calls.contains(&"choices:1".to_string()));

    frame.choice_menu_open = false;
    frame.paused = true;
    driver.present(&frame, |name| store.get(name), &music());
    assert!(driver.render().calls.contains(&"pause".to_string()));
    assert!(!driver.render().calls.iter().any(|c| c.starts_with("choices")));
}

#[test]
fn test_music_only_restarts_on_change() {
    let mut driver = driver();
    let store = textures(&[]);
    let music = music();

    let menu = Frame::menu(PlaybackState::MainMenu, None, false);
    driver.present(&menu, |name| store.get(name), &music);
    driver.present(&menu, |name| store.get(name), &music);

    let frame = playing_frame();
    driver.present(&frame, |name| store.get(name), &music);
    driver.present(&frame, |name| store.get(name), &music);

    let mut silent = playing_frame();
    silent.music = None;
    driver.present(&silent, |name| store.get(name), &music);

    assert_eq!(
        driver.audio().events,
        vec!["play:menu_background", "play:theme", "stop"]
    );
    assert_eq!(driver.current_music(), None);
}

#[test]
fn test_pause_toggles_music() {
    let mut driver = driver();
    let store = textures(&[]);
    let music = music();

    let mut frame = playing_frame();
    driver.present(&frame, |name| store.get(name), &music);
    frame.paused = true;
    driver.present(&frame, |name| store.get(name), &music);
    driver.present(&frame, |name| store.get(name), &music);
    frame.paused = false;
    driver.present(&frame, |name| store.get(name), &music);

    assert_eq!(
        driver.audio().events,
        vec!["play:theme", "paused:true", "paused:false"]
    );
}

#[test]
fn test_sound_replays_on_new_scene() {
    let mut driver = driver();
    let store = textures(&[]);
    let music = music();

    let mut frame = playing_frame();
    frame.music = None;
    frame.sound = Some(SoundCue {
        name: "door".to_string(),
        scene_serial: 1,
    });
    driver.present(&frame, |name| store.get(name), &music);
    driver.present(&frame, |name| store.get(name), &music);

    // 相邻场景的同名音效
    frame.sound = Some(SoundCue {
        name: "door".to_string(),
        scene_serial: 2,
    });
    driver.present(&frame, |name| store.get(name), &music);

    frame.sound = None;
    driver.present(&frame, |name| store.get(name), &music);

    assert_eq!(
        driver.audio().events,
        vec!["sound:door", "sound:door", "sound_stop"]
    );
}

#[test]
fn test_unregistered_tracks_are_not_played() {
    let mut driver = driver();
    let store = textures(&[]);
    let music = music();

    let mut frame = playing_frame();
    frame.music = Some("rain".to_string());
    frame.sound = Some(SoundCue {
        name: "thunder".to_string(),
        scene_serial: 1,
    });
    driver.present(&frame, |name| store.get(name), &music);

    // 未登记的音轨：停止旧音乐，音效不播放
    assert_eq!(driver.audio().events, vec!["stop"]);
    assert_eq!(driver.current_music(), Some("rain"));

    frame.music = Some("theme".to_string());
    driver.present(&frame, |name| store.get(name), &music);
    assert_eq!(driver.audio().events, vec!["stop", "play:theme"]);
}

#[test]
fn test_console_renderer_prints_only_changes() {
    let mut driver = PresentationDriver::new(ConsoleRenderer::new(Vec::new()), LogAudio::new());
    let store = textures(&["park"]);
    let music = music();

    let frame = playing_frame();
    driver.present(&frame, |name| store.get(name), &music);
    driver.present(&frame, |name| store.get(name), &music);

    let output = String::from_utf8(driver.render().output().clone()).unwrap();
    assert_eq!(output.matches("== main.sc #1 ==").count(), 1);
    assert!(output.contains("[background] park"));
    assert!(output.contains("<Monika>"));
    assert_eq!(driver.audio().playing(), Some("theme"));
}

#[test]
fn test_console_renderer_translates_captions() {
    let mut translations = Translations::new();
    translations.add(
        crate::translation::Language::parse("Deutsch\nde_DE\nMain menu=Hauptmenü\n").unwrap(),
    );
    let renderer =
        ConsoleRenderer::new(Vec::new()).with_translations(translations, Some("Deutsch".into()));
    let mut driver = PresentationDriver::new(renderer, LogAudio::new());
    let store = textures(&[]);

    let menu = Frame::menu(PlaybackState::MainMenu, None, false);
    driver.present(&menu, |name| store.get(name), &music());

    assert_eq!(driver.render().last_output(), ["== Hauptmenü =="]);
}

#[test]
fn test_console_lists_and_intro() {
    let mut renderer = ConsoleRenderer::new(Vec::new());
    renderer.draw_intro("Team Salvato", 0.4);
    renderer.draw_intro("Team Salvato", 1.0);
    renderer.draw_intro("Team Salvato", 1.0);
    renderer.show_list("Saves", &[]);
    renderer.show_list("Scenarios", &["main.sc".to_string()]);

    let output = String::from_utf8(renderer.output().clone()).unwrap();
    assert_eq!(
        output,
        "~ Team Salvato ~\n-- Saves --\n  (empty)\n-- Scenarios --\n  main.sc\n"
    );
}
