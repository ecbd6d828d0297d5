//! 宿主命令的执行

use tracing::{debug, info};

use super::App;
use crate::error::{HostError, HostResult};
use crate::input::{EditCommand, HELP_TEXT, HostCommand};
use crate::presentation::{AudioBackend, RenderBackend};
use crate::save_manager::default_save_name;
use sc_runtime::{EditorInput, PlaybackState, RuntimeInput, SaveRecord};

/// 命令执行后主循环的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl<R: RenderBackend, A: AudioBackend> App<R, A> {
    /// 执行一条命令
    ///
    /// 引擎拒绝的操作不返回错误：拒绝原因会作为提示出现在下一帧。
    /// 返回的错误只来自宿主自身（命令无效、文件读写失败等）。
    pub fn execute(&mut self, command: HostCommand) -> HostResult<Flow> {
        debug!(?command, "执行命令");

        match command {
            HostCommand::List => self.show_scenarios(),
            HostCommand::OpenScenarioSelect => self.send(RuntimeInput::OpenScenarioSelect),
            HostCommand::OpenSaveSelect => {
                self.send(RuntimeInput::OpenSaveSelect);
                self.show_saves();
            }
            HostCommand::Back => self.send(RuntimeInput::Back),
            HostCommand::Start {
                scenario,
                player_name,
            } => {
                self.leave_main_menu(RuntimeInput::OpenScenarioSelect);
                self.send(RuntimeInput::StartNewGame {
                    scenario,
                    player_name,
                });
            }
            HostCommand::Load { name } => {
                let record = self.saves.load(&name)?;
                self.leave_main_menu(RuntimeInput::OpenSaveSelect);
                self.send(RuntimeInput::load(record));
            }
            HostCommand::Save { name } => self.save_game(name)?,
            HostCommand::Delete { name } => self.saves.delete(&name)?,
            HostCommand::Next => self.send(RuntimeInput::Advance),
            HostCommand::Choose { index } => self.send(RuntimeInput::button(index)),
            HostCommand::Pause => self.send(RuntimeInput::TogglePause),
            HostCommand::Exit => self.send(RuntimeInput::ExitToMainMenu),
            HostCommand::History => {
                let lines = self.engine.history().dialogue_lines();
                self.driver.render_mut().show_list("History", &lines);
            }
            HostCommand::Rescan => self.rescan(),
            HostCommand::NewScenario { name } => self.new_scenario(&name)?,
            HostCommand::Edit(edit) => self.edit(edit)?,
            HostCommand::Help => {
                let lines: Vec<String> = HELP_TEXT.lines().skip(1).map(str::to_string).collect();
                self.driver.render_mut().show_list("Help", &lines);
            }
            HostCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// 把输入交给引擎，拒绝原因由引擎记为提示
    fn send(&mut self, input: RuntimeInput) {
        if let Err(e) = self.engine.handle(input) {
            debug!(error = %e, "引擎拒绝了操作");
        }
    }

    /// 控制台没有菜单按钮：从主菜单直接开始/读档时先进入对应的选择界面
    fn leave_main_menu(&mut self, open: RuntimeInput) {
        if self.engine.state() == &PlaybackState::MainMenu {
            self.send(open);
        }
    }

    fn save_game(&mut self, name: Option<String>) -> HostResult<()> {
        let position = self.engine.position().ok_or(HostError::NotPlaying)?;
        let name = name.unwrap_or_else(|| default_save_name(&position.scenario_name));
        self.saves
            .save(&name, &SaveRecord::from_position(&position))?;
        Ok(())
    }

    fn show_scenarios(&mut self) {
        let names: Vec<String> = self
            .engine
            .store()
            .descriptors()
            .map(|d| d.file_name.clone())
            .collect();
        self.driver.render_mut().show_list("Scenarios", &names);
    }

    fn show_saves(&mut self) {
        let lines: Vec<String> = self
            .saves
            .list_saves()
            .into_iter()
            .map(|name| match self.saves.get_save_info(&name) {
                Some(info) => format!(
                    "{name}: {} #{} ({})",
                    info.scenario_name,
                    info.scene_index + 1,
                    info.player_name
                ),
                None => format!("{name}: ?"),
            })
            .collect();
        self.driver.render_mut().show_list("Saves", &lines);
    }

    fn rescan(&mut self) {
        self.music = self.library.scan_music();
        self.engine.set_music_catalog(self.music.names());
        if let Err(e) = self.engine.rescan(self.library.scan_scenarios()) {
            debug!(error = %e, "游戏中不能重新扫描剧本");
        }
    }

    fn new_scenario(&mut self, name: &str) -> HostResult<()> {
        if !self.editor {
            return Err(HostError::EditorDisabled);
        }
        let descriptor = self
            .library
            .create_scenario(name, self.engine.config().layout)?;
        self.rescan();
        info!(scenario = %descriptor.file_name, "剧本已创建");
        Ok(())
    }

    fn edit(&mut self, edit: EditCommand) -> HostResult<()> {
        if !self.editor {
            return Err(HostError::EditorDisabled);
        }

        let input = match edit {
            EditCommand::Save => return self.save_scenario(),
            EditCommand::Scene { index } => EditorInput::SelectScene { index },
            EditCommand::Append => EditorInput::AppendBlankScene,
            EditCommand::Duplicate => EditorInput::DuplicateScene,
            EditCommand::Remove => EditorInput::RemoveScene,
            EditCommand::Line { slot, text } => EditorInput::SetSpeakerLine { slot, text },
            EditCommand::Name { slot, name } => EditorInput::SetSpeakerName { slot, name },
            EditCommand::Main { text } => EditorInput::SetMainLine { text },
            EditCommand::Button {
                index,
                label,
                target,
            } => EditorInput::SetButton {
                index,
                label,
                target,
            },
            EditCommand::Background { name } => EditorInput::SetBackground { name },
            EditCommand::BackgroundOverlay { name } => EditorInput::SetBackgroundOverlay { name },
            EditCommand::Overlay { name } => EditorInput::SetOverlay { name },
            EditCommand::Music { name } => EditorInput::SetMusic { name },
            EditCommand::Sound { name } => EditorInput::SetSound { name },
            EditCommand::Texture { slot, part, name } => {
                EditorInput::SetSpeakerTexture { slot, part, name }
            }
        };
        self.send(RuntimeInput::Editor(input));
        Ok(())
    }

    fn save_scenario(&mut self) -> HostResult<()> {
        let scenes = self.engine.editing_scenes().ok_or(HostError::NotPlaying)?;
        let file_name = self
            .engine
            .active_scenario()
            .map(|s| s.descriptor.file_name.clone())
            .ok_or(HostError::NotPlaying)?;
        self.library
            .save_scenario(&file_name, scenes, self.engine.config().layout)?;
        Ok(())
    }
}
