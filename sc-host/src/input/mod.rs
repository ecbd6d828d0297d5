//! # Input 模块
//!
//! 把控制台输入的一行文字解析为宿主命令。
//!
//! ## 设计说明
//!
//! - 空行等同于 `next`（相当于空格键/鼠标点击）
//! - 面向玩家的编号从 1 开始，解析后转换为 0-based
//! - 不认识的命令返回 [`HostError::InvalidCommand`]，由主循环提示

use sc_runtime::SpritePart;

use crate::error::{HostError, HostResult};

/// 宿主命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// 列出剧本
    List,
    /// 主菜单 → 选择剧本
    OpenScenarioSelect,
    /// 主菜单 → 选择存档（同时列出存档）
    OpenSaveSelect,
    /// 返回主菜单
    Back,
    /// 开始新游戏
    Start {
        scenario: Option<String>,
        player_name: String,
    },
    /// 读取存档
    Load { name: String },
    /// 保存存档（省略名称时使用默认名）
    Save { name: Option<String> },
    /// 删除存档
    Delete { name: String },
    /// 推进
    Next,
    /// 点击按钮（0-based）
    Choose { index: usize },
    /// 切换暂停菜单
    Pause,
    /// 回到主菜单
    Exit,
    /// 显示对话历史
    History,
    /// 重新扫描游戏目录
    Rescan,
    /// 新建剧本
    NewScenario { name: String },
    /// 编辑器命令
    Edit(EditCommand),
    /// 帮助
    Help,
    /// 退出程序
    Quit,
}

/// 编辑器命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// 跳转到场景（0-based）
    Scene { index: usize },
    Append,
    Duplicate,
    Remove,
    /// NPC 台词
    Line { slot: usize, text: String },
    /// NPC 名字
    Name { slot: usize, name: String },
    /// 主角台词
    Main { text: String },
    /// 按钮：`edit button <n> <文字> | <目标剧本>`
    Button {
        index: usize,
        label: String,
        target: String,
    },
    /// 背景（以下素材名留空表示无）
    Background { name: String },
    /// 背景叠加层
    BackgroundOverlay { name: String },
    /// 全屏叠加层
    Overlay { name: String },
    Music { name: String },
    Sound { name: String },
    /// NPC 立绘：`edit texture <槽位> <body|left|right|head> [纹理]`
    Texture {
        slot: usize,
        part: SpritePart,
        name: String,
    },
    /// 把编辑结果写回剧本文件
    Save,
}

/// 帮助文本
pub const HELP_TEXT: &str = "\
commands:
  list                     列出剧本
  select | scenarios       进入剧本选择
  saves                    进入存档选择
  back                     返回主菜单
  start [剧本] <玩家名>     开始新游戏
  load <存档名>             读取存档
  save [存档名]             保存
  delete <存档名>           删除存档
  next | <回车>             推进
  choose <n>               点击第 n 个按钮
  pause                    暂停/继续
  exit                     回到主菜单
  history                  对话历史
  rescan                   重新扫描游戏目录
  new <剧本名>              新建剧本（编辑器）
  edit scene <n> | append | duplicate | remove | save
  edit line <槽位> <台词>   edit name <槽位> <名字>
  edit main <台词>          edit button <n> <文字> | <目标剧本>
  edit bg | bgoverlay | overlay | music | sound [名称]
  edit texture <槽位> <body|left|right|head> [纹理]
  help                     帮助
  quit                     退出";

impl HostCommand {
    /// 解析一行输入
    pub fn parse(line: &str) -> HostResult<Self> {
        let line = line.trim();
        let (word, rest) = split_word(line);

        let command = match word.to_ascii_lowercase().as_str() {
            "" | "next" => Self::Next,
            "list" => Self::List,
            "select" | "scenarios" => Self::OpenScenarioSelect,
            "saves" => Self::OpenSaveSelect,
            "back" => Self::Back,
            "start" => parse_start(rest).ok_or_else(|| invalid(line))?,
            "load" => Self::Load {
                name: required(rest, line)?,
            },
            "save" => Self::Save {
                name: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "delete" => Self::Delete {
                name: required(rest, line)?,
            },
            "choose" => Self::Choose {
                index: parse_number(rest).ok_or_else(|| invalid(line))?,
            },
            "pause" => Self::Pause,
            "exit" => Self::Exit,
            "history" => Self::History,
            "rescan" => Self::Rescan,
            "new" => Self::NewScenario {
                name: required(rest, line)?,
            },
            "edit" => Self::Edit(parse_edit(rest).ok_or_else(|| invalid(line))?),
            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            _ => return Err(invalid(line)),
        };

        Ok(command)
    }
}

fn parse_start(rest: &str) -> Option<HostCommand> {
    let (first, remainder) = split_word(rest);
    if first.is_empty() {
        return None;
    }

    // 只有一个参数时它是玩家名（故事模式不需要选择剧本）
    if remainder.is_empty() {
        return Some(HostCommand::Start {
            scenario: None,
            player_name: first.to_string(),
        });
    }

    Some(HostCommand::Start {
        scenario: Some(first.to_string()),
        player_name: remainder.to_string(),
    })
}

fn parse_edit(rest: &str) -> Option<EditCommand> {
    let (word, rest) = split_word(rest);
    let command = match word.to_ascii_lowercase().as_str() {
        "scene" => EditCommand::Scene {
            index: parse_number(rest)?,
        },
        "append" => EditCommand::Append,
        "duplicate" => EditCommand::Duplicate,
        "remove" => EditCommand::Remove,
        "save" => EditCommand::Save,
        "line" => {
            let (slot, text) = split_word(rest);
            EditCommand::Line {
                slot: parse_number(slot)?,
                text: text.to_string(),
            }
        }
        "name" => {
            let (slot, name) = split_word(rest);
            EditCommand::Name {
                slot: parse_number(slot)?,
                name: name.to_string(),
            }
        }
        "main" => EditCommand::Main {
            text: rest.to_string(),
        },
        "bg" => EditCommand::Background {
            name: rest.to_string(),
        },
        "bgoverlay" => EditCommand::BackgroundOverlay {
            name: rest.to_string(),
        },
        "overlay" => EditCommand::Overlay {
            name: rest.to_string(),
        },
        "music" => EditCommand::Music {
            name: rest.to_string(),
        },
        "sound" => EditCommand::Sound {
            name: rest.to_string(),
        },
        "texture" => {
            let (slot, rest) = split_word(rest);
            let (part, name) = split_word(rest);
            EditCommand::Texture {
                slot: parse_number(slot)?,
                part: parse_part(part)?,
                name: name.to_string(),
            }
        }
        "button" => {
            let (index, rest) = split_word(rest);
            let (label, target) = rest.split_once('|').unwrap_or((rest, ""));
            EditCommand::Button {
                index: parse_number(index)?,
                label: label.trim().to_string(),
                target: target.trim().to_string(),
            }
        }
        _ => return None,
    };
    Some(command)
}

fn parse_part(word: &str) -> Option<SpritePart> {
    match word.to_ascii_lowercase().as_str() {
        "body" => Some(SpritePart::Body),
        "left" => Some(SpritePart::Left),
        "right" => Some(SpritePart::Right),
        "head" => Some(SpritePart::Head),
        _ => None,
    }
}

/// 拆出第一个单词
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// 解析 1-based 编号为 0-based 索引
fn parse_number(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()?.checked_sub(1)
}

fn required(rest: &str, line: &str) -> HostResult<String> {
    if rest.is_empty() {
        Err(invalid(line))
    } else {
        Ok(rest.to_string())
    }
}

fn invalid(line: &str) -> HostError {
    HostError::InvalidCommand(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_advances() {
        assert_eq!(HostCommand::parse("").unwrap(), HostCommand::Next);
        assert_eq!(HostCommand::parse("  next ").unwrap(), HostCommand::Next);
    }

    #[test]
    fn test_parse_start() {
        assert_eq!(
            HostCommand::parse("start main.sc Alex Smith").unwrap(),
            HostCommand::Start {
                scenario: Some("main.sc".to_string()),
                player_name: "Alex Smith".to_string(),
            }
        );
        assert_eq!(
            HostCommand::parse("start Alex").unwrap(),
            HostCommand::Start {
                scenario: None,
                player_name: "Alex".to_string(),
            }
        );
        assert!(HostCommand::parse("start").is_err());
    }

    #[test]
    fn test_choose_is_one_based() {
        assert_eq!(
            HostCommand::parse("choose 2").unwrap(),
            HostCommand::Choose { index: 1 }
        );
        assert!(HostCommand::parse("choose 0").is_err());
        assert!(HostCommand::parse("choose two").is_err());
    }

    #[test]
    fn test_save_commands() {
        assert_eq!(
            HostCommand::parse("save").unwrap(),
            HostCommand::Save { name: None }
        );
        assert_eq!(
            HostCommand::parse("save before boss").unwrap(),
            HostCommand::Save {
                name: Some("before boss".to_string())
            }
        );
        assert!(HostCommand::parse("load").is_err());
        assert!(HostCommand::parse("delete").is_err());
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            HostCommand::parse("edit scene 3").unwrap(),
            HostCommand::Edit(EditCommand::Scene { index: 2 })
        );
        assert_eq!(
            HostCommand::parse("edit line 1 Hello there").unwrap(),
            HostCommand::Edit(EditCommand::Line {
                slot: 0,
                text: "Hello there".to_string(),
            })
        );
        assert_eq!(
            HostCommand::parse("edit main").unwrap(),
            HostCommand::Edit(EditCommand::Main {
                text: String::new()
            })
        );
        assert_eq!(
            HostCommand::parse("edit button 4 Go left | left.sc").unwrap(),
            HostCommand::Edit(EditCommand::Button {
                index: 3,
                label: "Go left".to_string(),
                target: "left.sc".to_string(),
            })
        );
        assert!(HostCommand::parse("edit teleport").is_err());
    }

    #[test]
    fn test_parse_edit_assets() {
        assert_eq!(
            HostCommand::parse("edit bg park").unwrap(),
            HostCommand::Edit(EditCommand::Background {
                name: "park".to_string()
            })
        );
        assert_eq!(
            HostCommand::parse("edit music").unwrap(),
            HostCommand::Edit(EditCommand::Music {
                name: String::new()
            })
        );
        assert_eq!(
            HostCommand::parse("edit texture 2 head sayori_head").unwrap(),
            HostCommand::Edit(EditCommand::Texture {
                slot: 1,
                part: SpritePart::Head,
                name: "sayori_head".to_string(),
            })
        );
        assert_eq!(
            HostCommand::parse("edit texture 1 body").unwrap(),
            HostCommand::Edit(EditCommand::Texture {
                slot: 0,
                part: SpritePart::Body,
                name: String::new(),
            })
        );
        assert!(HostCommand::parse("edit texture 1 torso monika").is_err());
        assert!(HostCommand::parse("edit texture monika").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = HostCommand::parse("dance").unwrap_err();
        assert!(matches!(err, HostError::InvalidCommand(cmd) if cmd == "dance"));
    }
}
