//! 剧本引擎宿主程序（命令行模式）
//!
//! 从标准输入逐行读取命令，把每一帧输出到标准输出。

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sc_host::{
    App, AppConfig, ConsoleRenderer, Flow, HostCommand, LogAudio, LogPresence, PresenceHandle,
    Translations,
};

#[derive(Parser)]
#[command(name = "sc-host")]
#[command(about = "剧本驱动的视觉小说引擎")]
#[command(version)]
struct Cli {
    /// 启用剧本编辑器
    #[arg(long)]
    scenario_editor: bool,

    /// 使用扩展场景格式（背景叠加层、分层立绘、全屏叠加层）
    #[arg(long)]
    advanced_scenes: bool,

    /// 不启动在线状态线程
    #[arg(long)]
    disable_presence: bool,

    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 游戏根目录（覆盖配置文件）
    #[arg(long)]
    root: Option<PathBuf>,

    /// 跳过开场动画
    #[arg(long)]
    skip_intro: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config);
    if let Some(root) = cli.root {
        config.game_root = root;
    }
    if cli.advanced_scenes {
        config.advanced_scenes = true;
    }
    if cli.disable_presence {
        config.presence.enabled = false;
    }
    config.validate().context("配置无效")?;

    let translations = Translations::load_dir(&config.translations_dir());
    let language = config.game.menu_language.clone();
    let renderer = ConsoleRenderer::new(io::stdout()).with_translations(translations, language);

    let presence = config.presence.enabled.then(|| {
        PresenceHandle::spawn(
            LogPresence::new(config.presence.app_id.clone()),
            config.presence.logo_key.clone(),
        )
    });

    let mut app = App::new(config, cli.scenario_editor, renderer, LogAudio::new())
        .context("无法初始化游戏目录")?;
    if let Some(presence) = presence {
        app = app.with_presence(presence);
    }

    app.run_intro(cli.skip_intro);
    app.settle();

    for line in io::stdin().lock().lines() {
        let line = line.context("读取标准输入失败")?;

        let command = match HostCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        match app.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => warn!("{e}"),
        }
        app.settle();
    }

    info!("退出");
    Ok(())
}
