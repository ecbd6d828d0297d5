//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 sc-runtime 覆盖率
//! - `scenario-check`: 检查剧本文件（容错跳过的行、未闭合的块、素材引用、按钮目标）

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as ClapParser, Subcommand};
use sc_runtime::{Parser, Scene, SceneLayout};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

#[derive(ClapParser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 sc-runtime 覆盖率报告
    CovRuntime,
    /// 检查剧本文件
    ScenarioCheck {
        /// 游戏根目录
        #[arg(long, default_value = "game")]
        root: PathBuf,

        /// 按扩展场景格式解析
        #[arg(long)]
        advanced: bool,

        /// 要检查的文件或目录（默认：<root>/scenarios）
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Commands::CheckAll => {
            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Commands::CovRuntime => {
            if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
                anyhow::bail!(
                    "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
                );
            }

            eprintln!("\n==> cargo llvm-cov -p sc-runtime --html");
            cmd!(sh, "cargo llvm-cov -p sc-runtime --html").run()?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::ScenarioCheck {
            root,
            advanced,
            path,
        } => {
            let layout = SceneLayout::from_flag(advanced);
            scenario_check(&root, path.as_deref(), layout)?;
        }
    }

    Ok(())
}

//=============================================================================
// scenario-check 命令实现
//=============================================================================

/// 检查结果
#[derive(Default)]
struct ScenarioCheckResult {
    /// 检查的剧本数量
    scenarios_checked: usize,
    /// 没有任何完整场景的剧本
    empty_scenarios: Vec<String>,
    /// 警告信息
    warnings: Vec<String>,
}

/// 执行剧本检查
fn scenario_check(root: &Path, path: Option<&Path>, layout: SceneLayout) -> anyhow::Result<()> {
    let scenarios_dir = root.join("scenarios");
    let target = path.map_or_else(|| scenarios_dir.clone(), Path::to_path_buf);

    let files = if target.is_file() {
        vec![target]
    } else if target.is_dir() {
        collect_scenario_files(&target)
    } else {
        anyhow::bail!("路径不存在: {}", target.display());
    };

    if files.is_empty() {
        eprintln!("未找到剧本文件（.sc）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个剧本文件...\n", files.len());

    let known_scenarios: BTreeSet<String> = collect_scenario_files(&scenarios_dir)
        .iter()
        .filter_map(|p| Some(p.file_name()?.to_string_lossy().to_string()))
        .collect();
    let parser = Parser::new(layout);
    let mut result = ScenarioCheckResult::default();

    for file in &files {
        check_scenario_file(file, root, &parser, &known_scenarios, &mut result);
    }

    print_check_result(&result);

    if !result.empty_scenarios.is_empty() {
        anyhow::bail!("剧本检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有剧本文件
fn collect_scenario_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "sc"))
        .collect()
}

/// 检查单个剧本文件
fn check_scenario_file(
    file: &Path,
    root: &Path,
    parser: &Parser,
    known_scenarios: &BTreeSet<String>,
    result: &mut ScenarioCheckResult,
) {
    let id = file.display().to_string();
    result.scenarios_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            result.warnings.push(format!("{id}: 无法读取文件 - {e}"));
            result.empty_scenarios.push(id);
            return;
        }
    };

    let report = parser.parse_with_report(&content);
    eprintln!("{id}: {} 个场景", report.scenes.len());

    for skipped in &report.skipped_lines {
        result.warnings.push(format!(
            "{id}:{}: 字段数 {} 不符合块内第 {} 行的格式，已跳过",
            skipped.line_number, skipped.field_count, skipped.stage
        ));
    }
    if report.unterminated_blocks > 0 {
        result.warnings.push(format!(
            "{id}: {} 个场景块没有结束标记",
            report.unterminated_blocks
        ));
    }
    if report.scenes.is_empty() {
        result.empty_scenarios.push(id.clone());
    }

    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let textures_dir = root.join("textures").join(&stem);
    let sounds_dir = root.join("sounds");

    for (index, scene) in report.scenes.iter().enumerate() {
        let at = format!("{id} #{}", index + 1);
        for texture in scene_textures(scene) {
            if !textures_dir.join(format!("{texture}.png")).exists() {
                result.warnings.push(format!("{at}: 纹理不存在 {texture}"));
            }
        }
        for track in [&scene.music, &scene.sound].into_iter().flatten() {
            let found = ["mp3", "ogg"]
                .iter()
                .any(|ext| sounds_dir.join(format!("{track}.{ext}")).exists());
            if !found {
                result.warnings.push(format!("{at}: 音频不存在 {track}"));
            }
        }
        for target in scene.buttons.iter().filter_map(|b| b.target.as_ref()) {
            if !known_scenarios.contains(target) {
                result
                    .warnings
                    .push(format!("{at}: 按钮目标剧本不存在 {target}"));
            }
        }
    }
}

/// 场景引用的全部纹理名
fn scene_textures(scene: &Scene) -> Vec<&str> {
    let mut names: Vec<&str> = [&scene.background, &scene.background_overlay, &scene.overlay]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .collect();
    for speaker in &scene.speakers {
        names.extend(
            [
                &speaker.texture,
                &speaker.texture_left,
                &speaker.texture_right,
                &speaker.texture_head,
            ]
            .into_iter()
            .filter_map(|t| t.as_deref()),
        );
    }
    names
}

/// 输出检查结果
fn print_check_result(result: &ScenarioCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个剧本", result.scenarios_checked);
    eprintln!();

    for warning in &result.warnings {
        eprintln!("[WARN] {warning}");
    }
    for id in &result.empty_scenarios {
        eprintln!("[ERROR] {id}: 没有可播放的场景");
    }

    let error_count = result.empty_scenarios.len();
    let warn_count = result.warnings.len();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
