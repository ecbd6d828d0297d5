//! # Presence 模块
//!
//! 向外部状态服务（聊天软件的“正在玩”状态）报告当前游戏状态。
//!
//! ## 线程模型
//!
//! - 主循环通过 [`PresenceHandle::publish`] 写入快照
//! - 后台线程每秒读取一次快照，变化时转换为 [`PresenceActivity`] 交给服务
//! - 开场动画结束前不报告
//! - 清除运行标志后线程在下一次唤醒时退出

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

/// 轮询间隔
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 主循环发布的状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    /// 是否在游戏中
    pub game_started: bool,
    /// 开场动画是否结束
    pub intro_finished: bool,
    /// 当前剧本文件名
    pub scenario: Option<String>,
    /// 是否为编辑器模式
    pub editor: bool,
}

/// 报告给服务的活动
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceActivity {
    pub details: String,
    pub state: Option<String>,
    pub large_image_key: String,
    /// 开始时间（Unix 秒）
    pub start_timestamp: u64,
}

impl PresenceActivity {
    /// 由快照生成活动
    pub fn from_snapshot(snapshot: &PresenceSnapshot, logo_key: &str, start_timestamp: u64) -> Self {
        let (details, state) = if snapshot.game_started {
            let details = if snapshot.editor {
                "Editing scenario"
            } else {
                "Playing scenario"
            };
            let scenario = snapshot
                .scenario
                .clone()
                .unwrap_or_else(|| "Unknown scenario".to_string());
            (details, Some(scenario))
        } else {
            ("In main menu", None)
        };

        Self {
            details: details.to_string(),
            state,
            large_image_key: logo_key.to_string(),
            start_timestamp,
        }
    }
}

/// 外部状态服务
pub trait PresenceService: Send + 'static {
    /// 更新活动
    fn update(&mut self, activity: &PresenceActivity);
    /// 清除活动（退出时调用）
    fn clear(&mut self);
}

/// 只记录日志的状态服务
#[derive(Debug, Clone, Default)]
pub struct LogPresence {
    app_id: String,
}

impl LogPresence {
    /// 创建状态服务
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }
}

impl PresenceService for LogPresence {
    fn update(&mut self, activity: &PresenceActivity) {
        info!(
            app_id = %self.app_id,
            details = %activity.details,
            state = activity.state.as_deref().unwrap_or(""),
            "更新在线状态"
        );
    }

    fn clear(&mut self) {
        debug!(app_id = %self.app_id, "清除在线状态");
    }
}

/// 轮询器：记录上次报告的快照，只在变化时更新
struct PresencePoller<P> {
    service: P,
    logo_key: String,
    start_timestamp: u64,
    last: Option<PresenceSnapshot>,
}

impl<P: PresenceService> PresencePoller<P> {
    fn new(service: P, logo_key: String) -> Self {
        let start_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            service,
            logo_key,
            start_timestamp,
            last: None,
        }
    }

    /// 检查一次快照，返回是否更新了服务
    fn poll_once(&mut self, snapshot: &PresenceSnapshot) -> bool {
        if !snapshot.intro_finished || self.last.as_ref() == Some(snapshot) {
            return false;
        }

        let activity =
            PresenceActivity::from_snapshot(snapshot, &self.logo_key, self.start_timestamp);
        self.service.update(&activity);
        self.last = Some(snapshot.clone());
        true
    }
}

/// 在线状态后台线程句柄
///
/// 析构时停止线程。
pub struct PresenceHandle {
    snapshot: Arc<RwLock<PresenceSnapshot>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PresenceHandle {
    /// 启动后台线程
    pub fn spawn<P: PresenceService>(service: P, logo_key: impl Into<String>) -> Self {
        Self::spawn_with_interval(service, logo_key, POLL_INTERVAL)
    }

    /// 以指定间隔启动后台线程
    pub fn spawn_with_interval<P: PresenceService>(
        service: P,
        logo_key: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let snapshot = Arc::new(RwLock::new(PresenceSnapshot::default()));
        let running = Arc::new(AtomicBool::new(true));

        let thread_snapshot = Arc::clone(&snapshot);
        let thread_running = Arc::clone(&running);
        let mut poller = PresencePoller::new(service, logo_key.into());

        let spawned = thread::Builder::new()
            .name("presence".to_string())
            .spawn(move || {
                while thread_running.load(Ordering::Acquire) {
                    let current = thread_snapshot
                        .read()
                        .unwrap_or_else(PoisonError::into_inner)
                        .clone();
                    poller.poll_once(&current);
                    thread::park_timeout(interval);
                }
                poller.service.clear();
            });

        let thread = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "无法启动在线状态线程");
                None
            }
        };

        Self {
            snapshot,
            running,
            thread,
        }
    }

    /// 发布新的快照
    pub fn publish(&self, snapshot: PresenceSnapshot) {
        let mut current = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
    }

    /// 当前快照
    pub fn snapshot(&self) -> PresenceSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 线程是否在运行
    pub fn is_running(&self) -> bool {
        self.thread.is_some() && self.running.load(Ordering::Acquire)
    }

    /// 停止并等待线程退出
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            thread.thread().unpark();
            if thread.join().is_err() {
                warn!("在线状态线程异常退出");
            }
        }
    }
}

impl Drop for PresenceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
