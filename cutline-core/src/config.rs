use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use cutline_types::normalize::NormalizeDefaults;
use cutline_types::{normalize_frame_rate, FrameRateInput};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    scheduler: SchedulerFile,
    #[serde(default)]
    refresh: RefreshFile,
    #[serde(default)]
    defaults: DefaultsFile,
}

#[derive(Deserialize, Default)]
struct SchedulerFile {
    ready_poll_interval_ms: Option<u64>,
    ready_attempts: Option<u32>,
}

#[derive(Deserialize, Default)]
struct RefreshFile {
    sort_items: Option<bool>,
    resize_timeline: Option<bool>,
    recompute_duration: Option<bool>,
    rebuild_index: Option<bool>,
    rebuild_settle_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct DefaultsFile {
    frame_rate: Option<[i64; 2]>,
    track_height: Option<f64>,
    track_color: Option<String>,
    clip_color: Option<String>,
    clip_text_color: Option<String>,
}

/// Which post-batch refreshes are enabled, and how the index rebuild settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub sort_items: bool,
    pub resize_timeline: bool,
    pub recompute_duration: bool,
    pub rebuild_index: bool,
    pub rebuild_settle: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            sort_items: true,
            resize_timeline: true,
            recompute_duration: true,
            rebuild_index: true,
            rebuild_settle: Duration::from_millis(150),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub poll_interval: Duration,
    pub attempts: u32,
}

impl ReadinessConfig {
    /// Total time a mutation waits for the document root.
    pub fn budget(&self) -> Duration {
        self.poll_interval * self.attempts
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            attempts: 40,
        }
    }
}

pub struct Config {
    scheduler: SchedulerFile,
    refresh: RefreshFile,
    defaults: DefaultsFile,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        let mut config = Self::embedded();
        if let Some(path) = user_config_path() {
            if path.exists() {
                config.merge_file(&path);
            }
        }
        config
    }

    pub fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Self {
            scheduler: base.scheduler,
            refresh: base.refresh,
            defaults: base.defaults,
        }
    }

    /// Embedded defaults overridden by `contents`.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let user: ConfigFile = toml::from_str(contents).map_err(|e| e.to_string())?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    /// Overlay a config file. A malformed or unreadable file is logged and ignored.
    pub fn merge_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => self.merge(user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_scheduler(&mut self.scheduler, user.scheduler);
        merge_refresh(&mut self.refresh, user.refresh);
        merge_defaults(&mut self.defaults, user.defaults);
    }

    pub fn readiness(&self) -> ReadinessConfig {
        let fallback = ReadinessConfig::default();
        ReadinessConfig {
            poll_interval: self
                .scheduler
                .ready_poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(fallback.poll_interval),
            attempts: self.scheduler.ready_attempts.unwrap_or(fallback.attempts).max(1),
        }
    }

    pub fn refresh(&self) -> RefreshConfig {
        let fallback = RefreshConfig::default();
        RefreshConfig {
            sort_items: self.refresh.sort_items.unwrap_or(fallback.sort_items),
            resize_timeline: self.refresh.resize_timeline.unwrap_or(fallback.resize_timeline),
            recompute_duration: self
                .refresh
                .recompute_duration
                .unwrap_or(fallback.recompute_duration),
            rebuild_index: self.refresh.rebuild_index.unwrap_or(fallback.rebuild_index),
            rebuild_settle: self
                .refresh
                .rebuild_settle_ms
                .map(Duration::from_millis)
                .unwrap_or(fallback.rebuild_settle),
        }
    }

    /// Fallback values for clip and track normalization.
    pub fn normalize_defaults(&self) -> NormalizeDefaults {
        let fallback = NormalizeDefaults::default();
        NormalizeDefaults {
            frame_rate: self
                .defaults
                .frame_rate
                .map(|[num, den]| {
                    normalize_frame_rate(&FrameRateInput::Ratio {
                        num: Some(num as f64),
                        den: Some(den as f64),
                    })
                })
                .unwrap_or(fallback.frame_rate),
            track_height: self.defaults.track_height.unwrap_or(fallback.track_height),
            track_color: self
                .defaults
                .track_color
                .clone()
                .unwrap_or(fallback.track_color),
            clip_color: self.defaults.clip_color.clone().or(fallback.clip_color),
            clip_text_color: self
                .defaults
                .clip_text_color
                .clone()
                .or(fallback.clip_text_color),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::embedded()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cutline").join("config.toml"))
}

fn merge_scheduler(base: &mut SchedulerFile, user: SchedulerFile) {
    if user.ready_poll_interval_ms.is_some() {
        base.ready_poll_interval_ms = user.ready_poll_interval_ms;
    }
    if user.ready_attempts.is_some() {
        base.ready_attempts = user.ready_attempts;
    }
}

fn merge_refresh(base: &mut RefreshFile, user: RefreshFile) {
    if user.sort_items.is_some() {
        base.sort_items = user.sort_items;
    }
    if user.resize_timeline.is_some() {
        base.resize_timeline = user.resize_timeline;
    }
    if user.recompute_duration.is_some() {
        base.recompute_duration = user.recompute_duration;
    }
    if user.rebuild_index.is_some() {
        base.rebuild_index = user.rebuild_index;
    }
    if user.rebuild_settle_ms.is_some() {
        base.rebuild_settle_ms = user.rebuild_settle_ms;
    }
}

fn merge_defaults(base: &mut DefaultsFile, user: DefaultsFile) {
    if user.frame_rate.is_some() {
        base.frame_rate = user.frame_rate;
    }
    if user.track_height.is_some() {
        base.track_height = user.track_height;
    }
    if user.track_color.is_some() {
        base.track_color = user.track_color;
    }
    if user.clip_color.is_some() {
        base.clip_color = user.clip_color;
    }
    if user.clip_text_color.is_some() {
        base.clip_text_color = user.clip_text_color;
    }
}
