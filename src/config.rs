use chrono::NaiveTime;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CategoryRule;
use crate::domain::{ScheduleSlot, order_slots};

/// Name of the per-output-directory state file.
pub const STATE_FILE_NAME: &str = ".playlist_state.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel name written into every program
    pub channel: String,
    /// Root of the media library
    pub video_directory: PathBuf,
    /// Root for generated programs and the state file
    pub output_directory: PathBuf,
    /// Category for folders no rule matches
    pub default_category: String,
    /// Ordered folder-name rules, first match wins
    pub categories: Vec<CategoryRule>,
    pub schedule: ScheduleConfig,
    pub identifier: IdentifierConfig,
    pub features: FeatureConfig,
    pub bookends: BookendConfig,
    pub selection: SelectionConfig,
    pub fillers: FillerConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Wall-clock time the broadcast day starts at
    pub day_start: NaiveTime,
    pub target_duration_hours: f64,
    /// `HH:MM:SS` -> category. Bookend content is not listed here; the
    /// bookends section places it.
    pub fixed_slots: BTreeMap<String, String>,
    pub strict_fixed_slots: bool,
    /// Fast-forward to a slot when it is at most this far ahead
    pub slot_lookahead_secs: f64,
    /// Cursor jump when nothing can be scheduled
    pub skip_interval_secs: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let fixed_slots = [
            ("07:14:00", "molitve"),
            ("13:00:00", "serije"),
            ("18:00:00", "molitve"),
            ("19:00:00", "deciji"),
            ("20:00:00", "serije"),
            ("23:00:00", "serije"),
        ]
        .into_iter()
        .map(|(time, category)| (time.to_string(), category.to_string()))
        .collect();

        Self {
            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            target_duration_hours: 24.0,
            fixed_slots,
            strict_fixed_slots: false,
            slot_lookahead_secs: 300.0,
            skip_interval_secs: 900.0,
        }
    }
}

impl ScheduleConfig {
    pub fn target_secs(&self) -> f64 {
        self.target_duration_hours * 3600.0
    }

    /// Fixed slots ordered by offset from `day_start`.
    pub fn slots(&self) -> crate::Result<Vec<ScheduleSlot>> {
        let slots = self
            .fixed_slots
            .iter()
            .map(|(time, category)| ScheduleSlot::parse(time, category.as_str()))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(order_slots(slots, self.day_start))
    }
}

/// Station identifier ("spica") policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierConfig {
    /// File name (or unique part of it) of the identifier clip
    pub file: String,
    /// Category that identifier clips resolve to
    pub category: String,
    pub every_n: u32,
    pub after_every_item: bool,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            file: "SPICA_BlagovestiTV.mp4".to_string(),
            category: "spica".to_string(),
            every_n: 3,
            after_every_item: false,
        }
    }
}

impl IdentifierConfig {
    /// Content items required between two identifiers.
    pub fn threshold(&self) -> u32 {
        if self.after_every_item { 1 } else { self.every_n }
    }
}

/// Daily-repeating feature categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub categories: Vec<String>,
    /// Feature category that progresses episode by episode
    pub sequential: Option<String>,
    pub max_plays_per_day: u32,
    pub windows: Vec<HourWindow>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            categories: vec!["serije".to_string(), "dokumentarni".to_string(), "deciji".to_string()],
            sequential: Some("serije".to_string()),
            max_plays_per_day: 3,
            windows: vec![HourWindow::new(10, 12), HourWindow::new(16, 18), HourWindow::new(20, 22)],
        }
    }
}

/// Half-open range of wall-clock hours, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour < self.end
    }
}

/// Reserved morning and evening anchor content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookendConfig {
    pub morning: Option<String>,
    pub evening: Option<String>,
    /// Share of the target window after which the evening anchor airs
    pub evening_at_fraction: f64,
}

impl Default for BookendConfig {
    fn default() -> Self {
        Self {
            morning: Some("psaltir".to_string()),
            evening: Some("psaltir".to_string()),
            evening_at_fraction: 0.68,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub recurrence_exclusion_days: i64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            recurrence_exclusion_days: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FillerConfig {
    pub tiers: Vec<FillerTier>,
    /// Gaps at or below this many seconds are not filled
    pub tolerance_secs: f64,
}

impl Default for FillerConfig {
    fn default() -> Self {
        Self {
            tiers: vec![FillerTier::new("15min", 0.0), FillerTier::new("30min", 1500.0)],
            tolerance_secs: 5.0,
        }
    }
}

impl FillerConfig {
    /// The tier with the largest threshold not above `gap`.
    pub fn tier_for(&self, gap: f64) -> Option<&FillerTier> {
        self.tiers
            .iter()
            .filter(|tier| tier.min_gap_secs <= gap)
            .max_by(|a, b| a.min_gap_secs.total_cmp(&b.min_gap_secs))
    }

    pub fn is_filler(&self, category: &str) -> bool {
        self.tiers.iter().any(|tier| tier.category == category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerTier {
    pub category: String,
    pub min_gap_secs: f64,
}

impl FillerTier {
    pub fn new(category: impl Into<String>, min_gap_secs: f64) -> Self {
        Self {
            category: category.into(),
            min_gap_secs,
        }
    }
}

/// External duration probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub command: String,
    pub timeout_ms: u64,
    pub default_duration_secs: f64,
    pub extensions: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: "ffprobe".to_string(),
            timeout_ms: 10000,
            default_duration_secs: 900.0,
            extensions: ["mp4", "mkv", "mov", "avi", "flv"].iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: "Channel 1".to_string(),
            video_directory: PathBuf::from("/var/lib/ffplayout/tv-media/emisije"),
            output_directory: PathBuf::from("/var/lib/ffplayout/playlists"),
            default_category: "ostalo".to_string(),
            categories: CategoryRule::defaults(),
            schedule: ScheduleConfig::default(),
            identifier: IdentifierConfig::default(),
            features: FeatureConfig::default(),
            bookends: BookendConfig::default(),
            selection: SelectionConfig::default(),
            fillers: FillerConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", project_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config = Self::from_yaml(&content)?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.schedule.target_duration_hours <= 0.0 {
            eyre::bail!("schedule.target_duration_hours must be > 0");
        }
        if self.schedule.skip_interval_secs <= 0.0 {
            eyre::bail!("schedule.skip_interval_secs must be > 0");
        }
        self.schedule.slots().context("schedule.fixed_slots")?;
        if !(self.bookends.evening_at_fraction > 0.0 && self.bookends.evening_at_fraction <= 1.0) {
            eyre::bail!("bookends.evening_at_fraction must be in (0, 1]");
        }
        if self.categories.is_empty() {
            eyre::bail!("categories must not be empty");
        }
        if !self.identifier.after_every_item && self.identifier.every_n == 0 {
            eyre::bail!("identifier.every_n must be > 0");
        }
        if self.probe.default_duration_secs <= 0.0 {
            eyre::bail!("probe.default_duration_secs must be > 0");
        }
        if let Some(sequential) = &self.features.sequential
            && !self.features.categories.contains(sequential)
        {
            eyre::bail!("features.sequential '{}' is not a feature category", sequential);
        }
        Ok(())
    }

    /// Location of the persisted playback state.
    pub fn state_path(&self) -> PathBuf {
        self.output_directory.join(STATE_FILE_NAME)
    }
}
