//! Trigger declarations attached to notes.
//!
//! Triggers describe when a note is meant to surface. Nothing in core ever
//! evaluates them; `config` is stored exactly as supplied.
//!
//! # Invariants
//! - `Trigger::id` is unique within the owning note's trigger list.
//! - `config` is never validated against `kind`.
//! - `Trigger::settings` is a read-only best-effort view and never fails.

use crate::model::note::Mood;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid clock time regex"));

/// Free-form trigger payload, keyed by strings.
pub type TriggerConfig = Map<String, Value>;

/// Category of condition a trigger declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    AppUsage,
    TimeOfDay,
    Location,
    ScreenTime,
    MoodCheckin,
    Manual,
}

impl TriggerType {
    pub const ALL: [TriggerType; 6] = [
        TriggerType::AppUsage,
        TriggerType::TimeOfDay,
        TriggerType::Location,
        TriggerType::ScreenTime,
        TriggerType::MoodCheckin,
        TriggerType::Manual,
    ];

    /// Types offered by the trigger picker, in picker order.
    ///
    /// `Manual` is never offered; it is only produced by imports or seeds.
    pub fn pickable() -> [TriggerType; 5] {
        [
            TriggerType::AppUsage,
            TriggerType::TimeOfDay,
            TriggerType::ScreenTime,
            TriggerType::MoodCheckin,
            TriggerType::Location,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppUsage => "app_usage",
            Self::TimeOfDay => "time_of_day",
            Self::Location => "location",
            Self::ScreenTime => "screen_time",
            Self::MoodCheckin => "mood_checkin",
            Self::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
    }

    /// Default human-readable label for a freshly picked trigger.
    pub fn label(self) -> &'static str {
        match self {
            Self::AppUsage => "App Usage",
            Self::TimeOfDay => "Time of Day",
            Self::Location => "Location",
            Self::ScreenTime => "Screen Time",
            Self::MoodCheckin => "Mood Check-in",
            Self::Manual => "Manual",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::AppUsage => "When using specific apps",
            Self::TimeOfDay => "At specific times",
            Self::Location => "At specific places",
            Self::ScreenTime => "After extended use",
            Self::MoodCheckin => "Based on how you feel",
            Self::Manual => "Whenever you open it",
        }
    }
}

/// A declared condition under which a note should surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    /// Serialized as `type` to match the persisted layout.
    #[serde(rename = "type")]
    pub kind: TriggerType,
    pub label: String,
    #[serde(default)]
    pub config: TriggerConfig,
    pub enabled: bool,
}

impl Trigger {
    /// Builds an enabled trigger with the type's default label and no config.
    pub fn from_type(id: impl Into<String>, kind: TriggerType) -> Self {
        Self {
            id: id.into(),
            kind,
            label: kind.label().to_string(),
            config: TriggerConfig::new(),
            enabled: true,
        }
    }

    /// Replaces the label.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Inserts one config entry, overwriting any previous value.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Decodes the config bag into a typed view for this trigger's kind.
    ///
    /// Unknown keys are ignored and malformed values read as absent.
    pub fn settings(&self) -> TriggerSettings {
        match self.kind {
            TriggerType::AppUsage => TriggerSettings::AppUsage {
                apps: string_list(&self.config, "apps"),
                minutes: minutes(&self.config, "minutes"),
            },
            TriggerType::TimeOfDay => TriggerSettings::TimeOfDay {
                after: clock_time(&self.config, "after"),
                before: clock_time(&self.config, "before"),
            },
            TriggerType::Location => TriggerSettings::Location {
                place: self
                    .config
                    .get("place")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            TriggerType::ScreenTime => TriggerSettings::ScreenTime {
                minutes: minutes(&self.config, "minutes"),
            },
            TriggerType::MoodCheckin => TriggerSettings::MoodCheckin {
                moods: string_list(&self.config, "moods")
                    .iter()
                    .filter_map(|value| Mood::parse(value))
                    .collect(),
            },
            TriggerType::Manual => TriggerSettings::Manual,
        }
    }
}

/// Wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Parses `H:MM` or `HH:MM` (24h).
    pub fn parse(value: &str) -> Option<Self> {
        let caps = CLOCK_TIME_RE.captures(value.trim())?;
        let hour = caps.get(1)?.as_str().parse().ok()?;
        let minute = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { hour, minute })
    }

    pub fn minutes_since_midnight(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

/// Typed, read-only view over a trigger's config bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSettings {
    AppUsage {
        apps: Vec<String>,
        minutes: Option<u32>,
    },
    TimeOfDay {
        after: Option<ClockTime>,
        before: Option<ClockTime>,
    },
    Location {
        place: Option<String>,
    },
    ScreenTime {
        minutes: Option<u32>,
    },
    MoodCheckin {
        moods: Vec<Mood>,
    },
    Manual,
}

fn string_list(config: &TriggerConfig, key: &str) -> Vec<String> {
    config
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn minutes(config: &TriggerConfig, key: &str) -> Option<u32> {
    config
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
}

fn clock_time(config: &TriggerConfig, key: &str) -> Option<ClockTime> {
    config
        .get(key)
        .and_then(Value::as_str)
        .and_then(ClockTime::parse)
}
