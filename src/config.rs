//! Demo driver configuration
//!
//! Read once at startup from an optional JSON file. A missing or unreadable
//! file falls back to defaults so the demo always starts; command-line flags
//! override individual fields afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How well the autopilot plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AutopilotSkill {
    Sloppy,
    #[default]
    Steady,
    Sharp,
}

impl AutopilotSkill {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutopilotSkill::Sloppy => "Sloppy",
            AutopilotSkill::Steady => "Steady",
            AutopilotSkill::Sharp => "Sharp",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sloppy" => Some(AutopilotSkill::Sloppy),
            "steady" | "med" | "medium" => Some(AutopilotSkill::Steady),
            "sharp" => Some(AutopilotSkill::Sharp),
            _ => None,
        }
    }

    /// Maximum paddle speed in field pixels per second
    pub fn paddle_speed(&self) -> f32 {
        match self {
            AutopilotSkill::Sloppy => 420.0,
            AutopilotSkill::Steady => 640.0,
            AutopilotSkill::Sharp => 900.0,
        }
    }

    /// Amplitude of the aim-point jitter in field pixels
    pub fn aim_jitter(&self) -> f32 {
        match self {
            AutopilotSkill::Sloppy => 26.0,
            AutopilotSkill::Steady => 12.0,
            AutopilotSkill::Sharp => 3.0,
        }
    }

    /// Fixed steps the autopilot idles before launching the ball
    pub fn launch_delay_ticks(&self) -> u64 {
        match self {
            AutopilotSkill::Sloppy => 180,
            AutopilotSkill::Steady => 90,
            AutopilotSkill::Sharp => 30,
        }
    }
}

/// Demo session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Autopilot behavior preset
    pub skill: AutopilotSkill,

    // === Session ===
    /// Seed for the autopilot's RNG; same seed, same demo
    pub seed: u64,
    /// Hard stop after this many fixed steps
    pub max_ticks: u64,
    /// Keep restarting (and playing) after a game over or win
    pub auto_restart: bool,

    // === Files ===
    /// PNG level sheet; the built-in sheet when unset
    pub levels: Option<PathBuf>,
    /// Leaderboard file, updated when a run ends
    pub highscores: PathBuf,
    /// Write the final session state as JSON here on exit
    pub dump_session: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            skill: AutopilotSkill::Steady,

            // Session: five minutes at the fixed step rate
            seed: 7,
            max_ticks: 36_000,
            auto_restart: false,

            // Files
            levels: None,
            highscores: PathBuf::from("pixbreak_scores.json"),
            dump_session: None,
        }
    }
}

impl DemoConfig {
    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default demo config");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded demo config from '{}'", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Bad demo config '{}': {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!(
                    "Cannot read demo config '{}': {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
