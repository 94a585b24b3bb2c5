//! Application-level configuration loading: the canonical challenge library and
//! the advantage catalogue.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::library::{CanonicalCategory, CanonicalChallenge, ChallengeLibrary};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "RECORD_LABEL_LEAGUE_CONFIG_PATH";
/// Advantage awarded to weekly winners when the config does not name one.
const DEFAULT_WEEKLY_ADVANTAGE: &str = "Veto";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    library: ChallengeLibrary,
    starting_advantages: Vec<String>,
    weekly_advantage: String,
    default_chaos_week: Option<u32>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in
    /// library and advantage catalogue.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        categories = app_config.library.categories().len(),
                        advantages = app_config.starting_advantages.len(),
                        "loaded challenge library from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Canonical challenge library.
    pub fn library(&self) -> &ChallengeLibrary {
        &self.library
    }

    /// Advantages players may pick before week 1.
    pub fn starting_advantages(&self) -> &[String] {
        &self.starting_advantages
    }

    /// Advantage awarded to the winner(s) of a week.
    pub fn weekly_advantage(&self) -> &str {
        &self.weekly_advantage
    }

    /// Chaos week used when a season is created without one.
    pub fn default_chaos_week(&self) -> Option<u32> {
        self.default_chaos_week
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            starting_advantages: default_advantages(),
            weekly_advantage: DEFAULT_WEEKLY_ADVANTAGE.to_owned(),
            default_chaos_week: Some(5),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    advantages: Option<RawAdvantages>,
    #[serde(default)]
    default_chaos_week: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAdvantages {
    starting: Vec<String>,
    weekly: String,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    challenges: Vec<RawChallenge>,
}

#[derive(Debug, Deserialize)]
struct RawChallenge {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let library = if value.categories.is_empty() {
            defaults.library
        } else {
            ChallengeLibrary::new(value.categories.into_iter().map(Into::into).collect())
        };
        let (starting_advantages, weekly_advantage) = match value.advantages {
            Some(advantages) if !advantages.starting.is_empty() => {
                (advantages.starting, advantages.weekly)
            }
            _ => (defaults.starting_advantages, defaults.weekly_advantage),
        };

        Self {
            library,
            starting_advantages,
            weekly_advantage,
            default_chaos_week: value.default_chaos_week.or(defaults.default_chaos_week),
        }
    }
}

impl From<RawCategory> for CanonicalCategory {
    fn from(value: RawCategory) -> Self {
        Self {
            name: value.name,
            challenges: value
                .challenges
                .into_iter()
                .map(|challenge| CanonicalChallenge {
                    id: challenge.id,
                    title: challenge.title,
                    description: challenge.description,
                })
                .collect(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn default_advantages() -> Vec<String> {
    ["Veto", "Steal", "Double Points", "Extra Track"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Built-in library shipped with the binary.
fn default_library() -> ChallengeLibrary {
    let category = |name: &str, prefix: &str, entries: &[(&str, &str)]| CanonicalCategory {
        name: name.to_owned(),
        challenges: entries
            .iter()
            .enumerate()
            .map(|(index, (title, description))| CanonicalChallenge {
                id: format!("{prefix}-{}", index + 1),
                title: (*title).to_owned(),
                description: (*description).to_owned(),
            })
            .collect(),
    };

    ChallengeLibrary::new(vec![
        category(
            "Decades",
            "decades",
            &[
                ("Sixties", "Only songs released between 1960 and 1969"),
                ("Seventies", "Only songs released between 1970 and 1979"),
                ("Eighties", "Only songs released between 1980 and 1989"),
                ("Nineties", "Only songs released between 1990 and 1999"),
                ("Y2K", "Only songs released between 2000 and 2009"),
            ],
        ),
        category(
            "Moods",
            "moods",
            &[
                ("Heartbreak", "Songs for the morning after"),
                ("Road Trip", "Windows down, volume up"),
                ("Rainy Day", "Songs for staying inside"),
                ("Victory Lap", "Songs that feel like winning"),
                ("Late Night", "Songs for after midnight"),
            ],
        ),
        category(
            "Genres",
            "genres",
            &[
                ("Disco", "Four on the floor"),
                ("Punk", "Three chords and the truth"),
                ("Country", "Songs with a story"),
                ("Hip-Hop", "Beats and bars"),
                ("Shoegaze", "Walls of guitar"),
            ],
        ),
        category(
            "Wildcards",
            "wild",
            &[
                ("Covers", "Covers that beat the original"),
                ("One-Hit Wonders", "Artists with exactly one hit"),
                ("Soundtracks", "Songs first heard in a film"),
                ("Duets", "Two voices, one song"),
                ("Deep Cuts", "Album tracks that were never singles"),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::board::MIN_CHALLENGES_TO_LOCK;

    #[test]
    fn built_in_library_can_fill_a_lockable_board() {
        let config = AppConfig::default();
        let total: usize = config
            .library()
            .categories()
            .iter()
            .map(|category| category.challenges.len())
            .sum();
        assert!(total >= MIN_CHALLENGES_TO_LOCK);
        assert!(config.library().challenge("moods-3").is_some());
    }

    #[test]
    fn partial_config_keeps_default_advantages() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"categories":[{"name":"Decades","challenges":[{"id":"d1","title":"Sixties"}]}]}"#,
        )
        .unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.library().categories().len(), 1);
        assert_eq!(config.weekly_advantage(), DEFAULT_WEEKLY_ADVANTAGE);
        assert_eq!(config.starting_advantages().len(), 4);
        assert_eq!(config.default_chaos_week(), Some(5));
    }
}
