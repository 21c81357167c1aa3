use crate::error::{NotesError, Result};
use crate::model::{parse_priority, MAX_PRIORITY};
use crate::query::{Column, SortKey};
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
const DEFAULT_DUE_FORMAT: &str = "%d.%m.%Y";
const DEFAULT_PRIORITY: u8 = 3;

/// Puts config, cache and the default remote directory under one root.
pub const HOME_ENV: &str = "GNOTES_HOME";

/// Keys accepted by [`Config::get`] and [`Config::set`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "timeFormat",
    "dueFormat",
    "useColor",
    "usePriority",
    "useDue",
    "defaultTags",
    "defaultPriority",
    "defaultCategory",
    "remoteDir",
    "cachedChecksum",
];

/// Which column listings are sorted by when no order is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "prio")]
    Prio,
    #[serde(rename = "due")]
    Due,
}

impl Category {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "" => Ok(Category::None),
            "prio" => Ok(Category::Prio),
            "due" => Ok(Category::Due),
            other => Err(NotesError::Validation(format!(
                "Invalid category \"{}\". Use either empty, \"prio\" or \"due\"",
                other
            ))),
        }
    }

    pub fn default_sort_keys(self) -> Vec<SortKey> {
        match self {
            Category::None => Vec::new(),
            Category::Prio => vec![SortKey::desc(Column::Priority)],
            Category::Due => vec![SortKey::asc(Column::Due)],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::None => "",
            Category::Prio => "prio",
            Category::Due => "due",
        })
    }
}

/// Machine specific look & feel, stored as `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Checksum of the remote document the local snapshot was taken from
    pub cached_checksum: String,
    /// strftime format for created/updated timestamps
    pub time_format: String,
    /// strftime format for due dates, used for both input and display
    pub due_format: String,
    pub use_color: bool,
    pub use_priority: bool,
    pub use_due: bool,
    /// Tags added to every new note
    pub default_tags: Vec<String>,
    pub default_priority: u8,
    pub default_category: Category,
    /// Directory holding the remote document (a cloud-synced folder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cached_checksum: String::new(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            due_format: DEFAULT_DUE_FORMAT.to_string(),
            use_color: true,
            use_priority: true,
            use_due: true,
            default_tags: Vec::new(),
            default_priority: DEFAULT_PRIORITY,
            default_category: Category::None,
            remote_dir: None,
        }
    }
}

impl Config {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotesError::Io)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| NotesError::Config(format!("{}: {}", config_path.display(), e)))?;
        config
            .check()
            .map_err(|e| NotesError::Config(format!("{}: {}", config_path.display(), e)))?;
        Ok(config)
    }

    /// Rejects values `set` would have refused, so a hand-edited file cannot
    /// reach the formatters.
    fn check(&self) -> Result<()> {
        validate_format(&self.time_format)?;
        validate_format(&self.due_format)?;
        if self.default_priority > MAX_PRIORITY {
            return Err(NotesError::Validation(format!(
                "Default priority should be in range 0-{}",
                MAX_PRIORITY
            )));
        }
        Ok(())
    }

    /// Like [`Config::load`], but writes the defaults out on first use.
    pub fn init<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        if config_dir.join(CONFIG_FILENAME).exists() {
            return Self::load(config_dir);
        }
        let config = Self::default();
        config.save(config_dir)?;
        log::info!("wrote default config to {}", config_dir.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotesError::Io)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(NotesError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(NotesError::Io)?;
        Ok(())
    }

    pub fn default_sort_keys(&self) -> Vec<SortKey> {
        self.default_category.default_sort_keys()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "cachedChecksum" => self.cached_checksum.clone(),
            "timeFormat" => self.time_format.clone(),
            "dueFormat" => self.due_format.clone(),
            "useColor" => self.use_color.to_string(),
            "usePriority" => self.use_priority.to_string(),
            "useDue" => self.use_due.to_string(),
            "defaultTags" => self.default_tags.join(","),
            "defaultPriority" => self.default_priority.to_string(),
            "defaultCategory" => self.default_category.to_string(),
            "remoteDir" => self
                .remote_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "timeFormat" => self.time_format = validate_format(value)?,
            "dueFormat" => self.due_format = validate_format(value)?,
            "useColor" => self.use_color = parse_bool(value)?,
            "usePriority" => self.use_priority = parse_bool(value)?,
            "useDue" => self.use_due = parse_bool(value)?,
            "defaultTags" => {
                let mut tags: Vec<String> = Vec::new();
                for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    if !tags.iter().any(|t| t == tag) {
                        tags.push(tag.to_string());
                    }
                }
                self.default_tags = tags;
            }
            "defaultPriority" => {
                self.default_priority = parse_priority(value).map_err(|_| {
                    NotesError::Validation(format!(
                        "Default priority should be in range 0-{}",
                        MAX_PRIORITY
                    ))
                })?
            }
            "defaultCategory" => self.default_category = Category::parse(value)?,
            "remoteDir" => {
                self.remote_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "cachedChecksum" => {
                return Err(NotesError::Config(
                    "cachedChecksum is managed by sync and cannot be set".to_string(),
                ))
            }
            other => return Err(NotesError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "no" | "n" | "0" | "off" => Ok(false),
        _ => Err(NotesError::Validation(format!(
            "Expected a yes/no value, got \"{}\"",
            value
        ))),
    }
}

fn validate_format(value: &str) -> Result<String> {
    if value.is_empty() || StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        return Err(NotesError::Validation(format!(
            "Invalid time format \"{}\"",
            value
        )));
    }
    Ok(value.to_string())
}

/// Where gnotes keeps its files on this machine.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Remote directory used when the config does not name one
    pub default_remote_dir: PathBuf,
}

impl AppPaths {
    /// `$GNOTES_HOME` if set, otherwise the platform directories.
    pub fn discover() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
            return Ok(Self::under(PathBuf::from(home)));
        }

        let dirs = ProjectDirs::from("com", "gnotes", "gnotes").ok_or_else(|| {
            NotesError::Config("Could not determine the home directory".to_string())
        })?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
            default_remote_dir: dirs.data_dir().join("remote"),
        })
    }

    pub fn under(root: PathBuf) -> Self {
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            default_remote_dir: root.join("remote"),
        }
    }

    pub fn remote_dir(&self, config: &Config) -> PathBuf {
        config
            .remote_dir
            .clone()
            .unwrap_or_else(|| self.default_remote_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.time_format, "%d.%m.%Y %H:%M");
        assert_eq!(config.due_format, "%d.%m.%Y");
        assert!(config.use_color && config.use_priority && config.use_due);
        assert_eq!(config.default_priority, 3);
        assert_eq!(config.default_category, Category::None);
        assert!(config.default_sort_keys().is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut config = Config::default();
        config.default_category = Category::Prio;
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["defaultCategory"], "prio");
        assert_eq!(json["timeFormat"], "%d.%m.%Y %H:%M");
        assert!(json.get("remoteDir").is_none());

        let parsed: Config = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"useColor": false}"#).unwrap();
        assert!(!config.use_color);
        assert_eq!(config.default_priority, 3);
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("defaultPriority", "5").unwrap();
        assert_eq!(config.default_priority, 5);
        assert!(config.set("defaultPriority", "6").is_err());

        config.set("defaultCategory", "due").unwrap();
        assert_eq!(config.default_sort_keys(), vec![SortKey::asc(Column::Due)]);
        assert!(config.set("defaultCategory", "size").is_err());

        config.set("useDue", "no").unwrap();
        assert!(!config.use_due);
        assert!(config.set("useDue", "maybe").is_err());

        assert!(config.set("timeFormat", "%Y-%m-%d %H:%M").is_ok());
        assert!(config.set("timeFormat", "%Q").is_err());

        assert!(config.set("cachedChecksum", "abc").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn default_tags_are_deduplicated() {
        let mut config = Config::default();
        config.set("defaultTags", "work, home,work,,").unwrap();
        assert_eq!(config.default_tags, vec!["work", "home"]);
        assert_eq!(config.get("defaultTags").unwrap(), "work,home");
    }

    #[test]
    fn every_listed_key_can_be_read() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "{}", key);
        }
        assert!(config.get("bogus").is_none());
    }

    #[test]
    fn init_writes_defaults_then_loads_them() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");

        let config = Config::init(&config_dir).unwrap();
        assert!(config_dir.join(CONFIG_FILENAME).exists());
        assert_eq!(config, Config::default());

        let mut changed = config.clone();
        changed.set("dueFormat", "%Y-%m-%d").unwrap();
        changed.save(&config_dir).unwrap();
        assert_eq!(Config::init(&config_dir).unwrap().due_format, "%Y-%m-%d");
    }

    #[test]
    fn load_rejects_hand_edited_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        fs::write(&path, r#"{"timeFormat": "%Q"}"#).unwrap();
        assert!(matches!(Config::load(dir.path()), Err(NotesError::Config(_))));

        fs::write(&path, r#"{"dueFormat": ""}"#).unwrap();
        assert!(matches!(Config::load(dir.path()), Err(NotesError::Config(_))));

        fs::write(&path, r#"{"defaultPriority": 9}"#).unwrap();
        assert!(matches!(Config::init(dir.path()), Err(NotesError::Config(_))));

        fs::write(&path, r#"{"dueFormat": "%Y-%m-%d"}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().due_format, "%Y-%m-%d");
    }

    #[test]
    fn app_paths_under_root() {
        let paths = AppPaths::under(PathBuf::from("/tmp/gn"));
        assert_eq!(paths.config_dir, PathBuf::from("/tmp/gn/config"));
        let mut config = Config::default();
        assert_eq!(paths.remote_dir(&config), PathBuf::from("/tmp/gn/remote"));
        config.remote_dir = Some(PathBuf::from("/sync/notes"));
        assert_eq!(paths.remote_dir(&config), PathBuf::from("/sync/notes"));
    }
}
