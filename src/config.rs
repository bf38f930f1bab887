//! Settings file.
//!
//! Lives at `~/.config/calendar-fixer/config.toml` (or the platform
//! equivalent):
//!
//! ```toml
//! timezone = "Europe/Brussels"
//! courses = ["Math 101", "Algorithms"]
//! collapse_duplicates = true
//! ```
//!
//! `courses` may also be a single comma separated string.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transform::FilterConfig;

pub const DEFAULT_TIMEZONE: &str = "Europe/Brussels";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timezone: String,
    #[serde(deserialize_with = "course_list")]
    pub courses: Vec<String>,
    pub collapse_duplicates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            courses: vec![],
            collapse_duplicates: true,
        }
    }
}

impl Settings {
    /// Loads the settings file, falling back to defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            info!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), courses = settings.courses.len(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calendar-fixer")
            .join("config.toml")
    }

    pub fn into_filter_config(self) -> Result<FilterConfig> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|e| Error::Config(format!("unknown timezone {:?}: {}", self.timezone, e)))?;
        let mut config = FilterConfig::new(tz, self.courses);
        config.collapse_duplicates = self.collapse_duplicates;
        Ok(config)
    }
}

/// Splits `"Math 101, Algorithms,,"` into trimmed, non-empty course names.
pub fn parse_course_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|course| !course.is_empty())
        .map(String::from)
        .collect()
}

fn course_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Courses {
        List(Vec<String>),
        Inline(String),
    }

    Ok(match Courses::deserialize(deserializer)? {
        Courses::List(list) => list,
        Courses::Inline(raw) => parse_course_list(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_to_brussels_and_no_courses() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        let config = settings.into_filter_config().unwrap();
        assert_eq!(config.target_timezone, chrono_tz::Europe::Brussels);
        assert!(config.inclusion_patterns.is_empty());
        assert!(config.collapse_duplicates);
    }

    #[test]
    fn reads_course_list() {
        let settings = Settings::from_toml(
            r#"
timezone = "America/New_York"
courses = ["Math 101", "Algorithms"]
collapse_duplicates = false
"#,
        )
        .unwrap();
        assert_eq!(settings.courses, vec!["Math 101", "Algorithms"]);

        let config = settings.into_filter_config().unwrap();
        assert_eq!(config.target_timezone, chrono_tz::America::New_York);
        assert_eq!(config.inclusion_patterns.len(), 2);
        assert!(!config.collapse_duplicates);
    }

    #[test]
    fn reads_inline_course_string() {
        let settings = Settings::from_toml(r#"courses = " Math 101, Algorithms,, ""#).unwrap();
        assert_eq!(settings.courses, vec!["Math 101", "Algorithms"]);
    }

    #[test]
    fn splits_comma_separated_courses() {
        assert_eq!(parse_course_list("a, b,,c ,"), vec!["a", "b", "c"]);
        assert!(parse_course_list(" , ").is_empty());
    }

    #[test]
    fn unknown_timezone_is_a_config_error() {
        let settings = Settings {
            timezone: String::from("Mars/Olympus_Mons"),
            ..Default::default()
        };
        assert!(matches!(
            settings.into_filter_config(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "courses = [").unwrap();
        assert!(matches!(
            Settings::load_from(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "courses = [\"Physics\"]").unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.courses, vec!["Physics"]);
        assert_eq!(settings.timezone, DEFAULT_TIMEZONE);
    }
}
