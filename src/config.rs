//! Runtime settings: optional YAML file, then environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;
use url::Url;

use crate::error::Error;
use crate::matching::{FuzzyMatcher, Similarity, DEFAULT_CUTOFF};
use crate::vocab::ColumnMap;

pub const CONFIG_ENV: &str = "PROJECT_FORECAST_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "forecast.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub users_path: PathBuf,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub match_cutoff: f64,
    pub similarity: Similarity,
    pub columns: ColumnMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("ml_model/data/projetos.csv"),
            users_path: PathBuf::from("ml_model/data/usuarios.csv"),
            api_base_url: "http://localhost:8000".into(),
            request_timeout_secs: 10,
            match_cutoff: DEFAULT_CUTOFF,
            similarity: Similarity::default(),
            columns: ColumnMap::default(),
        }
    }
}

impl Settings {
    /// `$PROJECT_FORECAST_CONFIG`, else `./forecast.yaml` if present, else
    /// defaults; then `API_BASE_URL`, `PROJECT_DATASET`, `USERS_DATASET`.
    pub fn load() -> Result<Self> {
        let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut settings = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// `lookup` maps an environment variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty("API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(path) = non_empty("PROJECT_DATASET") {
            self.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty("USERS_DATASET") {
            self.users_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.match_cutoff) {
            return Err(Error::Config(format!(
                "match_cutoff must be within [0, 1], got {}",
                self.match_cutoff
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be positive".into()));
        }
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_base_url)
            .map_err(|e| Error::Config(format!("api_base_url {:?}: {e}", self.api_base_url)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn matcher(&self) -> FuzzyMatcher {
        FuzzyMatcher::new(self.match_cutoff, self.similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<()> {
        let s = Settings::from_yaml_str(
            "api_base_url: http://predictor:9000\nsimilarity: jaro_winkler\ncolumns:\n  risk: risk_level\n",
        )?;
        assert_eq!(s.api_base_url, "http://predictor:9000");
        assert_eq!(s.similarity, Similarity::JaroWinkler);
        assert_eq!(s.columns.risk, "risk_level");
        assert_eq!(s.columns.methodology, "metodologia");
        assert_eq!(s.request_timeout_secs, 10);
        assert_eq!(s.match_cutoff, 0.6);
        Ok(())
    }

    #[test]
    fn test_empty_yaml_is_default() -> Result<()> {
        assert_eq!(Settings::from_yaml_str("  \n")?, Settings::default());
        Ok(())
    }

    #[test]
    fn test_unknown_similarity_rejected() {
        assert!(Settings::from_yaml_str("similarity: cosine\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("API_BASE_URL", "http://10.0.0.5:8000"),
            ("PROJECT_DATASET", "/data/projetos.csv"),
            ("USERS_DATASET", "  "),
        ]
        .into_iter()
        .collect();

        let mut s = Settings::default();
        s.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(s.dataset_path, PathBuf::from("/data/projetos.csv"));
        assert_eq!(s.users_path, PathBuf::from("ml_model/data/usuarios.csv"));
    }

    #[test]
    fn test_validation() {
        let mut s = Settings::default();
        assert!(s.validate().is_ok());

        s.match_cutoff = 1.5;
        assert!(matches!(s.validate(), Err(Error::Config(_))));

        s = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(s.validate().is_err());

        s = Settings {
            api_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "request_timeout_secs: 3\nmatch_cutoff: 0.75")?;
        let s = Settings::from_file(tmp.path())?;
        assert_eq!(s.timeout(), Duration::from_secs(3));
        assert_eq!(s.matcher().cutoff, 0.75);
        Ok(())
    }
}
