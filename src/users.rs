//! Project history per person, read from the users dataset.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{fmt, io, path::Path};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "historico_projetos")]
    pub projects: u32,
    #[serde(rename = "experiencia_anos")]
    pub years_experience: u32,
    #[serde(rename = "sucesso_medio")]
    pub average_success: f64,
}

impl fmt::Display for UserHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} projects, {} years of experience, average success {:.1}%",
            self.name,
            self.role,
            self.projects,
            self.years_experience,
            self.average_success * 100.0
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserLookup {
    Found(UserHistory),
    /// Carries the name as it was searched for (trimmed, lowercase).
    NotFound(String),
}

/// All users, loaded once.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserHistory>,
}

impl UserDirectory {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening users dataset {}", path.display()))?;
        let dir = Self::from_reader(file)
            .with_context(|| format!("parsing users dataset {}", path.display()))?;
        info!(path = %path.display(), users = dir.users.len(), "loaded users");
        Ok(dir)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let users = rdr
            .deserialize::<UserHistory>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { users })
    }

    /// Exact name match ignoring case and surrounding whitespace; first row wins.
    pub fn lookup(&self, name: &str) -> UserLookup {
        let wanted = name.trim().to_lowercase();
        self.users
            .iter()
            .find(|u| u.name.trim().to_lowercase() == wanted)
            .cloned()
            .map(UserLookup::Found)
            .unwrap_or(UserLookup::NotFound(wanted))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
