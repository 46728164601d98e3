// src/vocab/mod.rs

use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::CategoricalField;

/// Dataset column holding each categorical field's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub project_type: String,
    pub department: String,
    pub complexity: String,
    pub methodology: String,
    pub risk: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            project_type: "tipo_projeto".into(),
            department: "departamento".into(),
            complexity: "complexidade".into(),
            methodology: "metodologia".into(),
            risk: "risco".into(),
        }
    }
}

impl ColumnMap {
    pub fn column(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::ProjectType => &self.project_type,
            CategoricalField::Department => &self.department,
            CategoricalField::Complexity => &self.complexity,
            CategoricalField::Methodology => &self.methodology,
            CategoricalField::Risk => &self.risk,
        }
    }
}

/// Valid values per categorical field: unique, non-blank, sorted by code point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    entries: BTreeMap<CategoricalField, Vec<String>>,
}

impl Vocabulary {
    /// Read the whole dataset at `path`.
    pub fn load(path: &Path, columns: &ColumnMap) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::Dataset {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let vocab = Self::from_reader(file, path, columns)?;
        let sizes: Vec<(&str, usize)> = vocab
            .entries
            .iter()
            .map(|(f, v)| (f.key(), v.len()))
            .collect();
        info!(path = %path.display(), ?sizes, "loaded vocabulary");
        Ok(vocab)
    }

    /// `origin` only labels errors.
    pub fn from_reader<R: io::Read>(reader: R, origin: &Path, columns: &ColumnMap) -> Result<Self> {
        let dataset_err = |source: csv::Error| Error::Dataset {
            path: origin.to_path_buf(),
            source,
        };

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers().map_err(dataset_err)?.clone();

        let mut indices = Vec::with_capacity(CategoricalField::ALL.len());
        for field in CategoricalField::ALL {
            let column = columns.column(field);
            let idx = headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| Error::MissingColumn {
                    path: origin.to_path_buf(),
                    column: column.to_string(),
                })?;
            indices.push((field, idx));
        }

        let mut sets: BTreeMap<CategoricalField, BTreeSet<String>> = BTreeMap::new();
        let mut rows = 0usize;
        for record in rdr.records() {
            let record = record.map_err(dataset_err)?;
            rows += 1;
            for &(field, idx) in &indices {
                match record.get(idx) {
                    Some(cell) if !cell.trim().is_empty() => {
                        sets.entry(field).or_default().insert(cell.to_string());
                    }
                    _ => {}
                }
            }
        }
        debug!(rows, origin = %origin.display(), "scanned dataset");

        let entries = CategoricalField::ALL
            .into_iter()
            .map(|f| {
                let values = sets.remove(&f).unwrap_or_default();
                (f, values.into_iter().collect())
            })
            .collect();
        Ok(Self { entries })
    }

    /// Build directly from value lists; order and duplicates are normalised.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CategoricalField, Vec<S>)>,
        S: Into<String>,
    {
        let mut map: BTreeMap<CategoricalField, Vec<String>> = CategoricalField::ALL
            .into_iter()
            .map(|f| (f, Vec::new()))
            .collect();
        for (field, values) in entries {
            let set: BTreeSet<String> = values
                .into_iter()
                .map(Into::into)
                .filter(|v: &String| !v.trim().is_empty())
                .collect();
            map.insert(field, set.into_iter().collect());
        }
        Self { entries: map }
    }

    pub fn get(&self, field: CategoricalField) -> &[String] {
        self.entries.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Load-once holder for the vocabulary. Construct it at startup, warm it
/// with [`VocabularyStore::get`], and hand references to whoever normalizes.
#[derive(Debug)]
pub struct VocabularyStore {
    path: PathBuf,
    columns: ColumnMap,
    cell: OnceCell<Vocabulary>,
}

impl VocabularyStore {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMap) -> Self {
        Self {
            path: path.into(),
            columns,
            cell: OnceCell::new(),
        }
    }

    /// Already-loaded vocabulary, e.g. for tests.
    pub fn preloaded(vocabulary: Vocabulary) -> Self {
        Self {
            path: PathBuf::new(),
            columns: ColumnMap::default(),
            cell: OnceCell::with_value(vocabulary),
        }
    }

    /// First call reads the dataset; concurrent first callers block on the
    /// same load. Later calls never touch the disk.
    pub fn get(&self) -> Result<&Vocabulary> {
        self.cell
            .get_or_try_init(|| Vocabulary::load(&self.path, &self.columns))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
id,tipo_projeto,departamento,complexidade,metodologia,risco,sucesso
1,Software,TI,Alta,Agile,Baixo,1
2,Pesquisa,Marketing,Média,Scrum,Alto,0
3,Software,Operações,Baixa,Waterfall,Médio,1
4,Infraestrutura,,Alta,Kanban,Baixo,0
";

    fn write_sample() -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(SAMPLE.as_bytes())?;
        Ok(tmp)
    }

    #[test]
    fn test_load_sorted_unique_non_blank() -> Result<()> {
        let tmp = write_sample()?;
        let vocab = Vocabulary::load(tmp.path(), &ColumnMap::default())?;

        assert_eq!(
            vocab.get(CategoricalField::ProjectType),
            &["Infraestrutura", "Pesquisa", "Software"]
        );
        assert_eq!(
            vocab.get(CategoricalField::Department),
            &["Marketing", "Operações", "TI"]
        );
        assert_eq!(
            vocab.get(CategoricalField::Complexity),
            &["Alta", "Baixa", "Média"]
        );
        assert_eq!(
            vocab.get(CategoricalField::Methodology),
            &["Agile", "Kanban", "Scrum", "Waterfall"]
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Vocabulary::load(Path::new("/nonexistent/projetos.csv"), &ColumnMap::default())
            .unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
    }

    #[test]
    fn test_missing_column_is_error() {
        let csv = "tipo_projeto,departamento\nSoftware,TI\n";
        let err = Vocabulary::from_reader(
            csv.as_bytes(),
            Path::new("inline.csv"),
            &ColumnMap::default(),
        )
        .unwrap_err();
        match err {
            Error::MissingColumn { column, .. } => assert_eq!(column, "complexidade"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_columns() -> Result<()> {
        let csv = "type,dept,cx,method,risk\nSoftware,IT,High,Agile,Low\n";
        let columns = ColumnMap {
            project_type: "type".into(),
            department: "dept".into(),
            complexity: "cx".into(),
            methodology: "method".into(),
            risk: "risk".into(),
        };
        let vocab = Vocabulary::from_reader(csv.as_bytes(), Path::new("inline.csv"), &columns)?;
        assert_eq!(vocab.get(CategoricalField::Department), &["IT"]);
        Ok(())
    }

    #[test]
    fn test_store_loads_once() -> Result<()> {
        let tmp = write_sample()?;
        let store = VocabularyStore::new(tmp.path(), ColumnMap::default());
        let first = store.get()? as *const Vocabulary;

        // the file is gone, but the cached copy is served
        let path = tmp.path().to_path_buf();
        drop(tmp);
        assert!(!path.exists());
        let second = store.get()? as *const Vocabulary;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_store_failure_surfaces() {
        let store = VocabularyStore::new("/nonexistent/projetos.csv", ColumnMap::default());
        assert!(store.get().is_err());
    }
}
