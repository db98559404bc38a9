use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use anyhow::{Context, bail, ensure};
use critdd_stats::matrix::ObservationMatrix;
use serde::{Deserialize, Serialize};

use crate::util;

/// Observation matrix file, in wide or long form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputFile {
    Wide(WideInput),
    Long(LongInput),
}

/// One row per observation and one column per treatment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WideInput {
    /// Column names; defaults are used when absent
    #[serde(default)]
    pub treatment_names: Option<Vec<String>>,
    pub observations: Vec<Vec<f64>>,
}

/// One record per measured (observation, treatment) cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongInput {
    pub records: Vec<InputRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputRecord {
    /// Identifier of the observation, for example a dataset name
    pub observation: String,
    /// Identifier of the treatment, for example a classifier name
    pub treatment: String,
    pub value: f64,
}

/// Validated input: a matrix and, if known, its column names.
#[derive(Debug, Clone)]
pub struct InputTable {
    pub treatment_names: Option<Vec<String>>,
    pub matrix: ObservationMatrix,
}

impl InputFile {
    pub fn into_table(self) -> anyhow::Result<InputTable> {
        match self {
            InputFile::Wide(wide) => wide.into_table(),
            InputFile::Long(long) => long.into_table(),
        }
    }
}

impl WideInput {
    fn into_table(self) -> anyhow::Result<InputTable> {
        let matrix = ObservationMatrix::from_rows(&self.observations)
            .context("Invalid observation matrix")?;
        if let Some(names) = &self.treatment_names {
            ensure!(
                names.len() == matrix.n_cols(),
                "Expected {} treatment names, got {}",
                matrix.n_cols(),
                names.len()
            );
        }
        Ok(InputTable {
            treatment_names: self.treatment_names,
            matrix,
        })
    }
}

impl LongInput {
    /// Pivots the records with observations as rows and treatments as
    /// columns, both in sorted order.
    fn into_table(self) -> anyhow::Result<InputTable> {
        let observations = self
            .records
            .iter()
            .map(|r| r.observation.as_str())
            .collect::<BTreeSet<_>>();
        let treatments = self
            .records
            .iter()
            .map(|r| r.treatment.as_str())
            .collect::<BTreeSet<_>>();

        let mut cells = BTreeMap::new();
        for record in &self.records {
            let key = (record.observation.as_str(), record.treatment.as_str());
            if cells.insert(key, record.value).is_some() {
                bail!(
                    "Duplicate record for observation '{}' and treatment '{}'",
                    record.observation,
                    record.treatment
                );
            }
        }

        let mut data = Vec::with_capacity(observations.len() * treatments.len());
        for &observation in &observations {
            for &treatment in &treatments {
                let Some(&value) = cells.get(&(observation, treatment)) else {
                    bail!(
                        "Missing record for observation '{observation}' and treatment '{treatment}'"
                    );
                };
                data.push(value);
            }
        }

        let matrix = ObservationMatrix::new(observations.len(), treatments.len(), data)
            .context("Invalid observation matrix")?;
        Ok(InputTable {
            treatment_names: Some(treatments.into_iter().map(String::from).collect()),
            matrix,
        })
    }
}

pub fn read_input_file<P>(path: P) -> anyhow::Result<InputTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let input: InputFile = util::read_json_file("input", path)?;
    let table = input
        .into_table()
        .with_context(|| format!("Invalid input file: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        n = table.matrix.n_rows(),
        k = table.matrix.n_cols(),
        "read observations"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> anyhow::Result<InputTable> {
        serde_json::from_str::<InputFile>(json)?.into_table()
    }

    #[test]
    fn test_wide_input() {
        let table = parse(r#"{"treatment_names": ["a", "b"], "observations": [[1, 2], [3, 4]]}"#)
            .unwrap();
        assert_eq!(table.treatment_names.unwrap(), vec!["a", "b"]);
        assert_eq!(table.matrix.row(1), &[3.0, 4.0]);

        let table = parse(r#"{"observations": [[1, 2, 3]]}"#).unwrap();
        assert!(table.treatment_names.is_none());
        assert_eq!(table.matrix.n_cols(), 3);
    }

    #[test]
    fn test_wide_input_errors() {
        assert!(parse(r#"{"treatment_names": ["a"], "observations": [[1, 2]]}"#).is_err());
        assert!(parse(r#"{"observations": [[1, 2], [3]]}"#).is_err());
        assert!(parse(r#"{"observations": []}"#).is_err());
        assert!(parse(r#"{"observation": [[1, 2]]}"#).is_err());
    }

    #[test]
    fn test_long_input_is_pivoted_in_sorted_order() {
        let table = parse(
            r#"{"records": [
                {"observation": "iris", "treatment": "svm", "value": 0.9},
                {"observation": "adult", "treatment": "svm", "value": 0.7},
                {"observation": "iris", "treatment": "knn", "value": 0.8},
                {"observation": "adult", "treatment": "knn", "value": 0.6}
            ]}"#,
        )
        .unwrap();
        assert_eq!(table.treatment_names.unwrap(), vec!["knn", "svm"]);
        assert_eq!(table.matrix.row(0), &[0.6, 0.7]);
        assert_eq!(table.matrix.row(1), &[0.8, 0.9]);
    }

    #[test]
    fn test_long_input_errors() {
        let missing = parse(
            r#"{"records": [
                {"observation": "a", "treatment": "x", "value": 1},
                {"observation": "a", "treatment": "y", "value": 2},
                {"observation": "b", "treatment": "x", "value": 3}
            ]}"#,
        )
        .unwrap_err();
        assert!(missing.to_string().contains("Missing record for observation 'b'"));

        let duplicate = parse(
            r#"{"records": [
                {"observation": "a", "treatment": "x", "value": 1},
                {"observation": "a", "treatment": "x", "value": 2}
            ]}"#,
        )
        .unwrap_err();
        assert!(duplicate.to_string().contains("Duplicate record"));

        assert!(parse(r#"{"records": []}"#).is_err());
    }
}
