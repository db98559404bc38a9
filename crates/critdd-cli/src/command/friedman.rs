use std::{fmt, path::PathBuf};

use critdd_diagram::diagram::default_treatment_name;
use critdd_stats::friedman::{self, ChiSquareFriedmanResult, FDistributedFriedmanResult};
use serde::Serialize;

use crate::{schema::input, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FriedmanArg {
    /// Observation matrix file (JSON)
    input: PathBuf,
    /// Higher values are better
    #[arg(long)]
    maximize: bool,
    /// Print the results as JSON
    #[arg(long)]
    json: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct FriedmanReport {
    treatment_names: Vec<String>,
    chi_square: ChiSquareFriedmanResult,
    f_distributed: FDistributedFriedmanResult,
}

impl fmt::Display for FriedmanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chi = &self.chi_square;
        let fd = &self.f_distributed;
        let width = self
            .treatment_names
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("treatment".len());

        writeln!(
            f,
            "{} observations, {} treatments ({})",
            chi.n,
            self.treatment_names.len(),
            if chi.maximize_outcome {
                "higher is better"
            } else {
                "lower is better"
            }
        )?;
        writeln!(f)?;
        writeln!(f, "{:<width$}  average rank", "treatment")?;
        for (name, rank) in self.treatment_names.iter().zip(&chi.average_ranks) {
            writeln!(f, "{name:<width$}  {rank:.4}")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "chi-square: statistic = {:.4}, df = {}, p = {:.6e}",
            chi.statistic, chi.n_df, chi.p_value
        )?;
        writeln!(
            f,
            "F:          statistic = {:.4}, df = ({}, {}), p = {:.6e}",
            fd.statistic, fd.n_df_1, fd.n_df_2, fd.p_value
        )
    }
}

pub(crate) fn run(arg: &FriedmanArg) -> anyhow::Result<()> {
    let table = input::read_input_file(&arg.input)?;
    let f_distributed = friedman::f_distributed(&table.matrix, arg.maximize)?;
    let chi_square = f_distributed.chi_square.clone();
    let treatment_names = table
        .treatment_names
        .unwrap_or_else(|| (0..table.matrix.n_cols()).map(default_treatment_name).collect());
    let report = FriedmanReport {
        treatment_names,
        chi_square,
        f_distributed,
    };
    tracing::info!(p_value = report.f_distributed.p_value, "ran Friedman test");

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    if arg.json {
        output.write_json(&report)?;
    } else {
        output.write_text(&report.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use critdd_stats::matrix::ObservationMatrix;

    use super::*;

    #[test]
    fn test_text_report() {
        let matrix = ObservationMatrix::from_rows([
            [1.0, 2.0, 3.0],
            [1.0, 3.0, 2.0],
            [2.0, 1.0, 3.0],
            [1.0, 2.0, 3.0],
        ])
        .unwrap();
        let f_distributed = friedman::f_distributed(&matrix, false).unwrap();
        let report = FriedmanReport {
            treatment_names: vec!["a".into(), "long_name".into(), "c".into()],
            chi_square: f_distributed.chi_square.clone(),
            f_distributed,
        };
        let text = report.to_string();
        assert!(text.starts_with("4 observations, 3 treatments (lower is better)\n"));
        assert!(text.contains("treatment  average rank\n"));
        assert!(text.contains("long_name  2.0000\n"));
        assert!(text.contains("chi-square: statistic = 4.5000, df = 2, p = "));
        assert!(text.contains("F:          statistic = "));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["chi_square"]["n_df"], 2);
        assert_eq!(json["treatment_names"][1], "long_name");
    }
}
