use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use critdd_diagram::{CriticalDifference, batch::DiagramBatch, diagram::Diagram};
use critdd_tikz::options::RenderOptions;

use crate::{
    command::QueryArg,
    config::CritddConfig,
    schema::input::{self, InputTable},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DiagramArg {
    /// Observation matrix files (JSON); several files are stacked on one axis
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    #[clap(flatten)]
    query: QueryArg,
    /// Higher values are better
    #[arg(long)]
    maximize: bool,
    /// Comma-separated names of the stacked diagrams [default: file stems]
    #[arg(long, value_delimiter = ',')]
    diagram_names: Option<Vec<String>>,
    /// Title of the axis
    #[arg(long)]
    title: Option<String>,
    /// Draw the best rank on the right
    #[arg(long)]
    reverse_x: bool,
    /// Wrap the picture in a standalone document
    #[arg(long)]
    as_document: bool,
    /// Output file path (.tex, .tikz, .pdf or .svg)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl DiagramArg {
    fn render_options(&self, config: &CritddConfig) -> RenderOptions {
        let mut options = config.render.to_render_options();
        options.reverse_x |= self.reverse_x;
        options.as_document |= self.as_document;
        if let Some(title) = &self.title {
            options.axis_options.set("title", title.as_str());
        }
        options
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Stacks several inputs, which must agree on their treatment names.
fn build_batch(
    tables: Vec<InputTable>,
    diagram_names: Vec<String>,
    maximize: bool,
) -> anyhow::Result<DiagramBatch> {
    let treatment_names = tables.first().and_then(|t| t.treatment_names.clone());
    for (table, name) in tables.iter().zip(&diagram_names) {
        ensure!(
            table.treatment_names == treatment_names,
            "Treatment names of diagram '{name}' differ from the first input"
        );
    }
    let matrices = tables.into_iter().map(|t| t.matrix).collect::<Vec<_>>();
    let batch = DiagramBatch::new(&matrices, Some(diagram_names), treatment_names, maximize)?;
    Ok(batch)
}

fn emit(
    diagram: &dyn CriticalDifference,
    arg: &DiagramArg,
    config: &CritddConfig,
) -> anyhow::Result<()> {
    let query = arg.query.resolve(config)?;
    let options = arg.render_options(config);
    match &arg.output {
        Some(path) => {
            let target = critdd_tikz::to_file(diagram, path, &query, &options)
                .with_context(|| format!("Failed to export diagram to {}", path.display()))?;
            tracing::info!(path = %path.display(), ?target, "exported diagram");
        }
        None => {
            let tikz = critdd_tikz::render(diagram, &query, &options)?;
            let mut output = Output::stdout();
            output.write_text(&tikz)?;
            if !tikz.ends_with('\n') {
                output.write_text("\n")?;
            }
        }
    }
    Ok(())
}

pub(crate) fn run(arg: &DiagramArg, config: &CritddConfig) -> anyhow::Result<()> {
    ensure!(
        arg.diagram_names.is_none() || arg.inputs.len() > 1,
        "--diagram-names names stacked diagrams and needs at least two inputs"
    );
    let tables = arg
        .inputs
        .iter()
        .map(input::read_input_file)
        .collect::<anyhow::Result<Vec<_>>>()?;

    if let [table] = tables.as_slice() {
        let diagram = Diagram::new(&table.matrix, table.treatment_names.clone(), arg.maximize)?;
        return emit(&diagram, arg, config);
    }

    let diagram_names = match &arg.diagram_names {
        Some(names) => names.clone(),
        None => arg.inputs.iter().map(|p| file_stem(p)).collect(),
    };
    let batch = build_batch(tables, diagram_names, arg.maximize)?;
    emit(&batch, arg, config)
}

#[cfg(test)]
mod tests {
    use critdd_stats::matrix::ObservationMatrix;

    use super::*;

    fn table(names: Option<&[&str]>, offset: f64) -> InputTable {
        let matrix = ObservationMatrix::from_rows((0..6_u8).map(|i| {
            let i = f64::from(i) + offset;
            [i, 2.0 * i + 1.0, 3.0 * i + 5.0]
        }))
        .unwrap();
        InputTable {
            treatment_names: names.map(|n| n.iter().map(|s| (*s).to_owned()).collect()),
            matrix,
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("results/accuracy.json")), "accuracy");
        assert_eq!(file_stem(Path::new("error")), "error");
    }

    #[test]
    fn test_build_batch() {
        let names = Some(&["a", "b", "c"][..]);
        let batch = build_batch(
            vec![table(names, 0.0), table(names, 1.0)],
            vec!["first".into(), "second".into()],
            false,
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.treatment_names(), &["a", "b", "c"]);
        assert_eq!(batch.diagram_names(), &["first", "second"]);
    }

    #[test]
    fn test_build_batch_errors() {
        let err = build_batch(
            vec![
                table(Some(&["a", "b", "c"][..]), 0.0),
                table(Some(&["a", "b", "d"][..]), 0.0),
            ],
            vec!["first".into(), "second".into()],
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("diagram 'second'"));

        let names = Some(&["a", "b", "c"][..]);
        assert!(build_batch(
            vec![table(names, 0.0), table(names, 0.0)],
            vec!["only".into()],
            false
        )
        .is_err());
    }

    #[test]
    fn test_diagram_names_need_several_inputs() {
        let arg = DiagramArg {
            inputs: vec![PathBuf::from("does-not-exist.json")],
            diagram_names: Some(vec!["accuracy".into()]),
            ..DiagramArg::default()
        };
        let err = run(&arg, &CritddConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--diagram-names"), "{err}");
    }

    #[test]
    fn test_flags_override_render_config() {
        let arg = DiagramArg {
            reverse_x: true,
            title: Some("accuracy".into()),
            ..DiagramArg::default()
        };
        let mut config = CritddConfig::default();
        config.render.as_document = true;
        config
            .render
            .axis_options
            .insert("title".into(), "configured".into());
        let options = arg.render_options(&config);
        assert!(options.reverse_x);
        assert!(options.as_document);
        assert_eq!(options.axis_options.get("title"), Some("accuracy"));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cd.tex");
        let arg = DiagramArg {
            output: Some(path.clone()),
            ..DiagramArg::default()
        };
        let table = table(Some(&["a", "b", "c"][..]), 0.0);
        let diagram = Diagram::new(&table.matrix, table.treatment_names, false).unwrap();
        emit(&diagram, &arg, &CritddConfig::default()).unwrap();
        let tikz = std::fs::read_to_string(&path).unwrap();
        assert!(tikz.contains("{a};"));
    }
}
