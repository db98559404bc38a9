use std::fs;

use critdd_diagram::{
    batch::DiagramBatch,
    diagram::{Diagram, GroupQuery},
};
use critdd_stats::matrix::ObservationMatrix;
use critdd_tikz::{
    export::{ExportError, ExportTarget},
    options::{Options, RenderOptions},
};

/// Two strong treatments that alternate wins and three weak ones.
fn two_tiers() -> ObservationMatrix {
    ObservationMatrix::from_rows((0..10_u8).map(|i| {
        let i = f64::from(i);
        let step = |j: f64| if i % 3.0 == j { 1.0 } else { 0.0 };
        [
            100.0 + 7.0 * i + i % 2.0,
            100.0 + 7.0 * i + (i + 1.0) % 2.0,
            10.0 + i + step(0.0),
            10.0 + i + step(1.0),
            10.0 + i + step(2.0),
        ]
    }))
    .unwrap()
}

fn names() -> Vec<String> {
    ["clf_1", "clf_2", "clf_3", "clf_4", "clf_5"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_render_single() {
    let diagram = Diagram::new(&two_tiers(), Some(names()), true).unwrap();
    let options = RenderOptions {
        axis_options: Options::from_iter([("title", "accuracy")]),
        ..RenderOptions::default()
    };
    let tikz = critdd_tikz::render(&diagram, &GroupQuery::default(), &options).unwrap();
    assert!(tikz.starts_with(r"\begin{tikzpicture}"));
    assert!(tikz.ends_with(r"\end{tikzpicture}"));
    assert_eq!(tikz.matches(r"\draw[treatment line]").count(), 5);
    assert_eq!(tikz.matches(r"\draw[group line]").count(), 2);
    assert!(tikz.contains("{clf\\_1};"));
    assert!(tikz.contains("  title={accuracy},\n"));
    // the first group only spans the tied leaders
    assert!(tikz.contains(r"\draw[group line] (axis cs:1.5, "));
}

#[test]
fn test_render_without_singletons_or_groups() {
    let matrix = ObservationMatrix::from_rows((0..10_u8).map(|i| {
        let i = f64::from(i);
        [100.0 + 7.0 * i, 50.0 + 3.0 * i, i]
    }))
    .unwrap();
    let diagram = Diagram::new(&matrix, None, true).unwrap();
    let query = GroupQuery {
        singletons: false,
        ..GroupQuery::default()
    };
    let tikz = critdd_tikz::render(&diagram, &query, &RenderOptions::default()).unwrap();
    assert!(!tikz.contains(r"\draw[group line]"));
    assert_eq!(tikz.matches(r"\draw[treatment line]").count(), 3);
}

#[test]
fn test_render_stacked() {
    let accuracy = two_tiers();
    let error = accuracy.negated();
    let batch = DiagramBatch::new(
        &[accuracy.clone(), accuracy, error],
        Some(vec!["a".into(), "b".into(), "c".into()]),
        Some(names()),
        true,
    )
    .unwrap();
    let tikz = critdd_tikz::render(&batch, &GroupQuery::default(), &RenderOptions::default())
        .unwrap();
    assert_eq!(tikz.matches(r"\addplot+[only marks]").count(), 5);
    assert!(tikz.contains("  yticklabels={{a},{b},{c}},\n"));
    assert!(tikz.contains(r"\addlegendentry{clf\_5}"));
    // negating the outcome keeps the pairwise tests, so every diagram has two groups
    assert_eq!(tikz.matches(r"\draw[group line]").count(), 6);
}

#[test]
fn test_to_file_writes_picture() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = Diagram::new(&two_tiers(), Some(names()), true).unwrap();
    let query = GroupQuery::default();
    let options = RenderOptions::default();

    let path = dir.path().join("out").join("cd.tikz");
    let target = critdd_tikz::to_file(&diagram, &path, &query, &options).unwrap();
    assert_eq!(target, ExportTarget::Tikz);
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        critdd_tikz::render(&diagram, &query, &options).unwrap()
    );

    let options = RenderOptions {
        as_document: true,
        ..RenderOptions::default()
    };
    let path = dir.path().join("cd.tex");
    critdd_tikz::to_file(&diagram, &path, &query, &options).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with(r"\documentclass"));
    assert!(written.contains(r"\end{document}"));
}

#[test]
fn test_to_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = Diagram::new(&two_tiers(), None, true).unwrap();
    let path = dir.path().join("cd.png");
    let err = critdd_tikz::to_file(
        &diagram,
        &path,
        &GroupQuery::default(),
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedExtension { .. }));
    assert!(!path.exists());
}
