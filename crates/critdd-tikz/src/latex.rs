//! LaTeX building blocks: environments, documents and label escaping.

use crate::options::Options;

/// Escapes underscores in `label` so that it typesets as text.
///
/// Segments between `$` signs are math and stay untouched, as do
/// underscores that are already escaped.
///
/// # Examples
///
/// ```
/// use critdd_tikz::latex::escape_label;
///
/// assert_eq!(escape_label("with_under_score"), r"with\_under\_score");
/// assert_eq!(escape_label(r"with\_under_score"), r"with\_under\_score");
/// assert_eq!(escape_label("f_1 $n_i$"), r"f\_1 $n_i$");
/// ```
#[must_use]
pub fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for (i, part) in label.split('$').enumerate() {
        if i > 0 {
            escaped.push('$');
        }
        if i % 2 == 1 {
            escaped.push_str(part);
            continue;
        }
        let mut prev = None;
        for c in part.chars() {
            if c == '_' && prev != Some('\\') {
                escaped.push('\\');
            }
            escaped.push(c);
            prev = Some(c);
        }
    }
    escaped
}

/// Prefixes every line of `content` with two spaces.
pub(crate) fn indent(content: &str) -> String {
    content
        .split('\n')
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps `contents` in a `\begin{name}[options] … \end{name}` block.
pub(crate) fn environment(name: &str, contents: &[String], options: &Options) -> String {
    let mut begin = format!("\\begin{{{name}}}");
    if !options.is_empty() {
        let entries = options
            .iter()
            .map(|(key, value)| format!("{key}={{{value}}}"))
            .collect::<Vec<_>>()
            .join(",\n");
        begin.push_str("[\n");
        begin.push_str(&indent(&entries));
        begin.push_str(",\n]\n");
    }
    let mut lines = Vec::with_capacity(contents.len() + 2);
    lines.push(begin);
    lines.extend(contents.iter().cloned());
    lines.push(format!("\\end{{{name}}}"));
    lines.join("\n")
}

/// Wraps a picture in a compilable `standalone` document.
///
/// # Examples
///
/// ```
/// use critdd_tikz::latex::document;
///
/// let doc = document("PICTURE", Some(r"\usepackage{xcolor}"));
/// assert!(doc.starts_with(r"\documentclass[tikz,margin=.1in]{standalone}"));
/// assert!(doc.contains("\\usepackage{xcolor}\n"));
/// assert!(doc.contains("\\begin{document}\nPICTURE\n\\end{document}"));
/// ```
#[must_use]
pub fn document(picture: &str, preamble: Option<&str>) -> String {
    let preamble = preamble.map_or_else(String::new, |p| format!("\n{p}\n"));
    [
        r"\documentclass[tikz,margin=.1in]{standalone}".to_owned(),
        r"\usepackage{pgfplots,lmodern}".to_owned(),
        r"\pgfplotsset{compat=newest}".to_owned(),
        preamble,
        environment("document", &[picture.to_owned()], &Options::new()),
        String::new(),
    ]
    .join("\n")
}

/// Formats a coordinate the way pgfplots reads it.
pub(crate) fn num(value: f64) -> String {
    format!("{value}")
}
