//! Writing TikZ code to files and compiling it.
//!
//! `.tex` and `.tikz` targets receive the code as is. `.pdf` and `.svg`
//! targets receive a `.tex` file next to them, which is compiled with
//! `pdflatex` and, for SVG, converted with `pdf2svg`. Both programs must be
//! on the `PATH`.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use critdd_diagram::DiagramError;

/// Supported output file types, determined by the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Tex,
    Tikz,
    Pdf,
    Svg,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ExportError {
    #[display("unsupported output file '{}', expected .tex, .tikz, .pdf or .svg", path.display())]
    UnsupportedExtension {
        #[error(not(source))]
        path: PathBuf,
    },
    #[display("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[display("failed to run {program}")]
    Spawn {
        program: &'static str,
        source: io::Error,
    },
    #[display("{program} failed to produce {}:\n{output}", path.display())]
    Compile {
        program: &'static str,
        path: PathBuf,
        output: String,
    },
    #[display("{_0}")]
    Diagram(DiagramError),
}

impl From<DiagramError> for ExportError {
    fn from(err: DiagramError) -> Self {
        Self::Diagram(err)
    }
}

impl ExportTarget {
    /// Determines the target from the extension of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    ///
    /// use critdd_tikz::export::ExportTarget;
    ///
    /// assert_eq!(ExportTarget::from_path(Path::new("cd.svg")).unwrap(), ExportTarget::Svg);
    /// assert!(ExportTarget::from_path(Path::new("cd.png")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(OsStr::to_str) {
            Some("tex") => Ok(Self::Tex),
            Some("tikz") => Ok(Self::Tikz),
            Some("pdf") => Ok(Self::Pdf),
            Some("svg") => Ok(Self::Svg),
            _ => Err(ExportError::UnsupportedExtension {
                path: path.to_owned(),
            }),
        }
    }

    /// Whether the code has to be a full document, which is the case for compiled targets.
    #[must_use]
    pub fn requires_document(self) -> bool {
        matches!(self, Self::Pdf | Self::Svg)
    }
}

/// Writes `tikz` to `path`, compiling it if the target requires it.
///
/// Missing parent directories are created. The extension is checked before
/// anything is written.
pub fn to_file(path: &Path, tikz: &str) -> Result<ExportTarget, ExportError> {
    let target = ExportTarget::from_path(path)?;
    let tex_path = if target.requires_document() {
        path.with_extension("tex")
    } else {
        path.to_owned()
    };

    let dir = tex_path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_owned(),
            source,
        })?;
    }
    fs::write(&tex_path, tikz).map_err(|source| ExportError::Write {
        path: tex_path.clone(),
        source,
    })?;
    tracing::debug!(path = %tex_path.display(), "wrote TikZ code");

    if !target.requires_document() {
        return Ok(target);
    }

    let pdf_path = path.with_extension("pdf");
    let mut pdflatex = Command::new("pdflatex");
    pdflatex
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error");
    if let Some(dir) = dir {
        pdflatex.arg(format!("-output-directory={}", dir.display()));
    }
    pdflatex.arg(&tex_path);
    run("pdflatex", &mut pdflatex, &pdf_path)?;

    if target == ExportTarget::Svg {
        let mut pdf2svg = Command::new("pdf2svg");
        pdf2svg.arg(&pdf_path).arg(path);
        run("pdf2svg", &mut pdf2svg, path)?;
    }
    Ok(target)
}

fn run(program: &'static str, command: &mut Command, produces: &Path) -> Result<(), ExportError> {
    tracing::debug!(?command, "running {program}");
    let output = command
        .output()
        .map_err(|source| ExportError::Spawn { program, source })?;
    if !output.status.success() {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(ExportError::Compile {
            program,
            path: produces.to_owned(),
            output: text,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        assert_eq!(ExportTarget::from_path(Path::new("a/b.tex")).unwrap(), ExportTarget::Tex);
        assert_eq!(ExportTarget::from_path(Path::new("b.tikz")).unwrap(), ExportTarget::Tikz);
        assert_eq!(ExportTarget::from_path(Path::new("b.pdf")).unwrap(), ExportTarget::Pdf);
        assert!(ExportTarget::Svg.requires_document());
        assert!(!ExportTarget::Tikz.requires_document());
        for path in ["b.png", "b", "b.TEX", "b.txt"] {
            assert!(matches!(
                ExportTarget::from_path(Path::new(path)),
                Err(ExportError::UnsupportedExtension { .. })
            ));
        }
    }

    #[test]
    fn test_write_tex_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cd.tex");
        let target = to_file(&path, "CONTENT").unwrap();
        assert_eq!(target, ExportTarget::Tex);
        assert_eq!(fs::read_to_string(&path).unwrap(), "CONTENT");
    }

    #[test]
    fn test_png_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cd.png");
        assert!(to_file(&path, "CONTENT").is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
