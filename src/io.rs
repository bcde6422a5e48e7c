//! File helpers for rendering Markdown documents to HTML fragments.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    html::normalize_fragment,
    process::{TransformOptions, transform_with},
};

/// Sibling path that receives the rendered fragment for `path`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use markrite::io::html_path_for;
/// assert_eq!(html_path_for(Path::new("docs/a.md")), Path::new("docs/a.html"));
/// ```
#[must_use]
pub fn html_path_for(path: &Path) -> PathBuf {
    path.with_extension("html")
}

/// Transform the contents of `path`, optionally normalising the result.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn render_path(
    path: &Path,
    options: &TransformOptions,
    normalize: bool,
) -> std::io::Result<String> {
    let text = fs::read_to_string(path)?;
    let html = transform_with(&text, options);
    Ok(if normalize {
        normalize_fragment(&html)
    } else {
        html
    })
}

/// Render `path` and write the fragment next to it.
///
/// Returns the path of the written file.
///
/// # Errors
/// Returns an error if reading the source or writing the output fails.
pub fn render_file(
    path: &Path,
    options: &TransformOptions,
    normalize: bool,
) -> std::io::Result<PathBuf> {
    let html = render_path(path, options, normalize)?;
    let target = html_path_for(path);
    fs::write(&target, html + "\n")?;
    info!(source = %path.display(), target = %target.display(), "wrote fragment");
    Ok(target)
}
