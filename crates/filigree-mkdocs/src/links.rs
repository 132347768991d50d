//! Source-button retargeting.
//!
//! mkdocs-material renders a "view source"/"edit this page" button pair at
//! the top of every page, pointing wherever `edit_uri` happened to be set at
//! build time. This module rewrites those targets to the canonical
//! String-Plus repository locations: the raw file for viewing, the GitHub
//! editor for editing.

use regex::Regex;
use std::sync::LazyLock;

/// Raw-content target for "View source" buttons.
pub const VIEW_BASE: &str =
    "https://raw.githubusercontent.com/EgizianoEG/String-Plus/master/docs/";

/// GitHub editor target for "Edit this page" buttons.
pub const EDIT_BASE: &str = "https://github.com/EgizianoEG/String-Plus/edit/master/docs/";

/// Extracts the repository-relative docs path from whatever host the build
/// originally pointed the button at.
static DOCS_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".+master/docs/(.+)").unwrap());

/// Compute the replacement target for a source button.
///
/// `label` is the button's accessible label ("View source of this page",
/// "Edit this page", ...); a label starting with `View` selects the
/// raw-content target, anything else the editor. Returns `None` when the
/// current href carries no recognizable docs path; the button is then left
/// exactly as the build emitted it.
pub fn rewrite_source_link(href: &str, label: &str) -> Option<String> {
    let caps = DOCS_PATH.captures(href)?;
    let path = caps.get(1)?.as_str();
    Some(if label.starts_with("View") {
        format!("{VIEW_BASE}{path}")
    } else {
        format!("{EDIT_BASE}{path}")
    })
}
