//! Stylesheet rules for the semantic classes.
//!
//! The token passes emit classes Pygments never produces, so the mkdocs
//! palette has no rules for them. The generated block below is appended to
//! the site's main stylesheet by the processor. Colors lean on
//! mkdocs-material's `--md-code-hl-*` custom properties, which already flip
//! with the color scheme, so a single set of rules covers both light and
//! dark palettes; the one scheme-scoped override matches how material itself
//! special-cases `slate`.

/// Marker comment used to detect an already-patched stylesheet.
pub const CSS_MARKER: &str = "/* filigree semantic highlighting */";

/// Generate the CSS block for the semantic classes.
pub fn generate_mkdocs_theme_css() -> String {
    format!(
        r#"

{CSS_MARKER}
.highlight .nf {{
  color: var(--md-code-hl-function-color);
}}
.highlight .md-code-enum-data-type {{
  color: var(--md-code-hl-special-color);
  font-weight: 700;
}}
.highlight .md-code-enum {{
  color: var(--md-code-hl-constant-color);
}}
.highlight .md-code-enum-item {{
  color: var(--md-code-hl-number-color);
}}
[data-md-color-scheme="slate"] .highlight .md-code-enum-data-type {{
  color: var(--md-code-hl-name-color);
}}
"#
    )
}
