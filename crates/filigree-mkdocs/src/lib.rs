//! Post-process mkdocs HTML output to add semantic highlighting for the
//! String-Plus library.
//!
//! Pygments gives the site generic lexical highlighting; this crate layers
//! library semantics on top after the site is built: function-call and enum
//! classes on the right spans, interpolation regions restyled as strings
//! with their `{var}` placeholders split out, and the view/edit source
//! buttons retargeted at the library repository.
//!
//! # Usage
//!
//! ```bash
//! filigree-mkdocs ./site ./site-annotated
//! ```
//!
//! # How it works
//!
//! 1. **CSS Patching**: Generates rules for the semantic classes and appends
//!    them to the site stylesheet (`assets/stylesheets/main.*.css`)
//!
//! 2. **HTML Transformation**: Uses lol_html to stream through each HTML
//!    file, rebuilding every `<code>` element's span sequence, running the
//!    `filigree` token passes over it, and writing changed blocks back.
//!
//! # Theme Support
//!
//! Integrates with mkdocs-material's palette system by leaning on its
//! `--md-code-hl-*` custom properties and scoping overrides to
//! `[data-md-color-scheme="..."]` selectors.

mod css;
mod html;
mod links;
mod processor;

pub use css::{CSS_MARKER, generate_mkdocs_theme_css};
pub use html::{TransformError, TransformResult, transform_html};
pub use links::rewrite_source_link;
pub use processor::{ProcessError, ProcessOptions, Processor, ProcessorStats};
