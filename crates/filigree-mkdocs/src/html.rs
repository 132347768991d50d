//! HTML transformation using lol_html streaming rewriter.
//!
//! Each file is streamed twice. The first pass only reads: it rebuilds every
//! `<code>` element's child list as a token sequence (classed spans plus the
//! bare text nodes between them). The token passes then run per block. The
//! second pass writes: changed blocks get their inner content replaced with
//! the re-serialized sequence, and source buttons get their targets
//! rewritten, all in one stream.
//!
//! Tokens capture their text exactly as it appears in the source (entities
//! still encoded), and serialization emits classes and text verbatim, so
//! everything the passes did not touch round-trips unchanged.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use filigree::{Token, TokenKind, reclassify, split_interpolations};
use lol_html::html_content::ContentType;
use lol_html::{EndTagHandler, RewriteStrSettings, element, rewrite_str, text};

use crate::links::rewrite_source_link;

/// Statistics from transforming a single HTML file.
#[derive(Debug, Default)]
pub struct TransformResult {
    /// Number of code blocks found.
    pub blocks_scanned: usize,
    /// Number of code blocks whose content was rewritten.
    pub blocks_changed: usize,
    /// Number of code blocks skipped because they contain markup other than
    /// highlight spans (rewriting those would drop it).
    pub blocks_skipped: usize,
    /// Tokens re-tagged by the reclassifier.
    pub tokens_reclassified: usize,
    /// Interpolation regions processed.
    pub regions_split: usize,
    /// Placeholders carved out of string segments.
    pub placeholders_split: usize,
    /// Interpolation openers with no closing delimiter, left untouched.
    pub unterminated_regions: usize,
    /// Source buttons retargeted.
    pub links_rewritten: usize,
}

impl TransformResult {
    /// True if the output differs from the input.
    pub fn changed(&self) -> bool {
        self.blocks_changed > 0 || self.links_rewritten > 0
    }
}

/// Errors that can occur during HTML transformation.
#[derive(Debug)]
pub enum TransformError {
    /// The streaming rewriter rejected the document.
    Rewrite(lol_html::errors::RewritingError),
}

impl From<lol_html::errors::RewritingError> for TransformError {
    fn from(e: lol_html::errors::RewritingError) -> Self {
        TransformError::Rewrite(e)
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::Rewrite(e) => write!(f, "HTML rewriting error: {}", e),
        }
    }
}

impl std::error::Error for TransformError {}

/// One `<code>` element's reconstructed child list.
#[derive(Debug, Default)]
struct Block {
    tokens: Vec<Token>,
    /// Set when the block contains child markup other than plain spans.
    opaque: bool,
}

/// Streaming state for the extraction pass.
#[derive(Debug, Default)]
struct Extract {
    blocks: Vec<Block>,
    current: Option<Block>,
    in_span: bool,
}

impl Extract {
    fn open_block(&mut self) {
        self.current = Some(Block::default());
        self.in_span = false;
    }

    fn close_block(&mut self) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
    }

    fn open_span(&mut self, classes: Vec<String>) {
        let Some(block) = self.current.as_mut() else {
            return;
        };
        if self.in_span {
            // Spans nested in spans are not something the tokenizer emits;
            // treat the block as foreign markup rather than guess.
            block.opaque = true;
            return;
        }
        self.in_span = true;
        block.tokens.push(Token::span(classes, ""));
    }

    fn close_span(&mut self) {
        self.in_span = false;
    }

    fn foreign_element(&mut self) {
        if let Some(block) = self.current.as_mut() {
            block.opaque = true;
        }
    }

    fn push_text(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let Some(block) = self.current.as_mut() else {
            return;
        };
        if self.in_span {
            if let Some(token) = block.tokens.last_mut() {
                token.push_text(chunk);
            }
        } else {
            // Merge adjacent chunks into a single text node, the way the
            // document actually stores them.
            match block.tokens.last_mut() {
                Some(token) if token.kind() == TokenKind::Text => token.push_text(chunk),
                _ => block.tokens.push(Token::text_node(chunk)),
            }
        }
    }
}

/// First pass: rebuild each code block's child list without touching the
/// document.
fn extract_blocks(html: &str) -> Result<Vec<Block>, TransformError> {
    let state = Rc::new(RefCell::new(Extract::default()));

    let code_state = Rc::clone(&state);
    let inner_state = Rc::clone(&state);
    let text_state = Rc::clone(&state);

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("code", move |el| {
                    code_state.borrow_mut().open_block();
                    if let Some(handlers) = el.end_tag_handlers() {
                        let state = Rc::clone(&code_state);
                        let handler: EndTagHandler = Box::new(move |_end| {
                            state.borrow_mut().close_block();
                            Ok(())
                        });
                        handlers.push(handler);
                    }
                    Ok(())
                }),
                element!("code *", move |el| {
                    if el.tag_name() == "span" {
                        let classes: Vec<String> = el
                            .get_attribute("class")
                            .map(|attr| attr.split_whitespace().map(str::to_string).collect())
                            .unwrap_or_default();
                        inner_state.borrow_mut().open_span(classes);
                        if let Some(handlers) = el.end_tag_handlers() {
                            let state = Rc::clone(&inner_state);
                            let handler: EndTagHandler = Box::new(move |_end| {
                                state.borrow_mut().close_span();
                                Ok(())
                            });
                            handlers.push(handler);
                        }
                    } else {
                        inner_state.borrow_mut().foreign_element();
                    }
                    Ok(())
                }),
                text!("code", move |chunk| {
                    text_state.borrow_mut().push_text(chunk.as_str());
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )?;

    let blocks = std::mem::take(&mut state.borrow_mut().blocks);
    Ok(blocks)
}

/// Serialize a token sequence back into code block inner HTML.
///
/// Text is emitted exactly as captured, so escaping is already correct.
fn render_tokens(tokens: &[Token]) -> String {
    let mut html = String::new();
    for token in tokens {
        match token.kind() {
            TokenKind::Text => html.push_str(token.text()),
            TokenKind::Span => {
                if token.classes().is_empty() {
                    html.push_str("<span>");
                } else {
                    html.push_str("<span class=\"");
                    html.push_str(&token.classes().join(" "));
                    html.push_str("\">");
                }
                html.push_str(token.text());
                html.push_str("</span>");
            }
        }
    }
    html
}

/// Transform one HTML document.
///
/// Returns the transformed document and what was done to it. When
/// [`TransformResult::changed`] is false the returned string is
/// content-identical to the input and need not be written back.
pub fn transform_html(html: &str) -> Result<(String, TransformResult), TransformError> {
    let mut result = TransformResult::default();

    let blocks = extract_blocks(html)?;
    result.blocks_scanned = blocks.len();

    // Replacement inner HTML per code block, in document order. `None` means
    // the block is left as-is.
    let mut replacements: VecDeque<Option<String>> = VecDeque::with_capacity(blocks.len());
    for mut block in blocks {
        if block.opaque {
            result.blocks_skipped += 1;
            replacements.push_back(None);
            continue;
        }
        let retagged = reclassify(&mut block.tokens);
        let outcome = split_interpolations(&mut block.tokens);
        result.tokens_reclassified += retagged;
        result.regions_split += outcome.regions;
        result.placeholders_split += outcome.placeholders;
        result.unterminated_regions += outcome.unterminated;
        if retagged > 0 || outcome.changed() {
            result.blocks_changed += 1;
            replacements.push_back(Some(render_tokens(&block.tokens)));
        } else {
            replacements.push_back(None);
        }
    }

    let replacements = Rc::new(RefCell::new(replacements));
    let links_rewritten = Rc::new(RefCell::new(0usize));

    let block_replacements = Rc::clone(&replacements);
    let link_count = Rc::clone(&links_rewritten);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("code", move |el| {
                    // Same selector as the extraction pass, so the queue
                    // lines up with the blocks in document order.
                    if let Some(replacement) =
                        block_replacements.borrow_mut().pop_front().flatten()
                    {
                        el.set_inner_content(&replacement, ContentType::Html);
                    }
                    Ok(())
                }),
                element!("a.md-content__button", move |el| {
                    let (Some(href), Some(title)) =
                        (el.get_attribute("href"), el.get_attribute("title"))
                    else {
                        return Ok(());
                    };
                    if let Some(target) = rewrite_source_link(&href, &title) {
                        el.set_attribute("href", &target)?;
                        *link_count.borrow_mut() += 1;
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )?;

    result.links_rewritten = *links_rewritten.borrow();
    Ok((output, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn library_call_is_retagged_in_place() {
        let html = indoc! {r#"
            <div class="highlight"><pre><code><span class="kd">local</span> <span class="n">x</span> <span class="o">=</span> <span class="n">String</span><span class="p">.</span><span class="n">Trim</span><span class="p">(</span><span class="s2">&quot;  hi  &quot;</span><span class="p">)</span>
            </code></pre></div>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.blocks_scanned, 1);
        assert_eq!(result.blocks_changed, 1);
        assert_eq!(result.tokens_reclassified, 1);
        assert!(out.contains(r#"<span class="nf">Trim</span>"#));
        // Untouched neighbors keep their classes and spacing.
        assert!(out.contains(r#"<span class="kd">local</span> <span class="n">x</span>"#));
        assert!(out.contains(r#"<span class="s2">&quot;  hi  &quot;</span>"#));
    }

    #[test]
    fn interpolation_block_is_split_and_restyled() {
        let html = indoc! {r#"
            <div class="highlight"><pre><code><span class="err">`</span><span class="s2">&quot;Hello {name}!&quot;</span><span class="err">`</span>
            </code></pre></div>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.regions_split, 1);
        assert_eq!(result.placeholders_split, 1);
        assert!(out.contains(
            r#"<span class="s">&quot;Hello {</span><span class="n">name</span><span class="s2">}!&quot;</span>"#
        ));
        // Both delimiters traded err for s.
        assert!(!out.contains(r#"class="err""#));
        assert_eq!(out.matches(r#"<span class="s">`</span>"#).count(), 2);
    }

    #[test]
    fn plain_block_is_left_byte_identical() {
        let html = indoc! {r#"
            <p>Intro text.</p>
            <div class="highlight"><pre><code><span class="kd">local</span> <span class="n">x</span> <span class="o">=</span> <span class="mi">5</span>
            </code></pre></div>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert!(!result.changed());
        assert_eq!(out, html);
    }

    #[test]
    fn block_with_foreign_markup_is_skipped() {
        let html = indoc! {r#"
            <pre><code><a id="line-1"></a><span class="n">String</span><span class="p">.</span><span class="n">Trim</span><span class="p">(</span><span class="p">)</span></code></pre>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.blocks_skipped, 1);
        assert_eq!(result.blocks_changed, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn inline_code_participates() {
        let html = r#"<p>Call <code class="highlight"><span class="n">StringPlus</span><span class="p">.</span><span class="n">Escape</span><span class="p">(</span><span class="p">)</span></code> instead.</p>"#;
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.tokens_reclassified, 1);
        assert!(out.contains(r#"<span class="nf">Escape</span>"#));
    }

    #[test]
    fn source_buttons_are_retargeted() {
        let html = indoc! {r#"
            <a href="https://github.com/EgizianoEG/String-Plus/tree/master/docs/guide/intro.md" title="View source of this page" class="md-content__button md-icon">view</a>
            <a href="https://github.com/EgizianoEG/String-Plus/tree/master/docs/guide/intro.md" title="Edit this page" class="md-content__button md-icon">edit</a>
            <a href="https://example.com/unrelated" title="Edit this page" class="md-content__button md-icon">odd</a>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.links_rewritten, 2);
        assert!(out.contains(
            r#"href="https://raw.githubusercontent.com/EgizianoEG/String-Plus/master/docs/guide/intro.md""#
        ));
        assert!(out.contains(
            r#"href="https://github.com/EgizianoEG/String-Plus/edit/master/docs/guide/intro.md""#
        ));
        // The unrecognized href is a silent no-op.
        assert!(out.contains(r#"href="https://example.com/unrelated""#));
    }

    #[test]
    fn unterminated_region_is_reported_but_not_touched() {
        let html = indoc! {r#"
            <pre><code><span class="err">`</span><span class="s2">&quot;no closer {x}!&quot;</span>
            </code></pre>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.unterminated_regions, 1);
        assert_eq!(result.blocks_changed, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn multiple_blocks_keep_their_order() {
        let html = indoc! {r#"
            <pre><code><span class="n">Enum</span><span class="p">.</span><span class="n">Color</span><span class="p">.</span><span class="n">Red</span></code></pre>
            <pre><code><span class="kd">local</span> <span class="n">y</span></code></pre>
            <pre><code><span class="n">String</span><span class="p">.</span><span class="n">Rep</span><span class="p">(</span><span class="p">)</span></code></pre>
        "#};
        let (out, result) = transform_html(html).unwrap();
        assert_eq!(result.blocks_scanned, 3);
        assert_eq!(result.blocks_changed, 2);
        assert!(out.contains(r#"<span class="md-code-enum-data-type">Enum</span>"#));
        assert!(out.contains(r#"<span class="md-code-enum">Color</span>"#));
        assert!(out.contains(r#"<span class="md-code-enum-item">Red</span>"#));
        // The untouched middle block survives verbatim.
        assert!(out.contains(r#"<code><span class="kd">local</span> <span class="n">y</span></code>"#));
        assert!(out.contains(r#"<span class="nf">Rep</span>"#));
    }
}
