//! The token data model shared by both passes.
//!
//! A rendered code block is a flat, ordered sequence of inline nodes: `<span>`
//! elements carrying Pygments category classes, and the bare text nodes
//! between them. Both are represented as [`Token`]s; position in the sequence
//! is the only addressing mechanism.
//!
//! The passes only ever read and write the classes named by [`Tag`]. Any
//! other class on a span (`k`, `o`, `w`, ...) is preserved verbatim so the
//! sequence round-trips back into the document unchanged wherever the passes
//! did not act.

/// Category tags read and written by the passes, mapped to their CSS classes.
///
/// The first five are the Pygments input vocabulary; the rest are the
/// semantic output classes the stylesheet maps to visual styles. `Str` pulls
/// double duty: it is both the generic string-literal input class and the
/// output class applied to interpolation delimiters and absorbed punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// A bare identifier (`n`).
    Name,
    /// Punctuation (`p`).
    Punct,
    /// A string literal, and the generic "render as string" class (`s`).
    Str,
    /// A double-quoted string literal, the interpolation body class (`s2`).
    InterpStr,
    /// A token the upstream tokenizer could not classify (`err`).
    Unmatched,
    /// A library function call (`nf`).
    FuncName,
    /// The `Enum` keyword introducing an enum access chain.
    EnumMarker,
    /// An enum type name.
    EnumType,
    /// An enum member name.
    EnumMember,
}

impl Tag {
    /// The CSS class this tag reads from / writes to the document.
    pub const fn class(self) -> &'static str {
        match self {
            Tag::Name => "n",
            Tag::Punct => "p",
            Tag::Str => "s",
            Tag::InterpStr => "s2",
            Tag::Unmatched => "err",
            Tag::FuncName => "nf",
            Tag::EnumMarker => "md-code-enum-data-type",
            Tag::EnumType => "md-code-enum",
            Tag::EnumMember => "md-code-enum-item",
        }
    }
}

/// Whether a token renders as a classed `<span>` or as a bare text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A `<span>` element with a (possibly empty) class list.
    Span,
    /// A text node between spans. Carries no classes, ever.
    Text,
}

/// One inline node of a rendered code block.
///
/// Text is stored exactly as it appears in the document source (entities
/// still encoded). The passes only inspect characters HTML escaping never
/// touches (backticks, braces, plain identifiers), so matching and splitting
/// work directly on the stored form and serialization can emit it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    classes: Vec<String>,
    text: String,
}

impl Token {
    /// A span token with the given class list.
    pub fn span<I, S>(classes: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Token {
            kind: TokenKind::Span,
            classes: classes.into_iter().map(Into::into).collect(),
            text: text.into(),
        }
    }

    /// A span token carrying a single semantic tag. Used for tokens the
    /// splitter creates from scratch.
    pub fn tagged(tag: Tag, text: impl Into<String>) -> Self {
        Token::span([tag.class()], text)
    }

    /// A bare text node.
    pub fn text_node(text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Text,
            classes: Vec::new(),
            text: text.into(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the token's text. The splitter uses this to truncate a split
    /// segment down to its suffix.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Append to the token's text. The extraction layer uses this to stitch
    /// streaming text chunks back into one node.
    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// The class list, in document order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.classes.iter().any(|c| c == tag.class())
    }

    /// Add a tag's class if not already present. Appends, so the order of
    /// pre-existing classes in the attribute stays stable.
    pub fn add(&mut self, tag: Tag) {
        if !self.has(tag) {
            self.classes.push(tag.class().to_string());
        }
    }

    /// Remove every occurrence of a tag's class.
    pub fn remove(&mut self, tag: Tag) {
        self.classes.retain(|c| c != tag.class());
    }

    /// Swap one tag for another.
    pub fn retag(&mut self, from: Tag, to: Tag) {
        self.remove(from);
        self.add(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_appends() {
        let mut tok = Token::span(["p"], "(");
        tok.add(Tag::Str);
        tok.add(Tag::Str);
        assert_eq!(tok.classes(), ["p", "s"]);
    }

    #[test]
    fn retag_preserves_unrelated_classes() {
        let mut tok = Token::span(["n", "custom-marker"], "Trim");
        tok.retag(Tag::Name, Tag::FuncName);
        assert!(!tok.has(Tag::Name));
        assert!(tok.has(Tag::FuncName));
        assert_eq!(tok.classes(), ["custom-marker", "nf"]);
    }

    #[test]
    fn text_nodes_never_match_tags() {
        let tok = Token::text_node("  ");
        assert_eq!(tok.kind(), TokenKind::Text);
        assert!(!tok.has(Tag::Name));
        assert!(!tok.has(Tag::Unmatched));
    }
}
