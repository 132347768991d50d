//! Semantic re-tagging of Pygments token streams for String-Plus docs.
//!
//! Pygments gives the String-Plus documentation generic lexical highlighting:
//! names, punctuation, string literals, and `err` for anything it could not
//! match. This crate layers library-specific semantics on top of that
//! existing tag stream - it never parses Luau itself.
//!
//! Two passes, run per code block over an owned token sequence:
//!
//! - [`reclassify`]: re-labels `String.*`/`StringPlus.*` member calls as
//!   function names and `Enum.<Type>.<Member>` chains as enum
//!   marker/type/member.
//! - [`split_interpolations`]: finds backtick-delimited interpolation
//!   regions (the backticks arrive as `err` tokens), restyles their bodies
//!   as strings, and splits `{var}` placeholders out of string segments into
//!   separate name tokens.
//!
//! Both passes take the sequence as an explicit argument instead of querying
//! any ambient document, which is what makes them testable without a
//! rendering environment. See [`token`] for the data model and the
//! round-tripping rules.
//!
//! # Example
//!
//! ```
//! use filigree::{reclassify, split_interpolations, Tag, Token};
//!
//! let mut tokens = vec![
//!     Token::span(["n"], "String"),
//!     Token::span(["p"], "."),
//!     Token::span(["n"], "Trim"),
//!     Token::span(["p"], "("),
//! ];
//! reclassify(&mut tokens);
//! assert!(tokens[2].has(Tag::FuncName));
//!
//! let mut tokens = vec![
//!     Token::span(["err"], "`"),
//!     Token::span(["s2"], "\"Hello {name}!\""),
//!     Token::span(["err"], "`"),
//! ];
//! let outcome = split_interpolations(&mut tokens);
//! assert_eq!(outcome.placeholders, 1);
//! assert_eq!(tokens[2].text(), "name");
//! ```

mod interp;
mod reclassify;
pub mod token;

pub use interp::{SplitOutcome, split_interpolations};
pub use reclassify::reclassify;
pub use token::{Tag, Token, TokenKind};
