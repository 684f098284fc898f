//! jhp: a header-compilation parser for Java.
//!
//! Parses the subset of Java needed to compile against a source file without
//! compiling it: packages, imports, type declarations, members, type syntax,
//! modifiers, and annotations. Method bodies, initializer blocks, and
//! non-constant field initializers are skipped lexically; constant
//! initializers and annotation defaults are kept as expression trees.
//!
//! ## Pipeline
//!
//! ```text
//! Source text → Unicode escape expansion → Lexer → Parser → CompUnit
//!                                                    ↓
//!                          constant-expression sub-parser / initializer splitter
//! ```
//!
//! ## Example
//!
//! ```
//! let unit = jhp::parse("package p; class C<T> { T f; }").unwrap();
//! assert_eq!(unit.type_decls[0].name, "C");
//! ```
//!
//! Parsing fails fast: the first syntax error aborts the parse and is
//! reported with the source name, line, and column.

pub mod ast;
pub mod parser;
pub mod source;

pub use ast::{AstPrinter, CompUnit};
pub use parser::{parse, parse_source, ParseError, ParseErrorKind, ParseResult};
pub use source::SourceFile;
