//! Tokenization.
//!
//! The token set covers all of Java 8, not just the declaration subset the
//! parser understands: method bodies are skipped lexically, so everything
//! inside them must still tokenize. Maximal munch makes `>>` and `>>>`
//! single tokens; the parser splits them back apart when they close nested
//! type-argument lists.

use logos::Logos;

use crate::ast::{Location, PrimitiveKind};
use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::parser::unicode;
use crate::source::SourceFile;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("instanceof")]
    InstanceOf,
    #[token("void")]
    Void,
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Operators
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    LShiftAssign,
    #[token(">>=")]
    RShiftAssign,
    #[token(">>>=")]
    URShiftAssign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    PipePipe,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,

    // Literals
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\]|\\.)'|'\\[0-7]{1,3}'")]
    CharLiteral,
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[lL]?")]
    HexInteger,
    #[regex(r"0[bB][01][01_]*[lL]?")]
    BinaryInteger,
    #[regex(r"0[0-7]+")]
    OctalInteger,
    #[regex(r"[0-9][0-9_]*[lL]?")]
    DecimalInteger,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    FloatLiteral,
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    ScientificFloat,
    #[regex(r"[0-9]+[lL]")]
    LongLiteral,
    #[regex(r"([0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+|[0-9]+)[fFdD]")]
    TypedFloat,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    // Comments and whitespace
    #[regex(r"//[^\n]*")]
    LineComment,
    // Block/Javadoc comment (handles /**...*/, /*...*/, and multiple '*')
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r]+", priority = 2)]
    Whitespace,

    // Unicode BOM (Byte Order Mark) - treat as ignorable whitespace
    #[token("\u{FEFF}")]
    Bom,
    // ASCII SUB: tolerated and ignored (JLS 3.5)
    #[token("\u{001A}")]
    Sub,

    /// Synthesized after the last real token; a literal NUL in the input is
    /// rejected during tokenization.
    #[regex(r"\x00", priority = 3)]
    Eof,
}

impl Token {
    /// True for tokens whose text the parser needs later: identifiers and
    /// literals.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            Token::Identifier
                | Token::StringLiteral
                | Token::CharLiteral
                | Token::HexInteger
                | Token::BinaryInteger
                | Token::OctalInteger
                | Token::DecimalInteger
                | Token::FloatLiteral
                | Token::ScientificFloat
                | Token::LongLiteral
                | Token::TypedFloat
        )
    }

    /// The primitive type a keyword names, if any.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Token::Boolean => PrimitiveKind::Boolean,
            Token::Byte => PrimitiveKind::Byte,
            Token::Short => PrimitiveKind::Short,
            Token::Int => PrimitiveKind::Int,
            Token::Long => PrimitiveKind::Long,
            Token::Char => PrimitiveKind::Char,
            Token::Float => PrimitiveKind::Float,
            Token::Double => PrimitiveKind::Double,
            _ => return None,
        })
    }

    /// Surface form used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Package => "'package'",
            Token::Import => "'import'",
            Token::Static => "'static'",
            Token::Public => "'public'",
            Token::Protected => "'protected'",
            Token::Private => "'private'",
            Token::Abstract => "'abstract'",
            Token::Final => "'final'",
            Token::Native => "'native'",
            Token::Synchronized => "'synchronized'",
            Token::Transient => "'transient'",
            Token::Volatile => "'volatile'",
            Token::Strictfp => "'strictfp'",
            Token::Class => "'class'",
            Token::Interface => "'interface'",
            Token::Enum => "'enum'",
            Token::Extends => "'extends'",
            Token::Implements => "'implements'",
            Token::New => "'new'",
            Token::This => "'this'",
            Token::Super => "'super'",
            Token::InstanceOf => "'instanceof'",
            Token::Void => "'void'",
            Token::Boolean => "'boolean'",
            Token::Byte => "'byte'",
            Token::Short => "'short'",
            Token::Int => "'int'",
            Token::Long => "'long'",
            Token::Char => "'char'",
            Token::Float => "'float'",
            Token::Double => "'double'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::For => "'for'",
            Token::While => "'while'",
            Token::Do => "'do'",
            Token::Switch => "'switch'",
            Token::Case => "'case'",
            Token::Default => "'default'",
            Token::Assert => "'assert'",
            Token::Break => "'break'",
            Token::Continue => "'continue'",
            Token::Return => "'return'",
            Token::Throw => "'throw'",
            Token::Throws => "'throws'",
            Token::Try => "'try'",
            Token::Catch => "'catch'",
            Token::Finally => "'finally'",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::Assign => "'='",
            Token::AddAssign => "'+='",
            Token::SubAssign => "'-='",
            Token::MulAssign => "'*='",
            Token::DivAssign => "'/='",
            Token::ModAssign => "'%='",
            Token::AndAssign => "'&='",
            Token::OrAssign => "'|='",
            Token::XorAssign => "'^='",
            Token::LShiftAssign => "'<<='",
            Token::RShiftAssign => "'>>='",
            Token::URShiftAssign => "'>>>='",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Percent => "'%'",
            Token::Inc => "'++'",
            Token::Dec => "'--'",
            Token::Bang => "'!'",
            Token::Tilde => "'~'",
            Token::Amp => "'&'",
            Token::Pipe => "'|'",
            Token::Caret => "'^'",
            Token::LShift => "'<<'",
            Token::RShift => "'>>'",
            Token::URShift => "'>>>'",
            Token::AndAnd => "'&&'",
            Token::PipePipe => "'||'",
            Token::Eq => "'=='",
            Token::Ne => "'!='",
            Token::Lt => "'<'",
            Token::Le => "'<='",
            Token::Gt => "'>'",
            Token::Ge => "'>='",
            Token::Question => "'?'",
            Token::Colon => "':'",
            Token::DoubleColon => "'::'",
            Token::Arrow => "'->'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::Semicolon => "';'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::At => "'@'",
            Token::Ellipsis => "'...'",
            Token::StringLiteral => "string literal",
            Token::CharLiteral => "character literal",
            Token::HexInteger
            | Token::BinaryInteger
            | Token::OctalInteger
            | Token::DecimalInteger
            | Token::LongLiteral => "integer literal",
            Token::FloatLiteral | Token::ScientificFloat | Token::TypedFloat => {
                "floating-point literal"
            }
            Token::Identifier => "identifier",
            Token::LineComment | Token::BlockComment => "comment",
            Token::Whitespace | Token::Bom | Token::Sub => "whitespace",
            Token::Eof => "end of input",
        }
    }

    fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace
                | Token::LineComment
                | Token::BlockComment
                | Token::Bom
                | Token::Sub
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token plus everything needed to replay it later: its text (for
/// identifiers and literals) and its location in the original source.
#[derive(Debug, Clone)]
pub struct SavedToken {
    pub token: Token,
    pub value: Option<String>,
    pub location: Location,
}

impl SavedToken {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Tokenizes a whole source file up front.
pub struct Lexer<'a> {
    source: &'a SourceFile,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self { source }
    }

    /// Expand unicode escapes and tokenize, filtering trivia. The result
    /// always ends with a synthetic `Eof` token positioned at end of file.
    pub fn tokenize(self) -> ParseResult<Vec<SavedToken>> {
        let expanded = unicode::expand(self.source)?;
        let mut lexer = Token::lexer(expanded.text.as_ref());
        let mut tokens = Vec::new();
        while let Some(result) = lexer.next() {
            let offset = expanded.original_offset(lexer.span().start);
            let location = self.source.location(offset);
            match result {
                // A literal NUL only matches the synthetic Eof pattern.
                Ok(Token::Eof) => {
                    return Err(ParseError::new(
                        self.source.clone(),
                        location,
                        ParseErrorKind::UnrecognizedToken { text: lexer.slice().to_string() },
                    ));
                }
                Ok(token) => {
                    if token.is_trivia() {
                        continue;
                    }
                    let value = token.has_value().then(|| lexer.slice().to_string());
                    tokens.push(SavedToken { token, value, location });
                }
                Err(()) => {
                    return Err(ParseError::new(
                        self.source.clone(),
                        location,
                        ParseErrorKind::UnrecognizedToken { text: lexer.slice().to_string() },
                    ));
                }
            }
        }
        tokens.push(SavedToken {
            token: Token::Eof,
            value: None,
            location: self.source.location(self.source.text().len()),
        });
        Ok(tokens)
    }
}

/// A one-token-lookahead cursor over saved tokens.
///
/// The same type serves as the main stream over a whole file and as the
/// replay stream over slices saved by the variable-initializer splitter, so
/// the constant-expression parser runs identical logic on either.
pub struct TokenStream {
    tokens: Vec<SavedToken>,
    pos: usize,
    source: SourceFile,
}

impl TokenStream {
    /// Lex `source` and position the cursor on the first token.
    pub fn new(source: SourceFile) -> ParseResult<Self> {
        let tokens = Lexer::new(&source).tokenize()?;
        Ok(Self { tokens, pos: 0, source })
    }

    /// A stream over tokens saved earlier, e.g. one declarator slice of a
    /// multi-variable field. Appends its own `Eof`.
    pub fn from_saved(source: SourceFile, mut tokens: Vec<SavedToken>) -> Self {
        let end = tokens.last().map(|t| t.location).unwrap_or_else(Location::start);
        tokens.push(SavedToken { token: Token::Eof, value: None, location: end });
        Self { tokens, pos: 0, source }
    }

    /// The token under the cursor.
    pub fn current(&self) -> &SavedToken {
        &self.tokens[self.pos]
    }

    /// Move to the next token and return its kind. Clamps at `Eof`.
    pub fn advance(&mut self) -> Token {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens[self.pos].token
    }

    /// The string value of the token under the cursor (identifiers and
    /// literals; empty otherwise).
    pub fn value(&self) -> &str {
        self.current().value()
    }

    pub fn location(&self) -> Location {
        self.current().location
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<SavedToken> {
        let source = SourceFile::anonymous(text);
        Lexer::new(&source).tokenize().expect("failed to tokenize")
    }

    fn kinds(text: &str) -> Vec<Token> {
        tokenize(text).into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = tokenize("public class Test extends Object");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].token, Token::Public);
        assert_eq!(tokens[1].token, Token::Class);
        assert_eq!(tokens[2].token, Token::Identifier);
        assert_eq!(tokens[2].value(), "Test");
        assert_eq!(tokens[3].token, Token::Extends);
        assert_eq!(tokens[4].value(), "Object");
        assert_eq!(tokens[5].token, Token::Eof);
    }

    #[test]
    fn close_angles_merge() {
        assert_eq!(
            kinds("A<B<C>> x >>> y"),
            vec![
                Token::Identifier,
                Token::Lt,
                Token::Identifier,
                Token::Lt,
                Token::Identifier,
                Token::RShift,
                Token::Identifier,
                Token::URShift,
                Token::Identifier,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn literals() {
        let tokens = tokenize(r#"42 42L 0x1F 0b101 017 1.5 1e3 2.5f "s" 'c'"#);
        let expected = [
            Token::DecimalInteger,
            Token::LongLiteral,
            Token::HexInteger,
            Token::BinaryInteger,
            Token::OctalInteger,
            Token::FloatLiteral,
            Token::ScientificFloat,
            Token::TypedFloat,
            Token::StringLiteral,
            Token::CharLiteral,
        ];
        for (token, expected) in tokens.iter().zip(expected) {
            assert_eq!(token.token, expected, "{:?}", token);
        }
    }

    #[test]
    fn comments_and_whitespace_are_dropped() {
        let tokens = tokenize("// line\n/* block */ /** javadoc */ ;");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token, Token::Semicolon);
    }

    #[test]
    fn positions_are_original_source_offsets() {
        let tokens = tokenize("\\u0063lass C");
        assert_eq!(tokens[0].token, Token::Class);
        assert_eq!(tokens[0].location.offset, 0);
        assert_eq!(tokens[1].token, Token::Identifier);
        assert_eq!(tokens[1].location.offset, 11);
    }

    #[test]
    fn unrecognized_character_errors() {
        let source = SourceFile::anonymous("class C { int x = `; }");
        let err = Lexer::new(&source).tokenize().unwrap_err();
        assert!(matches!(err.kind(), ParseErrorKind::UnrecognizedToken { .. }));
    }

    #[test]
    fn ellipsis_vs_dot() {
        assert_eq!(
            kinds("a... b.c"),
            vec![
                Token::Identifier,
                Token::Ellipsis,
                Token::Identifier,
                Token::Dot,
                Token::Identifier,
                Token::Eof,
            ]
        );
    }
}
