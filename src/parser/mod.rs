//! Lexing and parsing of Java declarations.
//!
//! The pipeline: unicode escape expansion, tokenization, then recursive
//! descent over the declaration grammar. Constant field initializers and
//! annotation values go through the constant-expression sub-parser; the
//! tails of multi-declarator fields are sliced by the variable-initializer
//! splitter before constant parsing.

pub mod const_expr;
pub mod error;
pub mod initializer;
pub mod lexer;
pub mod parser;
pub mod unicode;

pub use const_expr::ConstExpressionParser;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use initializer::VariableInitializerParser;
pub use lexer::{Lexer, SavedToken, Token, TokenStream};
pub use parser::{parse, parse_source, Parser};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_class() {
        let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;
        let unit = parse(source).expect("failed to parse");
        assert_eq!(unit.type_decls.len(), 1);
        assert_eq!(unit.type_decls[0].name, "HelloWorld");
    }

    #[test]
    fn parse_with_imports() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.ArrayList;

public class TestClass {
    private List<String> items;
}
"#;
        let unit = parse(source).expect("failed to parse");
        assert_eq!(unit.imports.len(), 2);
    }
}
