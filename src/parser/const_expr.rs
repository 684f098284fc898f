//! Constant-expression parsing.
//!
//! Used for field initializers, annotation arguments, and annotation-type
//! element defaults. The parser is deliberately lenient: `expression`
//! returns `None` when no constant expression is parseable at the current
//! token, and the caller decides whether that is an error (annotation
//! arguments) or simply a non-constant initializer to drop (fields).
//!
//! The sub-parser shares the caller's token stream. The caller passes its
//! current token in and reads the final current token back out of `token`
//! when the call returns, so no token is consumed twice.

use crate::ast::{
    Annotation, ArrayInitExpr, AssignExpr, BinaryExpr, BinaryOp, CastExpr, ClassLiteralExpr,
    ClassType, ConditionalExpr, Expr, Literal, LiteralExpr, Location, NameExpr, PrimType, Type,
    UnaryExpr, UnaryOp,
};
use crate::parser::lexer::{Token, TokenStream};

pub struct ConstExpressionParser<'a> {
    stream: &'a mut TokenStream,
    pub token: Token,
    pub location: Location,
}

impl<'a> ConstExpressionParser<'a> {
    pub fn new(stream: &'a mut TokenStream, token: Token, location: Location) -> Self {
        Self { stream, token, location }
    }

    /// A parser positioned on the first token of `stream`; used for replayed
    /// declarator slices.
    pub fn from_start(stream: &'a mut TokenStream) -> Self {
        let token = stream.current().token;
        let location = stream.location();
        Self { stream, token, location }
    }

    fn advance(&mut self) {
        self.token = self.stream.advance();
        self.location = self.stream.location();
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.token == token {
            self.advance();
            true
        } else {
            false
        }
    }

    /// The text of the current token (identifiers and literals).
    fn value(&self) -> String {
        self.stream.value().to_string()
    }

    /// Parse one constant expression, or `None` if the current token cannot
    /// begin one (the stream may then be mid-expression; callers that treat
    /// `None` as "drop the initializer" discard the remaining slice).
    pub fn expression(&mut self) -> Option<Expr> {
        let expr = self.conditional()?;
        // A single name followed by `=` is a named annotation argument.
        if self.token == Token::Assign {
            if let Expr::Name(name) = &expr {
                if name.name.len() == 1 {
                    let location = name.location;
                    let name = name.name[0].clone();
                    self.advance();
                    let value = self.expression()?;
                    return Some(Expr::Assign(AssignExpr {
                        location,
                        name,
                        value: Box::new(value),
                    }));
                }
            }
            return None;
        }
        Some(expr)
    }

    fn conditional(&mut self) -> Option<Expr> {
        let condition = self.binary(0)?;
        if self.token != Token::Question {
            return Some(condition);
        }
        let location = condition.location();
        self.advance();
        let then_expr = self.expression()?;
        if !self.match_token(Token::Colon) {
            return None;
        }
        let else_expr = self.conditional()?;
        Some(Expr::Conditional(ConditionalExpr {
            location,
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }))
    }

    fn binary(&mut self, min_precedence: u8) -> Option<Expr> {
        let mut lhs = self.unary()?;
        while let Some((precedence, op)) = binary_op(self.token) {
            if precedence < min_precedence {
                break;
            }
            let location = lhs.location();
            self.advance();
            let rhs = self.binary(precedence + 1)?;
            lhs = Expr::Binary(BinaryExpr {
                location,
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<Expr> {
        let op = match self.token {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            Token::Bang => UnaryOp::Not,
            Token::Tilde => UnaryOp::BitNot,
            _ => return self.primary(),
        };
        let location = self.location;
        self.advance();
        let operand = self.unary()?;
        Some(Expr::Unary(UnaryExpr { location, op, operand: Box::new(operand) }))
    }

    fn primary(&mut self) -> Option<Expr> {
        let location = self.location;
        match self.token {
            Token::True => {
                self.advance();
                Some(literal(location, Literal::Bool(true)))
            }
            Token::False => {
                self.advance();
                Some(literal(location, Literal::Bool(false)))
            }
            Token::Null => {
                self.advance();
                Some(literal(location, Literal::Null))
            }
            Token::CharLiteral => {
                let value = char_literal(&self.value())?;
                self.advance();
                Some(literal(location, value))
            }
            Token::StringLiteral => {
                let value = string_literal(&self.value())?;
                self.advance();
                Some(literal(location, value))
            }
            Token::DecimalInteger
            | Token::HexInteger
            | Token::OctalInteger
            | Token::BinaryInteger
            | Token::LongLiteral => {
                let value = int_literal(&self.value())?;
                self.advance();
                Some(literal(location, value))
            }
            Token::FloatLiteral | Token::ScientificFloat | Token::TypedFloat => {
                let value = float_literal(&self.value())?;
                self.advance();
                Some(literal(location, value))
            }
            Token::Identifier => self.name(location),
            Token::LParen => self.paren_or_cast(location),
            Token::LBrace => self.array_init(location),
            Token::At => {
                self.advance();
                Some(Expr::Annotation(self.annotation(location)?))
            }
            Token::Boolean
            | Token::Byte
            | Token::Short
            | Token::Int
            | Token::Long
            | Token::Char
            | Token::Float
            | Token::Double => {
                // A bare primitive keyword only occurs in `int.class`.
                let keyword = match self.token.primitive() {
                    Some(kind) => kind.keyword().to_string(),
                    None => return None,
                };
                self.advance();
                if !self.match_token(Token::Dot) || !self.match_token(Token::Class) {
                    return None;
                }
                Some(Expr::ClassLiteral(ClassLiteralExpr { location, name: vec![keyword] }))
            }
            _ => None,
        }
    }

    /// A qualified name, possibly ending in `.class`.
    fn name(&mut self, location: Location) -> Option<Expr> {
        let mut segments = vec![self.value()];
        self.advance();
        while self.match_token(Token::Dot) {
            match self.token {
                Token::Identifier => {
                    segments.push(self.value());
                    self.advance();
                }
                Token::Class => {
                    self.advance();
                    return Some(Expr::ClassLiteral(ClassLiteralExpr {
                        location,
                        name: segments,
                    }));
                }
                _ => return None,
            }
        }
        Some(Expr::Name(NameExpr { location, name: segments }))
    }

    fn paren_or_cast(&mut self, location: Location) -> Option<Expr> {
        self.advance();
        if let Some(kind) = self.token.primitive() {
            self.advance();
            if self.token == Token::Dot {
                // `(int.class)`: a parenthesized class literal.
                self.advance();
                if !self.match_token(Token::Class) || !self.match_token(Token::RParen) {
                    return None;
                }
                return Some(Expr::ClassLiteral(ClassLiteralExpr {
                    location,
                    name: vec![kind.keyword().to_string()],
                }));
            }
            if !self.match_token(Token::RParen) {
                return None;
            }
            let operand = self.unary()?;
            let ty = Type::Primitive(PrimType { location, annotations: Vec::new(), kind });
            return Some(Expr::Cast(CastExpr { location, ty, operand: Box::new(operand) }));
        }
        let inner = self.expression()?;
        if !self.match_token(Token::RParen) {
            return None;
        }
        // `(Name) operand` is a reference-type cast when an operand follows.
        if let Expr::Name(name) = &inner {
            if starts_cast_operand(self.token) {
                let ty = Type::Class(fold_class_type(location, &name.name));
                let operand = self.unary()?;
                return Some(Expr::Cast(CastExpr {
                    location,
                    ty,
                    operand: Box::new(operand),
                }));
            }
        }
        Some(inner)
    }

    fn array_init(&mut self, location: Location) -> Option<Expr> {
        self.advance();
        let mut elements = Vec::new();
        while self.token != Token::RBrace {
            if self.token == Token::At {
                let annotation_location = self.location;
                self.advance();
                elements.push(Expr::Annotation(self.annotation(annotation_location)?));
            } else {
                elements.push(self.expression()?);
            }
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        if !self.match_token(Token::RBrace) {
            return None;
        }
        Some(Expr::ArrayInit(ArrayInitExpr { location, elements }))
    }

    /// An annotation whose `@` has already been consumed.
    fn annotation(&mut self, location: Location) -> Option<Annotation> {
        if self.token != Token::Identifier {
            return None;
        }
        let mut name = vec![self.value()];
        self.advance();
        while self.match_token(Token::Dot) {
            if self.token != Token::Identifier {
                return None;
            }
            name.push(self.value());
            self.advance();
        }
        let mut args = Vec::new();
        if self.match_token(Token::LParen) {
            while self.token != Token::RParen {
                args.push(self.expression()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
            if !self.match_token(Token::RParen) {
                return None;
            }
        }
        Some(Annotation { location, name, args })
    }
}

fn literal(location: Location, value: Literal) -> Expr {
    Expr::Literal(LiteralExpr { location, value })
}

fn binary_op(token: Token) -> Option<(u8, BinaryOp)> {
    Some(match token {
        Token::PipePipe => (1, BinaryOp::Or),
        Token::AndAnd => (2, BinaryOp::And),
        Token::Pipe => (3, BinaryOp::BitOr),
        Token::Caret => (4, BinaryOp::BitXor),
        Token::Amp => (5, BinaryOp::BitAnd),
        Token::Eq => (6, BinaryOp::Eq),
        Token::Ne => (6, BinaryOp::Ne),
        Token::Lt => (7, BinaryOp::Lt),
        Token::Gt => (7, BinaryOp::Gt),
        Token::Le => (7, BinaryOp::Le),
        Token::Ge => (7, BinaryOp::Ge),
        Token::LShift => (8, BinaryOp::Shl),
        Token::RShift => (8, BinaryOp::Shr),
        Token::URShift => (8, BinaryOp::UShr),
        Token::Plus => (9, BinaryOp::Add),
        Token::Minus => (9, BinaryOp::Sub),
        Token::Star => (10, BinaryOp::Mul),
        Token::Slash => (10, BinaryOp::Div),
        Token::Percent => (10, BinaryOp::Rem),
        _ => return None,
    })
}

fn starts_cast_operand(token: Token) -> bool {
    matches!(
        token,
        Token::Identifier
            | Token::LParen
            | Token::True
            | Token::False
            | Token::Null
            | Token::CharLiteral
            | Token::StringLiteral
            | Token::DecimalInteger
            | Token::HexInteger
            | Token::OctalInteger
            | Token::BinaryInteger
            | Token::LongLiteral
            | Token::FloatLiteral
            | Token::ScientificFloat
            | Token::TypedFloat
            | Token::Bang
            | Token::Tilde
    )
}

/// Left-fold dot-separated segments into an enclosing chain.
fn fold_class_type(location: Location, segments: &[String]) -> ClassType {
    let mut ty: Option<ClassType> = None;
    for segment in segments {
        ty = Some(ClassType {
            location,
            enclosing: ty.map(Box::new),
            name: segment.clone(),
            type_args: Vec::new(),
            annotations: Vec::new(),
        });
    }
    ty.expect("segments is never empty")
}

fn int_literal(text: &str) -> Option<Literal> {
    let (text, long) = match text.strip_suffix(['l', 'L']) {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    let (digits, radix) = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (rest, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    let value = u64::from_str_radix(&digits, radix).ok()?;
    if long {
        Some(Literal::Long(value as i64))
    } else {
        u32::try_from(value).ok().map(|v| Literal::Int(v as i32))
    }
}

fn float_literal(text: &str) -> Option<Literal> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    if let Some(rest) = digits.strip_suffix(['f', 'F']) {
        return rest.parse::<f32>().ok().map(Literal::Float);
    }
    let digits = digits.strip_suffix(['d', 'D']).unwrap_or(&digits);
    digits.parse::<f64>().ok().map(Literal::Double)
}

fn char_literal(text: &str) -> Option<Literal> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let unescaped = unescape(inner)?;
    let mut chars = unescaped.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(Literal::Char(ch))
}

fn string_literal(text: &str) -> Option<Literal> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    Some(Literal::String(unescape(inner)?))
}

/// Process Java escape sequences. Unicode escapes were already expanded
/// before lexing, so only the simple and octal escapes remain.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'b' => out.push('\u{0008}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{000C}'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            digit @ '0'..='7' => {
                let mut value = digit as u32 - '0' as u32;
                for _ in 0..2 {
                    let next = match chars.peek() {
                        Some(&next) if next.is_digit(8) => next,
                        _ => break,
                    };
                    let digit = next.to_digit(8).unwrap_or(0);
                    if value * 8 + digit > 0xFF {
                        break;
                    }
                    value = value * 8 + digit;
                    chars.next();
                }
                out.push(char::from_u32(value)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;

    fn parse_expr(text: &str) -> Option<Expr> {
        let source = SourceFile::anonymous(text);
        let mut stream = TokenStream::new(source).expect("failed to tokenize");
        let mut parser = ConstExpressionParser::from_start(&mut stream);
        parser.expression()
    }

    #[test]
    fn integer_literals() {
        assert!(matches!(
            parse_expr("42"),
            Some(Expr::Literal(LiteralExpr { value: Literal::Int(42), .. }))
        ));
        assert!(matches!(
            parse_expr("0x1F"),
            Some(Expr::Literal(LiteralExpr { value: Literal::Int(31), .. }))
        ));
        assert!(matches!(
            parse_expr("017"),
            Some(Expr::Literal(LiteralExpr { value: Literal::Int(15), .. }))
        ));
        assert!(matches!(
            parse_expr("42L"),
            Some(Expr::Literal(LiteralExpr { value: Literal::Long(42), .. }))
        ));
        assert!(matches!(
            parse_expr("0xFFFFFFFF"),
            Some(Expr::Literal(LiteralExpr { value: Literal::Int(-1), .. }))
        ));
    }

    #[test]
    fn string_escapes() {
        match parse_expr(r#""a\tb\101""#) {
            Some(Expr::Literal(LiteralExpr { value: Literal::String(s), .. })) => {
                assert_eq!(s, "a\tbA");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        match parse_expr("1 + 2 * 3") {
            Some(Expr::Binary(binary)) => {
                assert_eq!(binary.op, BinaryOp::Add);
                assert!(matches!(*binary.rhs, Expr::Binary(ref inner) if inner.op == BinaryOp::Mul));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn conditional_and_shift() {
        assert!(matches!(parse_expr("1 << 2 > 3 ? 4 : 5"), Some(Expr::Conditional(_))));
    }

    #[test]
    fn qualified_name_and_class_literal() {
        match parse_expr("a.b.C") {
            Some(Expr::Name(name)) => assert_eq!(name.name, ["a", "b", "C"]),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_expr("String.class"), Some(Expr::ClassLiteral(_))));
        assert!(matches!(parse_expr("int.class"), Some(Expr::ClassLiteral(_))));
    }

    #[test]
    fn casts() {
        assert!(matches!(parse_expr("(int) 1"), Some(Expr::Cast(_))));
        assert!(matches!(parse_expr("(String) \"x\""), Some(Expr::Cast(_))));
        // Parenthesized expression, not a cast.
        assert!(matches!(parse_expr("(1 + 2)"), Some(Expr::Binary(_))));
    }

    #[test]
    fn array_initializers() {
        match parse_expr("{1, 2, 3,}") {
            Some(Expr::ArrayInit(init)) => assert_eq!(init.elements.len(), 3),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_expr("{}"), Some(Expr::ArrayInit(_))));
    }

    #[test]
    fn named_argument() {
        match parse_expr("value = 1") {
            Some(Expr::Assign(assign)) => assert_eq!(assign.name, "value"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn nested_annotation() {
        assert!(matches!(parse_expr("@A(1)"), Some(Expr::Annotation(_))));
    }

    #[test]
    fn non_constant_yields_none() {
        assert!(parse_expr("new Foo()").is_none());
        assert!(parse_expr("]").is_none());
    }
}
