use std::fmt;

use bitflags::bitflags;

use super::Location;
use crate::source::SourceFile;

bitflags! {
    /// Declaration modifiers as a bit set.
    ///
    /// Includes the synthetic flags the parser adds itself: `VARARGS` for
    /// `...` parameters and their enclosing method, `ACC_ENUM` for enum
    /// constants, and `ENUM_IMPL` for enum constants that supplied a class
    /// body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC       = 1 << 0;
        const PROTECTED    = 1 << 1;
        const PRIVATE      = 1 << 2;
        const STATIC       = 1 << 3;
        const ABSTRACT     = 1 << 4;
        const FINAL        = 1 << 5;
        const NATIVE       = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT    = 1 << 8;
        const VOLATILE     = 1 << 9;
        const STRICTFP     = 1 << 10;
        const DEFAULT      = 1 << 11;
        const VARARGS      = 1 << 12;
        const ACC_ENUM     = 1 << 13;
        const ENUM_IMPL    = 1 << 14;
    }
}

impl Modifiers {
    /// Source-level modifier keywords, in the customary order. Synthetic
    /// flags have no keyword and are skipped.
    pub fn keywords(&self) -> Vec<&'static str> {
        const PRINTABLE: [(Modifiers, &str); 12] = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::ABSTRACT, "abstract"),
            (Modifiers::DEFAULT, "default"),
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::TRANSIENT, "transient"),
            (Modifiers::VOLATILE, "volatile"),
            (Modifiers::SYNCHRONIZED, "synchronized"),
            (Modifiers::NATIVE, "native"),
            (Modifiers::STRICTFP, "strictfp"),
        ];
        let mut keywords = Vec::new();
        for (flag, keyword) in PRINTABLE {
            if self.contains(flag) {
                keywords.push(keyword);
            }
        }
        keywords
    }
}

/// A parsed compilation unit: the root of the tree.
#[derive(Debug, Clone)]
pub struct CompUnit {
    pub location: Location,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub type_decls: Vec<TypeDecl>,
    pub source: SourceFile,
}

#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub location: Location,
    /// Qualified name, one segment per element.
    pub name: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name.join("."))
    }
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub location: Location,
    pub name: Vec<String>,
    pub is_static: bool,
    pub is_wildcard: bool,
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import ")?;
        if self.is_static {
            write!(f, "static ")?;
        }
        write!(f, "{}", self.name.join("."))?;
        if self.is_wildcard {
            write!(f, ".*")?;
        }
        write!(f, ";")
    }
}

/// The four kinds of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A class, interface, enum, or annotation-type declaration.
///
/// Enums and annotation types never carry type parameters or a superclass,
/// and annotation types never carry interfaces; the parser does not populate
/// those fields for them.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub location: Location,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<ClassType>,
    pub implements: Vec<ClassType>,
    pub members: Vec<Member>,
    pub kind: TypeKind,
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
        };
        write!(f, "{} {}", keyword, self.name)
    }
}

/// A member of a type declaration body.
///
/// Enum constants appear as `Field`s carrying `ACC_ENUM`.
#[derive(Debug, Clone)]
pub enum Member {
    Field(VarDecl),
    Method(MethodDecl),
    Type(TypeDecl),
}

/// A type parameter: `T extends A & B`.
#[derive(Debug, Clone)]
pub struct TypeParam {
    pub location: Location,
    pub name: String,
    pub bounds: Vec<Type>,
    pub annotations: Vec<Annotation>,
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " extends " } else { " & " }, bound)?;
        }
        Ok(())
    }
}

/// A class or interface type reference.
///
/// Qualification folds left: in `A.B<X>.C`, the node for `C` encloses the
/// node for `B<X>`, which encloses the node for `A`.
#[derive(Debug, Clone)]
pub struct ClassType {
    pub location: Location,
    pub enclosing: Option<Box<ClassType>>,
    pub name: String,
    pub type_args: Vec<Type>,
    pub annotations: Vec<Annotation>,
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(enclosing) = &self.enclosing {
            write!(f, "{}.", enclosing)?;
        }
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone)]
pub struct PrimType {
    pub location: Location,
    pub annotations: Vec<Annotation>,
    pub kind: PrimitiveKind,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub location: Location,
    pub annotations: Vec<Annotation>,
    pub element: Box<Type>,
}

/// A wildcard type argument. At most one bound is present; neither means an
/// unbounded `?`.
#[derive(Debug, Clone)]
pub struct WildcardType {
    pub location: Location,
    pub annotations: Vec<Annotation>,
    pub upper: Option<Box<Type>>,
    pub lower: Option<Box<Type>>,
}

#[derive(Debug, Clone)]
pub struct VoidType {
    pub location: Location,
    pub annotations: Vec<Annotation>,
}

/// Type syntax.
#[derive(Debug, Clone)]
pub enum Type {
    Primitive(PrimType),
    Class(ClassType),
    Array(ArrayType),
    Wildcard(WildcardType),
    Void(VoidType),
}

impl Type {
    pub fn location(&self) -> Location {
        match self {
            Type::Primitive(t) => t.location,
            Type::Class(t) => t.location,
            Type::Array(t) => t.location,
            Type::Wildcard(t) => t.location,
            Type::Void(t) => t.location,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(t) => write!(f, "{}", t.kind),
            Type::Class(t) => write!(f, "{}", t),
            Type::Array(t) => write!(f, "{}[]", t.element),
            Type::Wildcard(t) => {
                write!(f, "?")?;
                if let Some(upper) = &t.upper {
                    write!(f, " extends {}", upper)?;
                }
                if let Some(lower) = &t.lower {
                    write!(f, " super {}", lower)?;
                }
                Ok(())
            }
            Type::Void(_) => write!(f, "void"),
        }
    }
}

/// A variable binding: a field, a formal parameter, or an enum constant.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub location: Location,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub ty: Type,
    pub name: String,
    pub initializer: Option<Expr>,
}

/// A method or constructor declaration.
///
/// A constructor has no return type and the canonical name `<init>`.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub location: Location,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<Type>,
    pub name: String,
    pub params: Vec<VarDecl>,
    pub throws: Vec<ClassType>,
    /// Annotation-type element default, e.g. `int value() default 0;`.
    pub default_value: Option<Expr>,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

/// An annotation use: `@a.b.Name(args)`.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub location: Location,
    pub name: Vec<String>,
    pub args: Vec<Expr>,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name.join("."))?;
        if !self.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

// Constant expressions.

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Long(v) => write!(f, "{}L", v),
            Literal::Float(v) => write!(f, "{}f", v),
            Literal::Double(v) => write!(f, "{}", v),
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Char(v) => write!(f, "'{}'", v.escape_default()),
            Literal::String(v) => write!(f, "\"{}\"", v.escape_default()),
            Literal::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub location: Location,
    pub value: Literal,
}

/// A (possibly qualified) name used as a constant reference.
#[derive(Debug, Clone)]
pub struct NameExpr {
    pub location: Location,
    pub name: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub location: Location,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub location: Location,
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub location: Location,
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub location: Location,
    pub ty: Type,
    pub operand: Box<Expr>,
}

/// `Name.class` or `int.class`.
#[derive(Debug, Clone)]
pub struct ClassLiteralExpr {
    pub location: Location,
    pub name: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ArrayInitExpr {
    pub location: Location,
    pub elements: Vec<Expr>,
}

/// A named annotation argument: `name = value`.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub location: Location,
    pub name: String,
    pub value: Box<Expr>,
}

/// Variant tags for [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Literal,
    Name,
    Unary,
    Binary,
    Conditional,
    Cast,
    ClassLiteral,
    ArrayInit,
    Annotation,
    Assign,
}

/// A constant expression, as produced by the constant-expression sub-parser.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Name(NameExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Cast(CastExpr),
    ClassLiteral(ClassLiteralExpr),
    ArrayInit(ArrayInitExpr),
    Annotation(Annotation),
    Assign(AssignExpr),
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Name(_) => ExprKind::Name,
            Expr::Unary(_) => ExprKind::Unary,
            Expr::Binary(_) => ExprKind::Binary,
            Expr::Conditional(_) => ExprKind::Conditional,
            Expr::Cast(_) => ExprKind::Cast,
            Expr::ClassLiteral(_) => ExprKind::ClassLiteral,
            Expr::ArrayInit(_) => ExprKind::ArrayInit,
            Expr::Annotation(_) => ExprKind::Annotation,
            Expr::Assign(_) => ExprKind::Assign,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Expr::Literal(e) => e.location,
            Expr::Name(e) => e.location,
            Expr::Unary(e) => e.location,
            Expr::Binary(e) => e.location,
            Expr::Conditional(e) => e.location,
            Expr::Cast(e) => e.location,
            Expr::ClassLiteral(e) => e.location,
            Expr::ArrayInit(e) => e.location,
            Expr::Annotation(e) => e.location,
            Expr::Assign(e) => e.location,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(e) => write!(f, "{}", e.value),
            Expr::Name(e) => write!(f, "{}", e.name.join(".")),
            Expr::Unary(e) => write!(f, "{}{}", e.op.symbol(), e.operand),
            Expr::Binary(e) => write!(f, "({} {} {})", e.lhs, e.op.symbol(), e.rhs),
            Expr::Conditional(e) => {
                write!(f, "({} ? {} : {})", e.condition, e.then_expr, e.else_expr)
            }
            Expr::Cast(e) => write!(f, "({}) {}", e.ty, e.operand),
            Expr::ClassLiteral(e) => write!(f, "{}.class", e.name.join(".")),
            Expr::ArrayInit(e) => {
                write!(f, "{{")?;
                for (i, element) in e.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
            Expr::Annotation(e) => write!(f, "{}", e),
            Expr::Assign(e) => write!(f, "{} = {}", e.name, e.value),
        }
    }
}
