use jhp::ast::{Member, Modifiers, Type, TypeKind};
use jhp::parser::parse;

const ENUM_CONSTANT: Modifiers = Modifiers::PUBLIC
    .union(Modifiers::STATIC)
    .union(Modifiers::FINAL)
    .union(Modifiers::ACC_ENUM);

#[test]
fn enum_constants_and_trailing_members() {
    let unit =
        parse("enum E implements I { A, B(1) { }, C; int x; }").expect("failed to parse");
    let decl = &unit.type_decls[0];
    assert_eq!(decl.kind, TypeKind::Enum);
    assert_eq!(decl.implements.len(), 1);
    assert_eq!(decl.implements[0].name, "I");
    assert_eq!(decl.members.len(), 4);

    match &decl.members[0] {
        Member::Field(a) => {
            assert_eq!(a.name, "A");
            assert_eq!(a.modifiers, ENUM_CONSTANT);
        }
        other => panic!("expected a field, got {:?}", other),
    }
    match &decl.members[1] {
        Member::Field(b) => {
            assert_eq!(b.name, "B");
            assert_eq!(b.modifiers, ENUM_CONSTANT | Modifiers::ENUM_IMPL);
        }
        other => panic!("expected a field, got {:?}", other),
    }
    match &decl.members[2] {
        Member::Field(c) => {
            assert_eq!(c.name, "C");
            assert_eq!(c.modifiers, ENUM_CONSTANT);
        }
        other => panic!("expected a field, got {:?}", other),
    }
    match &decl.members[3] {
        Member::Field(x) => {
            assert_eq!(x.name, "x");
            assert!(!x.modifiers.contains(Modifiers::ACC_ENUM));
        }
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn enum_constant_type_names_the_enum() {
    let unit = parse("enum Color { RED }").expect("failed to parse");
    match &unit.type_decls[0].members[0] {
        Member::Field(constant) => match &constant.ty {
            Type::Class(ty) => {
                assert_eq!(ty.name, "Color");
                assert!(ty.enclosing.is_none());
                assert!(ty.type_args.is_empty());
            }
            other => panic!("expected a class type, got {:?}", other),
        },
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn annotated_enum_constant() {
    let unit = parse("enum E { @Deprecated A, B }").expect("failed to parse");
    let decl = &unit.type_decls[0];
    match &decl.members[0] {
        Member::Field(a) => assert_eq!(a.annotations.len(), 1),
        other => panic!("expected a field, got {:?}", other),
    }
    match &decl.members[1] {
        Member::Field(b) => assert!(b.annotations.is_empty()),
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn constant_arguments_are_skipped() {
    let unit = parse("enum E { A(1, f(2), \"x\"), B }").expect("failed to parse");
    assert_eq!(unit.type_decls[0].members.len(), 2);
}

#[test]
fn constant_bodies_are_skipped() {
    let source = r#"
enum Op {
    PLUS { int apply(int a, int b) { return a + b; } },
    MINUS;
}
"#;
    let unit = parse(source).expect("failed to parse");
    let decl = &unit.type_decls[0];
    assert_eq!(decl.members.len(), 2);
    match &decl.members[0] {
        Member::Field(plus) => assert!(plus.modifiers.contains(Modifiers::ENUM_IMPL)),
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn enum_with_trailing_comma_and_semicolon() {
    let unit = parse("enum E { A, B, ; }").expect("failed to parse");
    assert_eq!(unit.type_decls[0].members.len(), 2);
}

#[test]
fn enum_methods_after_constants() {
    let unit = parse("enum E { A; void m() {} }").expect("failed to parse");
    let decl = &unit.type_decls[0];
    assert_eq!(decl.members.len(), 2);
    assert!(matches!(decl.members[1], Member::Method(_)));
}
