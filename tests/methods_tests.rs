use jhp::ast::{Expr, Literal, LiteralExpr, Member, MethodDecl, Modifiers, Type};
use jhp::parser::parse;

fn methods(source: &str) -> Vec<MethodDecl> {
    let unit = parse(source).expect("failed to parse");
    let decl = unit.type_decls.into_iter().next().expect("expected a declaration");
    decl.members
        .into_iter()
        .map(|member| match member {
            Member::Method(method) => method,
            other => panic!("expected a method, got {:?}", other),
        })
        .collect()
}

#[test]
fn constructor_and_method_with_throws() {
    let methods = methods("class C { C() {} void m() throws E, F {} }");
    assert_eq!(methods.len(), 2);

    let ctor = &methods[0];
    assert!(ctor.return_type.is_none());
    assert_eq!(ctor.name, "<init>");
    assert!(ctor.params.is_empty());
    assert!(ctor.is_constructor());

    let m = &methods[1];
    assert!(matches!(m.return_type, Some(Type::Void(_))));
    assert_eq!(m.name, "m");
    let throws: Vec<&str> = m.throws.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(throws, ["E", "F"]);
}

#[test]
fn constructor_with_parameters() {
    let methods = methods("class C { C(int a, String b) {} }");
    let ctor = &methods[0];
    assert_eq!(ctor.name, "<init>");
    assert_eq!(ctor.params.len(), 2);
    assert_eq!(ctor.params[0].name, "a");
    assert_eq!(ctor.params[1].name, "b");
}

#[test]
fn varargs_marks_parameter_and_method() {
    let methods = methods("class C { void f(int x, String... rest) {} }");
    let f = &methods[0];
    assert!(f.modifiers.contains(Modifiers::VARARGS));
    let rest = &f.params[1];
    assert!(rest.modifiers.contains(Modifiers::VARARGS));
    assert!(matches!(rest.ty, Type::Array(_)));
    assert!(!f.params[0].modifiers.contains(Modifiers::VARARGS));
}

#[test]
fn receiver_parameter() {
    let methods = methods("class C { void m(C this) {} }");
    assert_eq!(methods[0].params[0].name, "this");
}

#[test]
fn qualified_receiver_keeps_final_this() {
    let methods = methods("class Inner { void m(Outer.Inner Outer.this) {} }");
    assert_eq!(methods[0].params[0].name, "this");
}

#[test]
fn c_style_return_array() {
    let methods = methods("class C { int f()[] { return null; } }");
    assert!(matches!(methods[0].return_type, Some(Type::Array(_))));
}

#[test]
fn c_style_parameter_array() {
    let methods = methods("class C { void f(int xs[]) {} }");
    assert!(matches!(methods[0].params[0].ty, Type::Array(_)));
}

#[test]
fn abstract_and_interface_methods_have_no_body() {
    let methods = methods("interface I { void close(); int size(); }");
    assert_eq!(methods.len(), 2);
}

#[test]
fn interface_default_method() {
    let methods = methods("interface I { default int f() { return 1; } }");
    assert!(methods[0].modifiers.contains(Modifiers::DEFAULT));
}

#[test]
fn annotation_element_default_value() {
    let methods = methods("@interface A { String value() default \"x\"; }");
    let value = &methods[0];
    assert_eq!(value.name, "value");
    match &value.return_type {
        Some(Type::Class(ty)) => assert_eq!(ty.name, "String"),
        other => panic!("expected a class type, got {:?}", other),
    }
    match &value.default_value {
        Some(Expr::Literal(LiteralExpr { value: Literal::String(s), .. })) => {
            assert_eq!(s, "x");
        }
        other => panic!("expected a string literal, got {:?}", other),
    }
}

#[test]
fn annotation_element_default_annotation() {
    let methods = methods("@interface A { B value() default @B; }");
    assert!(matches!(methods[0].default_value, Some(Expr::Annotation(_))));
}

#[test]
fn annotation_element_default_array() {
    let methods = methods("@interface A { int[] value() default {1, 2}; }");
    assert!(matches!(methods[0].default_value, Some(Expr::ArrayInit(_))));
}

#[test]
fn annotation_element_default_class_literal() {
    let methods = methods("@interface A { Class value() default String.class; }");
    assert!(matches!(methods[0].default_value, Some(Expr::ClassLiteral(_))));
}

#[test]
fn native_method_modifiers() {
    let methods = methods("class C { public static native synchronized void f(); }");
    let f = &methods[0];
    assert!(f.modifiers.contains(Modifiers::NATIVE));
    assert!(f.modifiers.contains(Modifiers::SYNCHRONIZED));
}

#[test]
fn final_parameter_modifier() {
    let methods = methods("class C { void f(final int x) {} }");
    assert!(methods[0].params[0].modifiers.contains(Modifiers::FINAL));
}

#[test]
fn qualified_return_type() {
    let methods = methods("class C { java.util.List<String> f() { return null; } }");
    match &methods[0].return_type {
        Some(Type::Class(ty)) => {
            assert_eq!(ty.name, "List");
            assert_eq!(ty.type_args.len(), 1);
        }
        other => panic!("expected a class type, got {:?}", other),
    }
}
