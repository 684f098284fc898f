use jhp::ast::{Expr, Literal, LiteralExpr, Member, Type};
use jhp::parser::parse;

#[test]
fn package_annotations() {
    let unit = parse("@Generated package a.b;").expect("failed to parse");
    let package = unit.package.unwrap();
    assert_eq!(package.annotations.len(), 1);
    assert_eq!(package.annotations[0].name, vec!["Generated"]);
}

#[test]
fn marker_annotation() {
    let unit = parse("@Deprecated class C {}").expect("failed to parse");
    let decl = &unit.type_decls[0];
    assert_eq!(decl.annotations.len(), 1);
    assert!(decl.annotations[0].args.is_empty());
}

#[test]
fn qualified_annotation_name() {
    let unit = parse("@javax.annotation.Nullable class C {}").expect("failed to parse");
    assert_eq!(
        unit.type_decls[0].annotations[0].name,
        vec!["javax", "annotation", "Nullable"]
    );
}

#[test]
fn single_value_argument() {
    let unit = parse("@SuppressWarnings(\"unchecked\") class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    assert_eq!(annotation.args.len(), 1);
    assert!(matches!(
        annotation.args[0],
        Expr::Literal(LiteralExpr { value: Literal::String(_), .. })
    ));
}

#[test]
fn named_arguments() {
    let unit =
        parse("@Target(value = 1, other = \"s\") class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    assert_eq!(annotation.args.len(), 2);
    match &annotation.args[0] {
        Expr::Assign(assign) => assert_eq!(assign.name, "value"),
        other => panic!("expected a named argument, got {:?}", other),
    }
}

#[test]
fn array_argument() {
    let unit = parse("@Target({1, 2, 3}) class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    assert!(matches!(annotation.args[0], Expr::ArrayInit(_)));
}

#[test]
fn nested_annotation_argument() {
    let unit = parse("@Outer(@Inner(1)) class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    match &annotation.args[0] {
        Expr::Annotation(inner) => assert_eq!(inner.name, vec!["Inner"]),
        other => panic!("expected a nested annotation, got {:?}", other),
    }
}

#[test]
fn annotation_array_of_annotations() {
    let unit = parse("@Outer({@A, @B}) class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    match &annotation.args[0] {
        Expr::ArrayInit(init) => {
            assert_eq!(init.elements.len(), 2);
            assert!(matches!(init.elements[0], Expr::Annotation(_)));
        }
        other => panic!("expected an array initializer, got {:?}", other),
    }
}

#[test]
fn member_annotations() {
    let unit = parse("class C { @Deprecated int f; @Override void m() {} }")
        .expect("failed to parse");
    let decl = &unit.type_decls[0];
    match &decl.members[0] {
        Member::Field(field) => assert_eq!(field.annotations.len(), 1),
        other => panic!("expected a field, got {:?}", other),
    }
    match &decl.members[1] {
        Member::Method(method) => assert_eq!(method.annotations.len(), 1),
        other => panic!("expected a method, got {:?}", other),
    }
}

#[test]
fn type_annotation_in_type_arguments() {
    let unit = parse("class C { List<@NonNull String> xs; }").expect("failed to parse");
    match &unit.type_decls[0].members[0] {
        Member::Field(field) => match &field.ty {
            Type::Class(list) => match &list.type_args[0] {
                Type::Class(arg) => {
                    assert_eq!(arg.annotations.len(), 1);
                    assert_eq!(arg.annotations[0].name, vec!["NonNull"]);
                }
                other => panic!("expected a class type, got {:?}", other),
            },
            other => panic!("expected a class type, got {:?}", other),
        },
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn parameter_annotations() {
    let unit = parse("class C { void m(@Nullable String s) {} }").expect("failed to parse");
    match &unit.type_decls[0].members[0] {
        Member::Method(method) => {
            assert_eq!(method.params[0].annotations.len(), 1);
        }
        other => panic!("expected a method, got {:?}", other),
    }
}

#[test]
fn type_parameter_annotations() {
    let unit = parse("class C<@Tainted T> {}").expect("failed to parse");
    assert_eq!(unit.type_decls[0].type_params[0].annotations.len(), 1);
}

#[test]
fn wildcard_bound_annotations() {
    let unit = parse("class C { List<? extends @ReadOnly Object> xs; }")
        .expect("failed to parse");
    assert_eq!(unit.type_decls[0].members.len(), 1);
}

#[test]
fn negative_constant_argument() {
    let unit = parse("@Limit(-1) class C {}").expect("failed to parse");
    let annotation = &unit.type_decls[0].annotations[0];
    assert!(matches!(annotation.args[0], Expr::Unary(_)));
}
