use crate::core::ast::*;
use crate::core::types::CType;
use crate::error::DiagnosticKind;
use crate::middle::{make_ctype, make_specs_ctype};
use crate::tests::{messages, parse};

fn main_items(source: &str) -> Vec<BlockItem> {
    let (root, reporter) = parse(source);
    assert!(!reporter.has_errors(), "unexpected errors: {:?}", messages(&reporter));
    let root = root.expect("root");
    match root.items.into_iter().next() {
        Some(Item::Main(main)) => main.body.items,
        other => panic!("expected main, got {:?}", other),
    }
}

/// render the first expression statement of `int main() { body }`
fn expr_of(body: &str) -> String {
    let items = main_items(&format!("int main() {{ {} }}", body));
    for item in items {
        if let BlockItem::Stmt(Stmt::Expr(stmt)) = item {
            return stmt.expr.to_string();
        }
    }
    panic!("no expression statement in {:?}", body);
}

fn syntax_error(source: &str) -> String {
    let (root, reporter) = parse(source);
    assert!(root.is_none());
    let syntax: Vec<_> = reporter
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SyntaxError)
        .collect();
    assert_eq!(syntax.len(), 1, "expected one syntax error: {:?}", messages(&reporter));
    syntax[0].message.clone()
}

fn global_decl(source: &str) -> Declaration {
    let (root, reporter) = parse(source);
    assert!(!reporter.has_errors(), "unexpected errors: {:?}", messages(&reporter));
    match root.expect("root").items.into_iter().next() {
        Some(Item::Declaration(decl)) => decl,
        other => panic!("expected declaration, got {:?}", other),
    }
}

fn declared_type(source: &str) -> CType {
    let decl = global_decl(source);
    let (base, _) = make_specs_ctype(&decl.specifiers).expect("specifiers");
    make_ctype(&decl.declarators[0].declarator, base).expect("declarator")
}

#[test]
fn test_parse_minimal_main() {
    let items = main_items("int main() { return 15; }");
    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0], BlockItem::Stmt(Stmt::Return(_))));
}

#[test]
fn test_parse_empty_source() {
    let (root, reporter) = parse("");
    assert!(!reporter.has_errors());
    assert!(root.expect("root").items.is_empty());
}

#[test]
fn test_binary_ops_are_left_associative() {
    assert_eq!(expr_of("a + b + c;"), "((a + b) + c)");
    assert_eq!(expr_of("a - b - c;"), "((a - b) - c)");
    assert_eq!(expr_of("a / b * c;"), "((a / b) * c)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(expr_of("a = b = 10;"), "(a = (b = 10))");
}

#[test]
fn test_precedence() {
    assert_eq!(expr_of("a * b + c;"), "((a * b) + c)");
    assert_eq!(expr_of("a + b * c;"), "(a + (b * c))");
    assert_eq!(expr_of("a == b && c != d;"), "((a == b) && (c != d))");
    assert_eq!(expr_of("a || b && c;"), "(a || (b && c))");
    assert_eq!(expr_of("a & b + c;"), "(a & (b + c))");
    assert_eq!(expr_of("x = a + 1;"), "(x = (a + 1))");
}

#[test]
fn test_unary_and_postfix() {
    assert_eq!(expr_of("*p + 1;"), "((*p) + 1)");
    assert_eq!(expr_of("!a && b;"), "((!a) && b)");
    assert_eq!(expr_of("a[1] + 2;"), "(a[1] + 2)");
    assert_eq!(expr_of("&a;"), "(&a)");
}

#[test]
fn test_parens_override_precedence() {
    assert_eq!(expr_of("(a + b) * c;"), "((a + b) * c)");
}

#[test]
fn test_if_else_statement() {
    let items = main_items("int main() { if (a) return 1; else { return 2; } }");
    match &items[0] {
        BlockItem::Stmt(Stmt::If(stmt)) => {
            assert_eq!(stmt.condition.to_string(), "a");
            assert!(matches!(*stmt.then_branch, Stmt::Return(_)));
            assert!(matches!(stmt.else_branch.as_deref(), Some(Stmt::Compound(_))));
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_declarations_inside_main() {
    let items = main_items("int main() { int a = 1, *b; long c; return a; }");
    match &items[0] {
        BlockItem::Declaration(decl) => {
            assert_eq!(decl.declarators.len(), 2);
            assert!(decl.declarators[0].init.is_some());
            assert!(matches!(decl.declarators[1].declarator, Declarator::Pointer(_)));
        }
        other => panic!("expected declaration, got {:?}", other),
    }
    assert!(matches!(&items[1], BlockItem::Declaration(_)));
}

#[test]
fn test_declaration_without_declarator() {
    let decl = global_decl("int;");
    assert!(decl.declarators.is_empty());
}

#[test]
fn test_pointer_to_array_declarator() {
    let ctype = declared_type("int (*a)[3];");
    assert!(ctype.is_pointer());
    let pointee = ctype.pointee().expect("pointee");
    assert!(pointee.compatible(&CType::array_of(CType::int(), Some(3))));
}

#[test]
fn test_array_of_pointers_declarator() {
    let ctype = declared_type("int *a[3];");
    assert!(ctype.compatible(&CType::array_of(CType::pointer_to(CType::int()), Some(3))));
    assert_eq!(ctype.size(), 24);
}

#[test]
fn test_function_declarators() {
    let ctype = declared_type("int f();");
    assert!(ctype.compatible(&CType::function(None, CType::int())));

    let ctype = declared_type("int g(void);");
    assert!(ctype.compatible(&CType::function(Some(vec![]), CType::int())));

    let ctype = declared_type("long h(int a, char *b);");
    let expected = CType::function(
        Some(vec![CType::int(), CType::pointer_to(CType::char())]),
        CType::long(),
    );
    assert!(ctype.compatible(&expected));
}

#[test]
fn test_binary_array_length() {
    let ctype = declared_type("char a[0b101];");
    assert_eq!(ctype.size(), 5);
}

#[test]
fn test_error_unexpected_token() {
    assert_eq!(syntax_error("a"), "unexpected token at 'a'");
}

#[test]
fn test_error_missing_return_semicolon() {
    assert_eq!(
        syntax_error("int main() { return 15 }"),
        "expected semicolon after '15'"
    );
}

#[test]
fn test_error_missing_expression_semicolon() {
    assert_eq!(
        syntax_error("int main() { a = b }"),
        "missing semicolon or malformed expression after 'b'"
    );
}

#[test]
fn test_error_missing_close_brace() {
    assert_eq!(syntax_error("int main() { a; "), "expected '}' after ';'");
}

#[test]
fn test_error_if_without_paren() {
    assert_eq!(
        syntax_error("int main() { if a) return 1; }"),
        "expected '(' after 'if'"
    );
}

#[test]
fn test_error_if_missing_close_paren() {
    assert_eq!(
        syntax_error("int main() { if (a return 1; }"),
        "expected ')' after 'a'"
    );
}

#[test]
fn test_error_expected_expression() {
    assert_eq!(
        syntax_error("int main() { return ); }"),
        "expected expression, got ')'"
    );
}

#[test]
fn test_error_mismatched_parens_in_declaration() {
    assert_eq!(
        syntax_error("int (var;"),
        "mismatched parentheses in declaration at '('"
    );
}

#[test]
fn test_error_unsized_array() {
    assert_eq!(syntax_error("int var[];"), "faulty declaration syntax at 'var'");
}

#[test]
fn test_error_position_points_after_previous_token() {
    let (_, reporter) = parse("int main() { return 15 }");
    let diag = &reporter.diagnostics()[0];
    let pos = diag.position.expect("position");
    // right after "15"
    assert_eq!(usize::from(pos.span.start()), 22);
    assert_eq!(pos.span.start(), pos.span.end());
}

#[test]
fn test_char_constant_diagnostics() {
    let (root, reporter) = parse("int main() { return ''; }");
    assert!(root.is_some());
    assert_eq!(messages(&reporter), vec!["empty character constant".to_string()]);
    assert_eq!(reporter.diagnostics()[0].kind, DiagnosticKind::SemanticError);

    let (_, reporter) = parse("int main() { return 'ab'; }");
    assert_eq!(
        messages(&reporter),
        vec!["multiple characters in character constant".to_string()]
    );
}

#[test]
fn test_tree_printer_layout() {
    let (root, reporter) =
        parse("extern int g; int main() { int *a[3], (*b)[2]; if (g) return 1; else { g = 2; } }");
    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    let tree = TreePrinter::print(&root.expect("root"));
    let expected = "\
Root
  Declaration extern int g
  Main
    Compound
      Declaration int *a[3]
      Declaration int (*b)[2]
      If g
        Return 1
      Else
        Compound
          Expr (g = 2)
";
    assert_eq!(tree, expected);
}
