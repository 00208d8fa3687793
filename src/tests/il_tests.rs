use crate::core::il::*;
use crate::core::types::CType;
use crate::error::{DiagnosticKind, Reporter, Severity};
use crate::middle::{lower, parse_int_literal, LowerError};
use crate::tests::{messages, parse};

fn lower_source(source: &str) -> (Result<ILCode, LowerError>, Reporter) {
    let (root, mut reporter) = parse(source);
    assert!(!reporter.has_errors(), "parse errors: {:?}", messages(&reporter));
    let result = lower(&root.expect("root"), &mut reporter);
    (result, reporter)
}

/// lower a main body that must produce no errors
fn lower_ok(body: &str) -> (ILCode, Reporter) {
    let (result, reporter) = lower_source(&format!("int main() {{ {} }}", body));
    assert!(!reporter.has_errors(), "lowering errors: {:?}", messages(&reporter));
    (result.expect("il"), reporter)
}

fn lower_errors(body: &str) -> Vec<String> {
    let (result, reporter) = lower_source(&format!("int main() {{ {} }}", body));
    assert!(result.is_ok());
    reporter
        .diagnostics()
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.message.clone())
        .collect()
}

fn count(il: &ILCode, name: &str) -> usize {
    il.commands.iter().filter(|c| c.name() == name).count()
}

#[test]
fn test_return_literal_and_implicit_return() {
    let (il, _) = lower_ok("return 15;");
    assert_eq!(il.commands.len(), 2);
    match (&il.commands[0], &il.commands[1]) {
        (Command::Return { arg: first }, Command::Return { arg: last }) => {
            assert_eq!(il.literal(*first), Some(Literal::new(15)));
            assert_eq!(il.literal(*last).map(|l| l.value), Some(0));
        }
        other => panic!("unexpected commands {:?}", other),
    }
}

#[test]
fn test_dead_code_is_still_lowered() {
    let (il, _) = lower_ok("return 15; return 20;");
    assert_eq!(count(&il, "Return"), 3);
}

#[test]
fn test_numeric_literal_types() {
    let (il, _) = lower_ok("long a; a = 2147483648; return 2147483647;");
    let literal_types: Vec<(i64, CType)> = il
        .values()
        .filter_map(|(_, info)| match info.kind {
            ValueKind::Literal(lit) => Some((lit.value, info.ctype.clone())),
            _ => None,
        })
        .collect();
    assert!(literal_types.contains(&(2147483648, CType::long())));
    assert!(literal_types.contains(&(2147483647, CType::int())));
}

#[test]
fn test_literal_too_large() {
    let errors = lower_errors("return 99999999999999999999;");
    assert_eq!(
        errors,
        vec!["integer literal too large to be represented by any integer type".to_string()]
    );
}

#[test]
fn test_parse_int_literal_forms() {
    assert_eq!(parse_int_literal("42"), Some((42, false)));
    assert_eq!(parse_int_literal("-7"), Some((-7, false)));
    assert_eq!(parse_int_literal("0b101"), Some((5, true)));
    assert_eq!(parse_int_literal("110B"), Some((6, true)));
    assert_eq!(parse_int_literal("-0b11"), Some((-3, true)));
    assert_eq!(parse_int_literal("12x"), None);
}

#[test]
fn test_undeclared_identifier_is_error_not_crash() {
    let (result, reporter) = lower_source("int main() { if(a) return 10; return 5; }");
    assert!(result.is_ok());
    let diag = reporter
        .diagnostics()
        .iter()
        .find(|d| d.is_error())
        .expect("an error");
    assert_eq!(diag.message, "use of undeclared identifier 'a'");
    assert_eq!(diag.kind, DiagnosticKind::NameResolutionError);
}

#[test]
fn test_errors_are_collected_per_statement() {
    let errors = lower_errors("x = 1; y = 2; return 0;");
    assert_eq!(
        errors,
        vec![
            "use of undeclared identifier 'x'".to_string(),
            "use of undeclared identifier 'y'".to_string(),
        ]
    );
}

#[test]
fn test_conflicting_base_types() {
    assert_eq!(
        lower_errors("int char x;"),
        vec!["two or more data types in declaration specifiers".to_string()]
    );
}

#[test]
fn test_specifier_errors() {
    assert_eq!(
        lower_errors("signed unsigned int x;"),
        vec!["both signed and unsigned in declaration specifiers".to_string()]
    );
    assert_eq!(
        lower_errors("unsigned _Bool x;"),
        vec!["'unsigned' used with a non integer type".to_string()]
    );
    assert_eq!(
        lower_errors("extern auto int x;"),
        vec!["two or more storage classes in declaration specifiers".to_string()]
    );
}

#[test]
fn test_declaration_errors() {
    assert_eq!(
        lower_errors("void v;"),
        vec!["variable of void type declared".to_string()]
    );
    assert_eq!(
        lower_errors("int a; int a;"),
        vec!["redefinition of 'a'".to_string()]
    );
    assert_eq!(
        lower_errors("extern int e = 1;"),
        vec!["extern variable has initializer".to_string()]
    );
    assert_eq!(
        lower_errors("int a[2] = 0;"),
        vec!["declared variable is not of assignable type".to_string()]
    );
}

#[test]
fn test_inner_scope_may_shadow() {
    let (il, _) = lower_ok("int a; a = 1; { int a; a = 2; } return a;");
    let locals = il
        .values()
        .filter(|(_, info)| matches!(&info.kind, ValueKind::Local(name) if name == "a"))
        .count();
    assert_eq!(locals, 2);
}

#[test]
fn test_scope_ends_with_compound() {
    let errors = lower_errors("{ int inner; } return inner;");
    assert_eq!(errors, vec!["use of undeclared identifier 'inner'".to_string()]);
}

#[test]
fn test_static_is_unsupported() {
    let (result, _) = lower_source("int main() { static int s; return 0; }");
    match result {
        Err(err @ LowerError::Unsupported { .. }) => {
            assert_eq!(err.to_string(), "static variables are not yet supported");
            assert_eq!(err.to_diagnostic().kind, DiagnosticKind::UnsupportedFeature);
        }
        other => panic!("expected unsupported, got {:?}", other.map(|il| il.commands.len())),
    }
}

#[test]
fn test_non_extern_global_is_unsupported() {
    let (result, _) = lower_source("int g; int main() { return 0; }");
    assert!(matches!(
        result,
        Err(LowerError::Unsupported { ref feature, .. }) if feature == "non-extern global variables"
    ));
}

#[test]
fn test_extern_and_function_declarations_register_symbols() {
    let (result, reporter) =
        lower_source("extern int counter; int helper(void); int main() { return counter; }");
    assert!(!reporter.has_errors());
    let il = result.expect("il");
    assert_eq!(il.extern_names(), vec!["counter", "helper"]);
}

#[test]
fn test_pointer_addition_scales_by_pointee_size() {
    let (il, _) = lower_ok("int a[3]; int *p; p = a + 1; return 0;");
    let scale = il.commands.iter().find_map(|c| match c {
        Command::Mult { right, .. } => il.literal(*right),
        _ => None,
    });
    assert_eq!(scale.map(|l| l.value), Some(4));
    assert_eq!(count(&il, "AddrOf"), 1);
}

#[test]
fn test_pointer_difference_divides_by_size() {
    let (il, _) = lower_ok("long *p; long *q; long d; d = p - q; return 0;");
    let divisor = il.commands.iter().find_map(|c| match c {
        Command::Div { right, .. } => il.literal(*right),
        _ => None,
    });
    assert_eq!(divisor.map(|l| l.value), Some(8));
}

#[test]
fn test_arithmetic_promotes_operands() {
    let (il, _) = lower_ok("char c; long l; l = c + l; return 0;");
    let add_type = il.commands.iter().find_map(|c| match c {
        Command::Add { output, .. } => il.ctype(*output).cloned(),
        _ => None,
    });
    assert_eq!(add_type, Some(CType::long()));
}

#[test]
fn test_short_circuit_uses_branches() {
    let (il, _) = lower_ok("int a; int b; int c; c = a && b; return c;");
    assert!(count(&il, "JumpZero") >= 2);
    assert!(count(&il, "Label") >= 1);
}

#[test]
fn test_if_else_labels_are_unique() {
    let (il, _) = lower_ok("int a; if (a) a = 1; else a = 2; if (a) a = 3; return a;");
    let labels: Vec<LabelId> = il
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::Label { label } => Some(*label),
            _ => None,
        })
        .collect();
    let mut unique = labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(labels.len(), unique.len());
    assert!(labels.len() >= 3);
}

#[test]
fn test_pointer_comparison_warnings() {
    let (_, reporter) = lower_ok("int *p; long *q; int r; r = p == q; return 0;");
    let warnings: Vec<_> = reporter
        .diagnostics()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message.clone())
        .collect();
    assert_eq!(warnings, vec!["comparison between distinct pointer types".to_string()]);

    let (_, reporter) = lower_ok("int *p; int r; r = p != 5; return 0;");
    assert_eq!(
        messages(&reporter),
        vec!["comparison between incomparable types".to_string()]
    );

    let (_, reporter) = lower_ok("int *p; int r; r = p == 0; return 0;");
    assert!(reporter.diagnostics().is_empty());
}

#[test]
fn test_incompatible_pointer_assignment_warns() {
    let (_, reporter) = lower_ok("int *p; long *q; p = q; return 0;");
    assert_eq!(
        messages(&reporter),
        vec!["conversion from incompatible pointer type".to_string()]
    );
}

#[test]
fn test_invalid_assignments() {
    assert_eq!(
        lower_errors("int *p; int a; a = p; return 0;"),
        vec!["invalid conversion between types".to_string()]
    );
    assert_eq!(
        lower_errors("const int k = 1; k = 2; return k;"),
        vec!["expression on left of '=' is not assignable".to_string()]
    );
    assert_eq!(
        lower_errors("int a; 5 = a; return a;"),
        vec!["expression on left of '=' is not assignable".to_string()]
    );
}

#[test]
fn test_deref_and_address() {
    let (il, _) = lower_ok("int a; int *p; p = &a; *p = 3; return *p;");
    assert_eq!(count(&il, "AddrOf"), 1);
    assert_eq!(count(&il, "SetAt"), 1);
    assert_eq!(count(&il, "ReadAt"), 1);
    assert_eq!(
        lower_errors("int a; return *a;"),
        vec!["operand of unary '*' must have pointer type".to_string()]
    );
    assert_eq!(
        lower_errors("int a; int *p; p = &5; return 0;"),
        vec!["lvalue required as unary '&' operand".to_string()]
    );
}

#[test]
fn test_increment_steps() {
    let (il, _) = lower_ok("int *p; p++; return 0;");
    let step = il.commands.iter().find_map(|c| match c {
        Command::Add { right, .. } => il.literal(*right),
        _ => None,
    });
    assert_eq!(step.map(|l| l.value), Some(4));

    assert_eq!(
        lower_errors("++5; return 0;"),
        vec!["operand of increment operator not a modifiable lvalue".to_string()]
    );
}

#[test]
fn test_string_literal_registered_once() {
    let (il, _) = lower_ok("char *s; s = \"hi\"; return 0;");
    assert_eq!(il.string_literals().len(), 1);
    assert_eq!(il.string_literals()[0].1, b"hi\0".to_vec());
}

#[test]
fn test_il_display() {
    let (il, _) = lower_ok("int a; a = 3; return a;");
    let text = il.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("    a."));
    assert!(lines[0].ends_with(" = 3"));
    assert!(lines[1].starts_with("    return a."));
}

#[test]
fn test_symbol_table_scopes() {
    let mut il = ILCode::new();
    let mut symbols = SymbolTable::new();
    let outer = il.register_local("x", CType::int());
    symbols.add("x", outer.clone()).expect("first add");
    assert!(symbols.add("x", outer.clone()).is_err());
    {
        let mut guard = ScopeGuard::enter(&mut symbols);
        let inner = il.register_local("x", CType::long());
        guard.add("x", inner.clone()).expect("shadow");
        assert_eq!(guard.lookup("x").map(|v| v.id), Some(inner.id));
    }
    assert_eq!(symbols.lookup("x").map(|v| v.id), Some(outer.id));
}

#[test]
fn test_labels_are_monotonic() {
    let mut il = ILCode::new();
    let a = il.get_label();
    let b = il.get_label();
    assert!(b > a);
    assert_eq!(a.to_string(), "__L1");
}
