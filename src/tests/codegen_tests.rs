use crate::backend::*;
use crate::core::il::{Command, ILCode, Literal, ValueKind};
use crate::core::types::CType;
use crate::middle::lower;
use crate::tests::{messages, parse};

fn il_for(body: &str) -> ILCode {
    let (root, mut reporter) = parse(&format!("int main() {{ {} }}", body));
    let il = lower(&root.expect("root"), &mut reporter).expect("il");
    assert!(!reporter.has_errors(), "errors: {:?}", messages(&reporter));
    il
}

fn asm_with(body: &str, kind: DialectKind, config: AllocatorConfig) -> String {
    let il = il_for(body);
    let (spots, _) = allocate(&il, &config);
    generate(&il, &spots, kind.create().as_ref()).expect("asm")
}

fn nasm(body: &str) -> String {
    asm_with(body, DialectKind::Nasm, AllocatorConfig::default())
}

fn has_line(asm: &str, line: &str) -> bool {
    asm.lines().any(|l| l.trim() == line)
}

#[test]
fn test_return_literal() {
    let asm = nasm("return 15;");
    assert!(has_line(&asm, "mov eax, 15"));
    assert!(has_line(&asm, "ret"));
    assert!(has_line(&asm, "push rbp"));
    assert!(!asm.contains("sub rsp"));
}

#[test]
fn test_negative_literal_return() {
    let asm = nasm("return -5;");
    assert!(has_line(&asm, "mov eax, 5"));
    assert!(has_line(&asm, "neg eax"));
}

#[test]
fn test_binary_literal_keeps_radix() {
    let asm = nasm("return 0b101;");
    assert!(has_line(&asm, "mov eax, 0b101"));

    let asm = asm_with("return 0b101;", DialectKind::Masm, AllocatorConfig::default());
    assert!(has_line(&asm, "mov eax, 101b"));
}

#[test]
fn test_literal_divisor_goes_through_register() {
    let asm = nasm("int a; a = 7; return a / 3;");
    assert!(has_line(&asm, "mov esi, 3"));
    assert!(has_line(&asm, "cdq"));
    assert!(has_line(&asm, "idiv esi"));
}

#[test]
fn test_literal_conditions_fold() {
    let asm = nasm("if (0) return 1; return 2;");
    assert!(has_line(&asm, "jmp __L1"));
    assert!(!asm.contains("cmp"));

    let asm = nasm("if (1) return 1; return 2;");
    assert!(!asm.contains("jmp"));
    assert!(has_line(&asm, "__L1:"));
}

#[test]
fn test_variable_condition_compares_with_zero() {
    let asm = nasm("int a; a = 3; if (a) return 1; return 2;");
    assert!(asm.lines().any(|l| l.trim().starts_with("cmp") && l.trim().ends_with(", 0")));
    assert!(has_line(&asm, "je __L1"));
}

#[test]
fn test_variables_on_stack() {
    let config = AllocatorConfig {
        variables_on_stack: true,
    };
    let asm = asm_with("int a; a = 4; return a;", DialectKind::Nasm, config);
    assert!(has_line(&asm, "sub rsp, 16"));
    assert!(has_line(&asm, "mov DWORD [rbp-4], 4"));
    assert!(has_line(&asm, "mov eax, DWORD [rbp-4]"));

    let asm = asm_with("int a; a = 4; return a;", DialectKind::Masm, config);
    assert!(has_line(&asm, "mov DWORD PTR [rbp-4], 4"));
}

#[test]
fn test_overlapping_values_spill() {
    let mut il = ILCode::new();
    let locals: Vec<_> = (0..7)
        .map(|i| il.register_local(&format!("v{}", i), CType::int()))
        .collect();
    for (i, local) in locals.iter().enumerate() {
        let lit = il.new_literal(CType::int(), Literal::new(i as i64));
        il.add(Command::Set {
            output: local.id,
            arg: lit.id,
        });
    }
    for local in &locals {
        il.add(Command::Return { arg: local.id });
    }

    let (spots, stats) = allocate(&il, &AllocatorConfig::default());
    assert_eq!(stats.in_registers, ALLOCATABLE.len());
    assert_eq!(stats.spilled, 1);
    assert_eq!(stats.literals, 7);
    assert!(spots.get(locals[6].id).map_or(false, Spot::is_memory));
    for local in &locals[..6] {
        assert!(matches!(spots.get(local.id), Some(Spot::Register(_))));
    }
    assert_eq!(spots.frame_size(), 16);
}

#[test]
fn test_registers_are_reused_after_last_use() {
    let mut il = ILCode::new();
    for i in 0..10 {
        let local = il.register_local(&format!("v{}", i), CType::long());
        let lit = il.new_literal(CType::long(), Literal::new(i));
        il.add(Command::Set {
            output: local.id,
            arg: lit.id,
        });
        il.add(Command::Return { arg: local.id });
    }
    let (_, stats) = allocate(&il, &AllocatorConfig::default());
    assert_eq!(stats.in_registers, 10);
    assert_eq!(stats.spilled, 0);
}

#[test]
fn test_address_taken_local_lives_in_memory() {
    let il = il_for("int a; int *p; p = &a; *p = 3; return a;");
    let (spots, _) = allocate(&il, &AllocatorConfig::default());
    let (a, _) = il
        .values()
        .find(|(_, info)| matches!(&info.kind, ValueKind::Local(name) if name == "a"))
        .expect("local a");
    assert!(spots.get(a).map_or(false, Spot::is_memory));

    let asm = generate(&il, &spots, &Nasm).expect("asm");
    assert!(has_line(&asm, "lea r11, [rbp-4]"));
    assert!(asm.lines().any(|l| l.trim() == "mov DWORD [r11], eax"));
}

#[test]
fn test_one_byte_multiplication_is_unsupported() {
    let mut il = ILCode::new();
    let a = il.register_local("a", CType::char());
    let b = il.register_local("b", CType::char());
    let out = il.new_value(CType::char());
    il.add(Command::Mult {
        output: out.id,
        left: a.id,
        right: b.id,
    });
    let (spots, _) = allocate(&il, &AllocatorConfig::default());
    let err = generate(&il, &spots, &Nasm).unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedCombination { .. }));
    assert_eq!(err.to_string(), "cannot encode Mult: 1 byte multiplication");
}

#[test]
fn test_widening_set() {
    let asm = nasm("int a; long l; a = 3; l = a; return 0;");
    assert!(asm.lines().any(|l| l.trim().starts_with("movsxd rax,")));

    let asm = nasm("char c; int a; c = 3; a = c; return a;");
    assert!(asm.lines().any(|l| l.trim().starts_with("movsx eax,")));
}

/// no x86 mov takes two memory operands
fn has_mem_to_mem(asm: &str) -> bool {
    asm.lines()
        .any(|l| l.trim().starts_with("mov") && l.matches('[').count() > 1)
}

#[test]
fn test_stack_to_stack_set_uses_scratch() {
    let config = AllocatorConfig {
        variables_on_stack: true,
    };
    let asm = asm_with("int a; int b; a = 3; b = a; return b;", DialectKind::Nasm, config);
    let lines: Vec<&str> = asm.lines().map(str::trim).collect();
    let load = lines
        .iter()
        .position(|l| *l == "mov eax, DWORD [rbp-4]")
        .expect("load a");
    assert_eq!(lines[load + 1], "mov DWORD [rbp-8], eax");
    assert!(!has_line(&asm, "mov DWORD [rbp-8], DWORD [rbp-4]"));
    assert!(!has_mem_to_mem(&asm));

    // narrowing reads the low byte in place
    let asm = asm_with("int a; char c; a = 300; c = a; return c;", DialectKind::Nasm, config);
    assert!(has_line(&asm, "mov al, BYTE [rbp-4]"));
    assert!(has_line(&asm, "mov BYTE [rbp-5], al"));
    assert!(!has_mem_to_mem(&asm));
}

#[test]
fn test_large_immediate_uses_rax() {
    let config = AllocatorConfig {
        variables_on_stack: true,
    };
    let asm = asm_with("long l; l = 4294967296; return 0;", DialectKind::Nasm, config);
    assert!(has_line(&asm, "mov rax, 4294967296"));
    assert!(has_line(&asm, "mov QWORD [rbp-8], rax"));
}

#[test]
fn test_dialect_kind_creates_matching_dialect() {
    assert_eq!(DialectKind::Nasm.create().kind(), DialectKind::Nasm);
    assert_eq!(DialectKind::Masm.create().kind(), DialectKind::Masm);
}

#[test]
fn test_dialect_operands() {
    let stack = Spot::stack(-12);
    assert_eq!(Nasm.operand(&stack, 8).expect("op"), "QWORD [rbp-12]");
    assert_eq!(Masm.operand(&stack, 1).expect("op"), "BYTE PTR [rbp-12]");
    assert_eq!(Nasm.operand(&Spot::Register(Reg::R8), 2).expect("op"), "r8w");
    assert!(Nasm.operand(&stack, 3).is_err());
    assert_eq!(Nasm.literal(&Literal::binary(-6)), "-0b110");
    assert_eq!(Masm.literal(&Literal::binary(6)), "110b");
}

#[test]
fn test_nasm_preamble() {
    let asm = nasm("return 0;");
    let lines: Vec<&str> = asm.lines().collect();
    assert_eq!(lines[0], "global _start");
    assert!(has_line(&asm, "section .text"));
    assert!(has_line(&asm, "_start:"));
    assert!(has_line(&asm, "call main"));
    assert!(has_line(&asm, "mov rax, 60"));
    assert!(has_line(&asm, "syscall"));
    assert!(has_line(&asm, "main:"));
    assert!(!asm.contains("section .data"));
}

#[test]
fn test_masm_preamble() {
    let asm = asm_with("return 0;", DialectKind::Masm, AllocatorConfig::default());
    let lines: Vec<&str> = asm.lines().collect();
    assert_eq!(lines[0], "EXTERN ExitProcess:PROC");
    assert!(has_line(&asm, ".code"));
    assert!(has_line(&asm, "_start PROC"));
    assert!(has_line(&asm, "call ExitProcess"));
    assert!(has_line(&asm, "main PROC"));
    assert!(has_line(&asm, "main ENDP"));
    assert_eq!(lines.last().copied(), Some("END"));
}

#[test]
fn test_externs_and_strings_in_preamble() {
    let body = "char *s; s = \"ok\"; return counter;";
    let (root, mut reporter) = parse(&format!("extern int counter; int main() {{ {} }}", body));
    let il = lower(&root.expect("root"), &mut reporter).expect("il");
    let (spots, _) = allocate(&il, &AllocatorConfig::default());

    let asm = generate(&il, &spots, &Nasm).expect("asm");
    assert!(has_line(&asm, "extern counter"));
    assert!(has_line(&asm, "section .data"));
    assert!(has_line(&asm, "__strlit0: db 111, 107, 0"));
    assert!(has_line(&asm, "mov eax, DWORD [counter]"));

    let asm = generate(&il, &spots, &Masm).expect("asm");
    assert!(has_line(&asm, "EXTERN counter:BYTE"));
    assert!(has_line(&asm, "__strlit0 BYTE 111, 107, 0"));
}

#[test]
fn test_asm_code_layout() {
    let mut code = AsmCode::new();
    code.add_label("__L3");
    code.add_command("mov", &["eax", "1"]);
    code.add_command("ret", &[]);
    assert_eq!(code.lines(), vec!["__L3:", "     mov eax, 1", "     ret"]);
}
