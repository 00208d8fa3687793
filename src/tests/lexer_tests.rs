use crate::error::DiagnosticKind;
use crate::frontend::lexer::token::TokenKind;
use crate::frontend::lexer::{split_lines, Lexer};
use crate::error::Reporter;
use crate::tests::{lex, messages};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).0.iter().map(|t| t.kind).collect()
}

#[test]
fn test_lexer_keywords_and_identifiers() {
    let (tokens, reporter) = lex("int main unsigned _Bool extern x_1");
    assert!(!reporter.has_errors());
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Unsigned,
            TokenKind::Bool,
            TokenKind::Extern,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(tokens[1].content, "main");
    assert_eq!(tokens[5].content, "x_1");
}

#[test]
fn test_lexer_two_char_symbols_win() {
    assert_eq!(
        kinds("a && b || c == d != e ++ --"),
        vec![
            TokenKind::Identifier,
            TokenKind::AmpAmp,
            TokenKind::Identifier,
            TokenKind::PipePipe,
            TokenKind::Identifier,
            TokenKind::EqualEqual,
            TokenKind::Identifier,
            TokenKind::BangEqual,
            TokenKind::Identifier,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
        ]
    );
    assert_eq!(kinds("&x"), vec![TokenKind::Amp, TokenKind::Identifier]);
}

#[test]
fn test_lexer_numbers() {
    let (tokens, _) = lex("42 0b101 110b 0");
    let contents: Vec<_> = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["42", "0b101", "110b", "0"]);
    assert!(tokens.iter().all(|t| t.is(TokenKind::Number)));
}

#[test]
fn test_lexer_negative_literal_only_in_operand_position() {
    let (tokens, _) = lex("return -5;");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].content, "-5");

    // after an operand the minus is subtraction
    assert_eq!(
        kinds("a-5"),
        vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::Number]
    );
    assert_eq!(
        kinds("(a)-1"),
        vec![
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Minus,
            TokenKind::Number,
        ]
    );
}

#[test]
fn test_lexer_quoted_literals_are_unescaped() {
    let (tokens, reporter) = lex(r#"'a' '\n' "hi\tthere""#);
    assert!(!reporter.has_errors());
    assert_eq!(tokens[0].kind, TokenKind::CharConstant);
    assert_eq!(tokens[0].content, "a");
    assert_eq!(tokens[1].content, "\n");
    assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[2].content, "hi\tthere");
}

#[test]
fn test_lexer_comments_are_skipped() {
    let source = "int a; // trailing\n/* block\n still block */ int b;";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_lexer_errors_keep_going() {
    let (tokens, reporter) = lex("int $ a; 'x");
    let msgs = messages(&reporter);
    assert!(msgs.contains(&"unrecognized token at '$'".to_string()));
    assert!(msgs.contains(&"missing terminating quote".to_string()));
    assert!(reporter
        .diagnostics()
        .iter()
        .all(|d| d.kind == DiagnosticKind::LexicalError));
    // tokens after the bad character are still produced
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_lexer_unterminated_comment() {
    let (_, reporter) = lex("int a; /* never closed\nint b;");
    assert_eq!(messages(&reporter), vec!["unterminated comment".to_string()]);
}

#[test]
fn test_lexer_positions_track_lines() {
    let (tokens, _) = lex("int a;\n  return a;");
    let ret = &tokens[3];
    assert_eq!(ret.kind, TokenKind::Return);
    assert_eq!(ret.position.line, 2);
    assert_eq!(usize::from(ret.position.span.start()), 9);
}

#[test]
fn test_lexer_from_lines() {
    let mut reporter = Reporter::new();
    let file_id = reporter.add_file("lines.c".to_string(), "int x;\nx = 1;".to_string());
    let lines = split_lines("int x;\nx = 1;", file_id);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].offset, 7);
    let tokens = Lexer::from_lines(lines, &mut reporter).tokenize();
    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[3].position.line, 2);
}
