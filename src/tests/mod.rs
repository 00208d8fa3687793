mod codegen_tests;
mod il_tests;
mod lexer_tests;
mod parser_tests;

use crate::core::ast::Root;
use crate::error::Reporter;
use crate::frontend::lexer::token::Token;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;

/// lex a snippet under the name `test.c`
pub(crate) fn lex(source: &str) -> (Vec<Token>, Reporter) {
    let mut reporter = Reporter::new();
    let file_id = reporter.add_file("test.c".to_string(), source.to_string());
    let tokens = Lexer::new(source, file_id, &mut reporter).tokenize();
    (tokens, reporter)
}

pub(crate) fn parse(source: &str) -> (Option<Root>, Reporter) {
    let (tokens, mut reporter) = lex(source);
    let root = Parser::new(tokens, &mut reporter).parse();
    (root, reporter)
}

pub(crate) fn messages(reporter: &Reporter) -> Vec<String> {
    reporter
        .diagnostics()
        .iter()
        .map(|d| d.message.clone())
        .collect()
}
