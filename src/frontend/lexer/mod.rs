pub mod lexer;
pub mod token;

pub use lexer::{split_lines, Lexer, SourceLine};
pub use token::{Token, TokenKind};
