pub mod error;
pub mod expr;
pub mod parser;
pub mod precedence;

pub use error::{MessageType, ParserError};
pub use expr::ExpressionParser;
pub use parser::{PResult, Parser};
