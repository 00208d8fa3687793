pub mod ast;
pub mod il;
pub mod types;
