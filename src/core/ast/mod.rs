pub mod decl;
pub mod expr;
pub mod item;
pub mod printer;
pub mod stmt;
pub mod visitor;

pub use decl::*;
pub use expr::*;
pub use item::*;
pub use printer::TreePrinter;
pub use stmt::*;
pub use visitor::*;
