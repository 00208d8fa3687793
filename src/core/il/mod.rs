pub mod code;
pub mod command;
pub mod symbol_table;
pub mod value;

pub use code::{ILCode, ValueInfo};
pub use command::{Command, LabelId};
pub use symbol_table::{ScopeGuard, Scoped, SymbolTable};
pub use value::{ILValue, Literal, Radix, ValueId, ValueKind};
