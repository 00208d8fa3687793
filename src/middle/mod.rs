pub mod cast;
pub mod error;
pub mod lower;
pub mod lower_decl;
pub mod lower_expr;
pub mod lvalue;

pub use cast::{check_cast, set_type};
pub use error::{LResult, LowerError};
pub use lower::{lower, IlLowerer};
pub use lower_decl::{make_ctype, make_specs_ctype, StorageClass};
pub use lower_expr::parse_int_literal;
pub use lvalue::LValue;
