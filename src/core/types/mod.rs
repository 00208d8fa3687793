pub mod composite;
pub mod conversion;
pub mod primitive;
pub mod ty;

pub use composite::*;
pub use conversion::*;
pub use primitive::*;
pub use ty::*;
