pub mod allocator;
pub mod asm;
pub mod dialect;
pub mod emit;
pub mod error;
pub mod register;
pub mod spot;

pub use allocator::{allocate, AllocationStats, AllocatorConfig, SpotMap};
pub use asm::{AsmCode, AsmLine};
pub use dialect::{Dialect, DialectKind, Masm, Nasm, Program};
pub use emit::{generate, Emitter};
pub use error::CodegenError;
pub use register::{Reg, ALLOCATABLE, SCRATCH};
pub use spot::{MemBase, Spot};
