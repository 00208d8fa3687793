pub mod args;
pub mod compiler;
pub mod error_display;
pub mod output;
pub mod progress;
pub mod toolchain;

pub use args::*;
pub use compiler::*;
pub use error_display::*;
pub use output::*;
pub use progress::*;
pub use toolchain::*;
