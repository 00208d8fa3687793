pub mod backend;
pub mod cli;
pub mod core;
pub mod error;
pub mod frontend;
pub mod middle;

#[cfg(test)]
mod tests;
