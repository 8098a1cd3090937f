//! Memory access: pointer-chain resolution and exact-count typed I/O

pub mod io;
pub mod resolver;

pub use io::{read_exact, read_value, write_exact, write_value};
pub use resolver::resolve;
