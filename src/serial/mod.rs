pub mod assembler;
pub mod port;

pub use assembler::{Assembler, Event};
pub use port::{open_port, read_chunk};
