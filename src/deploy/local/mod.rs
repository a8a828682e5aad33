//! Upload targets that never leave the machine.

pub mod dir;
pub mod memory;
