//! Output root adapters.

mod local;
mod memory;

pub use local::{LocalRoot, LocalRootOpener};
pub use memory::{MemoryRoot, MemoryRootOpener};
