mod common;
mod generation;
mod organization;
mod tasks;

pub use common::*;
pub use generation::*;
pub use organization::*;
pub use tasks::*;
