//! Request handlers, one module per route family.

pub mod mole;
pub mod util;
