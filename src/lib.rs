pub mod isr;
pub mod config;
pub mod trace;
pub mod error;
pub use error::*;

pub use derive_new;
