pub mod core;
pub mod models;

pub use core::Controller;
pub use models::{Phase, Session, Transcript};
