pub mod core;

pub use core::{ChatError, Message, Role, completion, list_models};
