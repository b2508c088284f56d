pub use args::Args;
pub use sink::Sink;
pub use text::{line, Text};
pub use json::Json;

mod args;
mod json;
mod sink;
mod text;
