pub mod config;
pub mod data;
pub mod decode;
pub mod error;
pub mod labels;
pub mod locate;
pub mod poll;
pub mod provision;
pub mod rank;
pub mod schema;
pub mod sink;
pub mod storage;
pub mod topology;

pub use error::Error;
