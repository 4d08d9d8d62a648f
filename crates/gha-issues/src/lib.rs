pub mod client;
pub mod command;
pub mod error;
pub mod queries;
pub mod template;
pub mod types;

pub use client::*;
pub use command::*;
pub use error::*;
pub use queries::*;
pub use template::*;
pub use types::*;
