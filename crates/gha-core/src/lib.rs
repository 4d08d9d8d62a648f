pub mod cache;
pub mod env;
pub mod error;
pub mod loader;
pub mod payload;
pub mod table;
pub mod trigger;

pub use cache::*;
pub use env::*;
pub use error::*;
pub use loader::*;
pub use payload::*;
pub use table::{
    activity_types, is_known_event, verify_activity_type, verify_event_name, EVENT_TRIGGERS,
};
