pub extern crate serde;
pub extern crate serde_json;
pub extern crate uuid;

mod message;
mod session_state;

pub use message::*;
pub use session_state::*;
