//! Domain entities

mod message;
mod user;

pub use message::{is_blank, Message, MessageKind};
pub use user::User;
