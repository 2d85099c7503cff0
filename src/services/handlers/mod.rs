//! Operations behind the routes. Each public function runs in exactly one
//! transaction and leaves the store untouched when it fails.

mod message;
mod session;
mod social;
mod user;

pub use self::{message::MessageHandler, session::SessionHandler, social::SocialHandler, user::UserHandler};
