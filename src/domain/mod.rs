pub mod commands;
pub mod message;
pub mod session;
pub mod social;
pub mod user;
