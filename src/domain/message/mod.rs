pub mod entity;

pub use self::entity::{Message, MessageWithAuthor, MAX_MESSAGE_LEN, MESSAGE_PAGE_LIMIT};
