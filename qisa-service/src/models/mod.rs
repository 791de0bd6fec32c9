pub mod request;
pub mod store;

pub use request::{ResponderReply, ResponderRequest};
pub use store::{Product, SocialLinks, StoreProfile};
