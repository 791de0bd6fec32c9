use serde::Serialize;

use super::{Product, StoreProfile};

/// A validated `POST /responder` payload.
#[derive(Debug, Clone)]
pub struct ResponderRequest {
    pub store: StoreProfile,
    pub products: Vec<Product>,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ResponderReply {
    pub resposta: String,
}
