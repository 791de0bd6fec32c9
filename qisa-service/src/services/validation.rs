//! Request payload validation for `POST /responder`.
//!
//! Validation runs in three passes: a structural check on the raw JSON
//! (the three top-level keys), typed conversion of `loja` and `produtos`,
//! then the field constraints declared on the models.

use serde_json::Value;
use validator::Validate;

use crate::error::ValidationError;
use crate::models::{Product, ResponderRequest, StoreProfile};

pub fn validate_payload(body: &Value) -> Result<ResponderRequest, ValidationError> {
    let store = body.get("loja").filter(|v| v.is_object());
    let question = body
        .get("pergunta")
        .and_then(Value::as_str)
        .filter(|q| !q.trim().is_empty());
    let products = body.get("produtos").filter(|v| v.is_array());

    let (Some(store), Some(question), Some(products)) = (store, question, products) else {
        let mut missing = Vec::new();
        if store.is_none() {
            missing.push("loja");
        }
        if products.is_none() {
            missing.push("produtos");
        }
        if question.is_none() {
            missing.push("pergunta");
        }
        return Err(ValidationError::MissingFields(missing));
    };

    let store: StoreProfile = serde_json::from_value(store.clone())
        .map_err(|e| ValidationError::InvalidStore(e.to_string()))?;
    let products: Vec<Product> = serde_json::from_value(products.clone())
        .map_err(|e| ValidationError::InvalidProducts(e.to_string()))?;

    store
        .validate()
        .map_err(|e| ValidationError::Constraint {
            field: "loja".to_string(),
            detail: e.to_string(),
        })?;

    for (index, product) in products.iter().enumerate() {
        product
            .validate()
            .map_err(|e| ValidationError::Constraint {
                field: format!("produtos[{}]", index),
                detail: e.to_string(),
            })?;
    }

    Ok(ResponderRequest {
        store,
        products,
        question: question.to_string(),
    })
}
