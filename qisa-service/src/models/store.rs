//! Store profile and product catalogue as sent by the store front-end.
//!
//! Field names follow the front-end's JSON (Portuguese, camelCase). Every
//! text field except `telefone` is optional; the prompt builder renders
//! placeholders for whatever is missing. Store fields are read leniently:
//! numbers and booleans become text, and a lone string stands in for a list.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfile {
    #[serde(default, deserialize_with = "lenient_text")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cnpj: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub descricao: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub endereco: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bairro: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cep: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ponto_referencia: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub google_maps: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub dias_funcionamento: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horario_abertura: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub horario_fechamento: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub fecha_feriados: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub observacoes: Option<String>,

    #[serde(default, deserialize_with = "required_text")]
    #[validate(custom(function = "non_blank"))]
    pub telefone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_social_links")]
    pub redes_sociais: Option<SocialLinks>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub site: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub tipos_atendimento: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub metodos_pagamento: Vec<String>,
}

/// Social links arrive either as one free-text string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SocialLinks {
    One(String),
    Many(Vec<String>),
}

impl SocialLinks {
    /// Non-blank links, in the order given.
    pub fn links(&self) -> Vec<&str> {
        match self {
            SocialLinks::One(link) => vec![link.as_str()],
            SocialLinks::Many(links) => links.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Product {
    #[validate(custom(function = "non_blank"))]
    pub nome: String,
    #[validate(range(min = 0.0, message = "preço não pode ser negativo"))]
    pub preco: f64,
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("campo obrigatório não pode ficar em branco")));
    }
    Ok(())
}

/// Scalars rendered as text; arrays and objects carry nothing printable.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

fn lenient_social_links<'de, D>(deserializer: D) -> Result<Option<SocialLinks>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(SocialLinks::Many(
            items.into_iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(other).map(SocialLinks::One),
    })
}

/// Anything but `false`, `0`, `""` and `null` counts as set.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
