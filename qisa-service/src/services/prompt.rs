//! Instruction block construction.
//!
//! The block is plain text handed to the model as context. Its shape is
//! fixed: every slot is always filled, with a placeholder when the store
//! left the field out.

use crate::models::{Product, StoreProfile};

/// Sentence the model must answer with when a question is off-topic.
pub const REFUSAL_SENTENCE: &str = "Desculpe, só posso responder sobre a loja e seus serviços.";

pub const NOT_INFORMED: &str = "Não informado";
pub const NEIGHBORHOOD_NOT_INFORMED: &str = "Bairro não informado";
pub const NO_NOTES: &str = "Nenhuma";
pub const NO_PRODUCTS: &str = "Nenhum produto informado.";

/// Render the instruction block for one store and its catalogue.
pub fn build_instruction(store: &StoreProfile, products: &[Product]) -> String {
    let social_links = store
        .redes_sociais
        .as_ref()
        .map(|links| links.links())
        .unwrap_or_default();

    format!(
        r#"Você é Qisa, assistente virtual da loja "{nome}".

📌 Informações da loja:
- CNPJ: {cnpj}
- Categoria: {categoria}
- Descrição: {descricao}

📍 Localização:
- Endereço: {endereco}, {bairro}, {cidade} - {estado}, CEP: {cep}
- Ponto de referência: {ponto_referencia}
- Google Maps: {google_maps}

⏰ Funcionamento:
- Dias: {dias}
- Horário: {abertura} às {fechamento}
- Fecha em feriados: {feriados}
- Observações: {observacoes}

📞 Contato:
- Telefone/WhatsApp: {telefone}
- E-mail: {email}
- Redes sociais: {redes_sociais}
- Site: {site}

📦 Produtos disponíveis:
{produtos}

💳 Serviços e Pagamento:
- Tipos de atendimento: {atendimento}
- Métodos de pagamento: {pagamento}

⚠️ IMPORTANTE:
Você deve responder apenas perguntas relacionadas à loja acima, seus produtos, serviços, funcionamento ou localização.

Se a pergunta **não** for sobre a loja ou seus serviços, **responda com:**
"{recusa}"

Seja simpática, objetiva e profissional nas respostas.
"#,
        nome = text_or(&store.nome, NOT_INFORMED),
        cnpj = text_or(&store.cnpj, NOT_INFORMED),
        categoria = text_or(&store.categoria, NOT_INFORMED),
        descricao = text_or(&store.descricao, NOT_INFORMED),
        endereco = text_or(&store.endereco, NOT_INFORMED),
        bairro = text_or(&store.bairro, NEIGHBORHOOD_NOT_INFORMED),
        cidade = text_or(&store.cidade, NOT_INFORMED),
        estado = text_or(&store.estado, NOT_INFORMED),
        cep = text_or(&store.cep, NOT_INFORMED),
        ponto_referencia = text_or(&store.ponto_referencia, NOT_INFORMED),
        google_maps = text_or(&store.google_maps, NOT_INFORMED),
        dias = text_or(&store.dias_funcionamento, NOT_INFORMED),
        abertura = text_or(&store.horario_abertura, NOT_INFORMED),
        fechamento = text_or(&store.horario_fechamento, NOT_INFORMED),
        feriados = if store.fecha_feriados { "Sim" } else { "Não" },
        observacoes = text_or(&store.observacoes, NO_NOTES),
        telefone = non_blank(&store.telefone).unwrap_or(NOT_INFORMED),
        email = text_or(&store.email, NOT_INFORMED),
        redes_sociais = join_or(&social_links, NOT_INFORMED),
        site = text_or(&store.site, NOT_INFORMED),
        produtos = product_listing(products),
        atendimento = join_or(&store.tipos_atendimento, NOT_INFORMED),
        pagamento = join_or(&store.metodos_pagamento, NOT_INFORMED),
        recusa = REFUSAL_SENTENCE,
    )
}

/// One `- name: R$ price` line per product, or the fallback line.
pub fn product_listing(products: &[Product]) -> String {
    if products.is_empty() {
        return NO_PRODUCTS.to_string();
    }

    products
        .iter()
        .map(|p| format!("- {}: R$ {}", p.nome.trim(), format_price(p.preco)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two decimals with a comma separator, e.g. `0.5` -> `0,50`.
pub fn format_price(price: f64) -> String {
    let formatted = format!("{:.2}", price);
    // Negative zero, or a negative that rounds to zero, prints as `0,00`.
    let formatted = match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned,
        _ => formatted.as_str(),
    };
    formatted.replace('.', ",")
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn text_or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().and_then(non_blank).unwrap_or(placeholder)
}

fn join_or<S: AsRef<str>>(items: &[S], placeholder: &str) -> String {
    let parts: Vec<&str> = items
        .iter()
        .filter_map(|item| non_blank(item.as_ref()))
        .collect();

    if parts.is_empty() {
        placeholder.to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SocialLinks;

    fn padaria_sol() -> StoreProfile {
        StoreProfile {
            nome: Some("Padaria Sol".to_string()),
            categoria: Some("Padaria".to_string()),
            descricao: Some("Pães frescos".to_string()),
            endereco: Some("Rua A, 10".to_string()),
            cidade: Some("SP".to_string()),
            estado: Some("SP".to_string()),
            dias_funcionamento: Some("Seg-Sáb".to_string()),
            horario_abertura: Some("07:00".to_string()),
            horario_fechamento: Some("19:00".to_string()),
            telefone: "1199999999".to_string(),
            tipos_atendimento: vec!["balcão".to_string()],
            metodos_pagamento: vec!["pix".to_string(), "cartão".to_string()],
            ..Default::default()
        }
    }

    fn product(nome: &str, preco: f64) -> Product {
        Product {
            nome: nome.to_string(),
            preco,
        }
    }

    /// Matches `- <name>: R$ <digits>,<2 digits>`.
    fn is_product_line(line: &str) -> bool {
        let Some(rest) = line.strip_prefix("- ") else {
            return false;
        };
        let Some((name, price)) = rest.rsplit_once(": R$ ") else {
            return false;
        };
        let Some((units, cents)) = price.split_once(',') else {
            return false;
        };
        !name.is_empty()
            && !units.is_empty()
            && units.chars().all(|c| c.is_ascii_digit())
            && cents.len() == 2
            && cents.chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.5), "0,50");
        assert_eq!(format_price(12.0), "12,00");
        assert_eq!(format_price(1234.567), "1234,57");
        assert_eq!(format_price(0.0), "0,00");
        assert_eq!(format_price(-0.0), "0,00");
        assert_eq!(format_price(-0.001), "0,00");
        assert_eq!(format_price(-1.5), "-1,50");
    }

    #[test]
    fn test_one_line_per_product() {
        let products = vec![
            product("Pão francês", 0.5),
            product("Bolo de cenoura", 25.0),
            product("Café", 4.75),
        ];
        let listing = product_listing(&products);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| is_product_line(line)));
        assert_eq!(lines[0], "- Pão francês: R$ 0,50");
    }

    #[test]
    fn test_product_lines_inside_instruction() {
        let products = vec![product("Pão francês", 0.5), product("Sonho", 3.2)];
        let instruction = build_instruction(&padaria_sol(), &products);

        let product_lines: Vec<&str> = instruction
            .lines()
            .filter(|line| line.contains(": R$ "))
            .collect();
        assert_eq!(product_lines, vec!["- Pão francês: R$ 0,50", "- Sonho: R$ 3,20"]);
        assert!(product_lines.iter().all(|line| is_product_line(line)));
    }

    #[test]
    fn test_empty_products_fallback() {
        assert_eq!(product_listing(&[]), NO_PRODUCTS);

        let instruction = build_instruction(&padaria_sol(), &[]);
        assert_eq!(instruction.matches(NO_PRODUCTS).count(), 1);
        assert!(!instruction.contains(": R$ "));
    }

    #[test]
    fn test_store_identity_and_sections_in_order() {
        let instruction = build_instruction(&padaria_sol(), &[product("Pão francês", 0.5)]);

        assert!(instruction.starts_with("Você é Qisa, assistente virtual da loja \"Padaria Sol\"."));
        assert!(instruction.contains("- Endereço: Rua A, 10, Bairro não informado, SP - SP, CEP: Não informado"));
        assert!(instruction.contains("- Horário: 07:00 às 19:00"));
        assert!(instruction.contains("- Tipos de atendimento: balcão"));
        assert!(instruction.contains("- Métodos de pagamento: pix, cartão"));

        let sections = [
            "📌 Informações da loja:",
            "📍 Localização:",
            "⏰ Funcionamento:",
            "📞 Contato:",
            "📦 Produtos disponíveis:",
            "💳 Serviços e Pagamento:",
            "⚠️ IMPORTANTE:",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| instruction.find(s).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_closing_directive_carries_refusal_policy() {
        let instruction = build_instruction(&padaria_sol(), &[]);

        assert!(instruction.contains(
            "Você deve responder apenas perguntas relacionadas à loja acima, seus produtos, serviços, funcionamento ou localização."
        ));
        assert!(instruction.contains(&format!("\"{}\"", REFUSAL_SENTENCE)));
        assert!(instruction.trim_end().ends_with("Seja simpática, objetiva e profissional nas respostas."));
    }

    #[test]
    fn test_absent_optional_fields_use_placeholders() {
        let store = StoreProfile {
            telefone: "1199999999".to_string(),
            ..Default::default()
        };
        let instruction = build_instruction(&store, &[]);

        assert!(instruction.contains("- CNPJ: Não informado"));
        assert!(instruction.contains("- Ponto de referência: Não informado"));
        assert!(instruction.contains("- Google Maps: Não informado"));
        assert!(instruction.contains("- Fecha em feriados: Não"));
        assert!(instruction.contains("- Observações: Nenhuma"));
        assert!(instruction.contains("- E-mail: Não informado"));
        assert!(instruction.contains("- Redes sociais: Não informado"));
        assert!(instruction.contains("- Site: Não informado"));
        assert!(instruction.contains("- Tipos de atendimento: Não informado"));
        assert!(instruction.contains("- Métodos de pagamento: Não informado"));

        // No slot is ever left empty.
        for line in instruction.lines().filter(|l| l.starts_with("- ")) {
            assert!(!line.trim_end().ends_with(':'), "empty slot in {line:?}");
        }
        assert!(!instruction.contains(", ,"));
        assert!(!instruction.contains("\"\""));
        assert!(!instruction.contains("undefined"));
    }

    #[test]
    fn test_blank_strings_count_as_absent() {
        let store = StoreProfile {
            cnpj: Some("   ".to_string()),
            email: Some(String::new()),
            telefone: "1199999999".to_string(),
            tipos_atendimento: vec![" ".to_string()],
            ..Default::default()
        };
        let instruction = build_instruction(&store, &[]);

        assert!(instruction.contains("- CNPJ: Não informado"));
        assert!(instruction.contains("- E-mail: Não informado"));
        assert!(instruction.contains("- Tipos de atendimento: Não informado"));
    }

    #[test]
    fn test_present_optional_fields_render() {
        let store = StoreProfile {
            cnpj: Some("12.345.678/0001-90".to_string()),
            bairro: Some("Centro".to_string()),
            fecha_feriados: true,
            observacoes: Some("Fechado para almoço".to_string()),
            redes_sociais: Some(SocialLinks::Many(vec![
                "@padariasol".to_string(),
                "fb.com/padariasol".to_string(),
            ])),
            ..padaria_sol()
        };
        let instruction = build_instruction(&store, &[]);

        assert!(instruction.contains("- CNPJ: 12.345.678/0001-90"));
        assert!(instruction.contains("Rua A, 10, Centro, SP - SP"));
        assert!(instruction.contains("- Fecha em feriados: Sim"));
        assert!(instruction.contains("- Observações: Fechado para almoço"));
        assert!(instruction.contains("- Redes sociais: @padariasol, fb.com/padariasol"));
    }
}
