// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idioma preferido do cliente, vindo do `Accept-Language`.
/// `None` quando o header não existe ou não tem nenhuma tag.
pub struct Locale(pub Option<String>);

/// "pt-BR" vira "pt"; "en" continua "en".
pub fn primary_language(header_value: &str) -> Option<String> {
    accept_language::parse(header_value)
        .first()
        .and_then(|tag| tag.split('-').next())
        .filter(|lang| !lang.is_empty())
        .map(|lang| lang.to_lowercase())
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(primary_language);

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_suffix_is_dropped() {
        assert_eq!(primary_language("pt-BR,pt;q=0.9"), Some("pt".to_string()));
        assert_eq!(primary_language("en"), Some("en".to_string()));
    }

    #[test]
    fn highest_quality_tag_wins() {
        assert_eq!(primary_language("pt;q=0.5, en;q=0.9"), Some("en".to_string()));
    }

    #[test]
    fn empty_header_has_no_language() {
        assert_eq!(primary_language(""), None);
    }
}
