// src/middleware/i18n.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::common::i18n::{I18nStore, DEFAULT_LANG};

/// Idioma das mensagens de erro, negociado contra os idiomas do `I18nStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

/// Primeiro idioma do `Accept-Language` (em ordem de peso) que o store conhece.
///
/// Só o subtag primário conta: "pt-BR" casa com "pt".
pub fn negotiate(accept_language: Option<&str>, store: &I18nStore) -> String {
    accept_language
        .map(accept_language::parse)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tag| tag.split('-').next().map(str::to_lowercase))
        .find(|lang| store.supports(lang))
        .unwrap_or_else(|| DEFAULT_LANG.to_string())
}

impl<S> FromRequestParts<S> for Locale
where
    I18nStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = I18nStore::from_ref(state);
        let header = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Ok(Locale(negotiate(header, &store)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language_by_weight() {
        let store = I18nStore::new();

        assert_eq!(negotiate(Some("pt-BR,pt;q=0.9,en;q=0.8"), &store), "pt");
        // Francês não tem mensagens; o próximo aceito é o português
        assert_eq!(negotiate(Some("fr-FR, pt;q=0.5"), &store), "pt");
        assert_eq!(negotiate(Some("en;q=0.3, PT-br;q=0.7"), &store), "pt");
    }

    #[test]
    fn falls_back_to_english() {
        let store = I18nStore::new();

        assert_eq!(negotiate(None, &store), "en");
        assert_eq!(negotiate(Some("de, fr;q=0.5"), &store), "en");
        assert_eq!(negotiate(Some(""), &store), "en");
    }
}
