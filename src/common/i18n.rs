// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("no_tiers_configured", "Pricing is unavailable: no commission tiers are configured."),
    ("manual_tier_not_found", "The manually assigned tier no longer exists."),
    ("invalid_gross_amount", "The booking amount must be positive, within range and use the currency's smallest unit."),
    ("misconfigured_shared_split", "Shared fee percentages must add up to 100."),
    ("override_ambiguous", "More than one pricing override starts at the same time."),
    ("fee_exceeds_gross_amount", "The fee is larger than the booking amount."),
    ("invalid_override", "Invalid pricing override."),
    ("invalid_tier", "Invalid pricing tier."),
    ("tier_not_found", "Pricing tier not found."),
    ("duplicate_tier_priority", "An active tier already uses this priority."),
    ("override_not_found", "Pricing override not found."),
    ("vendor_not_found", "Vendor not found."),
    ("booking_not_found", "Booking not found."),
    ("booking_already_priced", "This booking already has a frozen commission."),
    ("internal_error", "An unexpected error occurred."),
];

const PT: &[(&str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("no_tiers_configured", "Precificação indisponível: nenhum tier de comissão configurado."),
    ("manual_tier_not_found", "O tier atribuído manualmente não existe mais."),
    ("invalid_gross_amount", "O valor da reserva deve ser positivo, dentro do limite e respeitar a menor unidade da moeda."),
    ("misconfigured_shared_split", "Os percentuais da taxa compartilhada devem somar 100."),
    ("override_ambiguous", "Mais de um override de preço começa no mesmo instante."),
    ("fee_exceeds_gross_amount", "A taxa é maior que o valor da reserva."),
    ("invalid_override", "Override de preço inválido."),
    ("invalid_tier", "Tier de comissão inválido."),
    ("tier_not_found", "Tier de comissão não encontrado."),
    ("duplicate_tier_priority", "Já existe um tier ativo com esta prioridade."),
    ("override_not_found", "Override de preço não encontrado."),
    ("vendor_not_found", "Vendedor não encontrado."),
    ("booking_not_found", "Reserva não encontrada."),
    ("booking_already_priced", "Esta reserva já possui comissão congelada."),
    ("internal_error", "Ocorreu um erro inesperado."),
];

// Mensagens de erro por idioma; carregadas uma vez e compartilhadas no AppState
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("en", EN.iter().copied().collect());
        messages.insert("pt", PT.iter().copied().collect());
        Self { messages: Arc::new(messages) }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.messages.contains_key(lang)
    }

    /// Idioma desconhecido cai para inglês; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_translated_in_both_languages() {
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        let pt: Vec<_> = PT.iter().map(|(k, _)| *k).collect();
        assert_eq!(en, pt);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(store.translate("id", "vendor_not_found"), "Vendor not found.");
        assert_eq!(store.translate("pt", "vendor_not_found"), "Vendedor não encontrado.");
        assert_eq!(store.translate("pt", "missing_key"), "missing_key");
    }
}
