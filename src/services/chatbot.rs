// src/services/chatbot.rs
//
// Assistente de respostas prontas. Não guarda estado nem consulta o banco:
// a resposta depende só do texto recebido e do idioma.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatLanguage {
    Pt,
    En,
    Sena,
}

impl ChatLanguage {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "pt" => Some(ChatLanguage::Pt),
            "en" => Some(ChatLanguage::En),
            "sena" | "seh" => Some(ChatLanguage::Sena),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ChatLanguage::Pt => "pt",
            ChatLanguage::En => "en",
            ChatLanguage::Sena => "sena",
        }
    }

    /// Idioma do corpo, depois o do `Accept-Language`, depois português.
    /// Códigos desconhecidos caem no português.
    pub fn resolve(requested: Option<&str>, header: Option<&str>) -> Self {
        requested
            .or(header)
            .and_then(Self::from_code)
            .unwrap_or(ChatLanguage::Pt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Products,
    Weather,
    Pest,
}

// Palavras-chave nas três línguas, na ordem em que os tópicos são testados
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Products, &["produto", "product", "zinthu"]),
    (Topic::Weather, &["clima", "weather", "nyengo"]),
    (Topic::Pest, &["praga", "pest", "tizilombo"]),
];

pub fn detect_topic(message: &str) -> Topic {
    let lower = message.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Greeting)
}

pub fn phrase(language: ChatLanguage, topic: Topic) -> &'static str {
    use ChatLanguage::*;
    use Topic::*;

    match (language, topic) {
        (Pt, Greeting) => "Olá! Como posso ajudá-lo hoje?",
        (Pt, Products) => "Para ver produtos disponíveis, visite a página de produtos.",
        (Pt, Weather) => "Você pode consultar alertas climáticos na sua região.",
        (Pt, Pest) => "Para diagnóstico de pragas, envie uma foto na seção de diagnóstico.",

        (En, Greeting) => "Hello! How can I help you today?",
        (En, Products) => "To see available products, visit the products page.",
        (En, Weather) => "You can check weather alerts in your region.",
        (En, Pest) => "For pest diagnosis, upload a photo in the diagnosis section.",

        (Sena, Greeting) => "Moni! Ndingakuthandizeni lero?",
        (Sena, Products) => "Kuti muone zinthu zomwe zilipo, pitani kutsamba lazinthu.",
        (Sena, Weather) => "Mukhoza kuona makani anyengo kudera lanu.",
        (Sena, Pest) => "Kuti muzindikire tizilombo, tumizani chithunzi patsamba yodziwitsira.",
    }
}

pub fn reply(message: &str, language: ChatLanguage) -> &'static str {
    phrase(language, detect_topic(message))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatbotReply {
    #[schema(example = "Para ver produtos disponíveis, visite a página de produtos.")]
    pub response: String,
    pub language: ChatLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_pick_the_topic_in_any_language() {
        assert_eq!(detect_topic("Onde vejo os PRODUTOS?"), Topic::Products);
        assert_eq!(detect_topic("what's the weather like"), Topic::Weather);
        assert_eq!(detect_topic("tizilombo pa munda"), Topic::Pest);
        assert_eq!(detect_topic("bom dia"), Topic::Greeting);
    }

    #[test]
    fn products_win_over_later_topics() {
        assert_eq!(detect_topic("produto contra praga"), Topic::Products);
    }

    #[test]
    fn reply_uses_the_requested_language() {
        assert_eq!(
            reply("product list", ChatLanguage::En),
            "To see available products, visit the products page."
        );
        assert_eq!(reply("", ChatLanguage::Sena), "Moni! Ndingakuthandizeni lero?");
    }

    #[test]
    fn language_resolution_order() {
        assert_eq!(ChatLanguage::resolve(Some("en"), Some("sena")), ChatLanguage::En);
        assert_eq!(ChatLanguage::resolve(None, Some("sena")), ChatLanguage::Sena);
        assert_eq!(ChatLanguage::resolve(None, None), ChatLanguage::Pt);
    }

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        assert_eq!(ChatLanguage::resolve(Some("fr"), None), ChatLanguage::Pt);
        assert_eq!(
            reply("clima", ChatLanguage::resolve(Some("xx"), None)),
            "Você pode consultar alertas climáticos na sua região."
        );
    }
}
