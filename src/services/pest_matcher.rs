// src/services/pest_matcher.rs
//
// Diagnóstico de pragas por palavra-chave. A imagem é só guardada; quem decide
// é a descrição enviada pelo agricultor.

use crate::models::pest::{PestMatch, PestSignature};

pub const UNIDENTIFIED_PEST: &str = "Não identificado";

/// Catálogo em ordem de prioridade: a primeira praga com alguma palavra presente vence.
pub const PEST_CATALOG: &[PestSignature] = &[
    PestSignature {
        name: "Lagarta do Cartucho",
        keywords: &["lagarta", "folha", "buraco", "milho"],
        severity: "alta",
        recommended_product: "Inseticida biológico Bacillus thuringiensis",
        description: "Praga comum em milho, causa danos significativos nas folhas",
    },
    PestSignature {
        name: "Mosca Branca",
        keywords: &["mosca", "branca", "tomate", "amarelo"],
        severity: "média",
        recommended_product: "Óleo de Neem",
        description: "Inseto sugador que causa amarelecimento das folhas",
    },
    PestSignature {
        name: "Pulgão",
        keywords: &["pulgão", "verde", "pequeno", "folha"],
        severity: "média",
        recommended_product: "Sabão potássico",
        description: "Inseto pequeno que suga seiva das plantas",
    },
    PestSignature {
        name: "Ferrugem",
        keywords: &["ferrugem", "mancha", "laranja", "café"],
        severity: "alta",
        recommended_product: "Fungicida à base de cobre",
        description: "Doença fúngica que causa manchas alaranjadas",
    },
    PestSignature {
        name: "Besouro",
        keywords: &["besouro", "duro", "preto", "raiz"],
        severity: "média",
        recommended_product: "Inseticida natural piretróide",
        description: "Inseto que ataca raízes e folhas",
    },
];

pub fn diagnose(description: Option<&str>) -> PestMatch {
    let text = description.unwrap_or_default().to_lowercase();

    PEST_CATALOG
        .iter()
        .find_map(|pest| {
            pest.keywords
                .iter()
                .find(|keyword| text.contains(*keyword))
                .map(|keyword| matched(pest, keyword))
        })
        .unwrap_or_else(unidentified)
}

/// Primeira palavra do produto recomendado, usada para procurar o insumo no catálogo dos fornecedores.
pub fn recommendation_term(pest: &PestMatch) -> Option<&str> {
    if !pest.is_identified() {
        return None;
    }
    pest.recommended_product.split_whitespace().next()
}

fn matched(pest: &PestSignature, keyword: &str) -> PestMatch {
    PestMatch {
        name: pest.name.to_string(),
        severity: pest.severity.to_string(),
        recommended_product: pest.recommended_product.to_string(),
        description: pest.description.to_string(),
        matched_keyword: Some(keyword.to_string()),
    }
}

fn unidentified() -> PestMatch {
    PestMatch {
        name: UNIDENTIFIED_PEST.to_string(),
        severity: "desconhecida".to_string(),
        recommended_product: "Consulte um agrônomo".to_string(),
        description: "Não foi possível identificar a praga automaticamente".to_string(),
        matched_keyword: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caterpillar_in_maize() {
        let result = diagnose(Some("folha com buraco de lagarta no milho"));
        assert_eq!(result.name, "Lagarta do Cartucho");
        assert_eq!(result.severity, "alta");
        assert_eq!(result.matched_keyword.as_deref(), Some("lagarta"));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(diagnose(Some("MOSCA no TOMATE")).name, "Mosca Branca");
        assert_eq!(diagnose(Some("Ferrugem no Café")).name, "Ferrugem");
        assert_eq!(diagnose(Some("PULGÃO")).name, "Pulgão");
    }

    #[test]
    fn catalog_order_wins_over_later_entries() {
        // "folha" também é palavra do pulgão, mas a lagarta vem antes no catálogo
        let result = diagnose(Some("pulgão verde na folha"));
        assert_eq!(result.name, "Lagarta do Cartucho");
        assert_eq!(result.matched_keyword.as_deref(), Some("folha"));
    }

    #[test]
    fn no_keyword_gives_the_unidentified_result() {
        for description in [None, Some(""), Some("planta murcha")] {
            let result = diagnose(description);
            assert_eq!(result.name, UNIDENTIFIED_PEST);
            assert_eq!(result.severity, "desconhecida");
            assert_eq!(result.recommended_product, "Consulte um agrônomo");
            assert!(!result.is_identified());
        }
    }

    #[test]
    fn recommendation_term_is_the_first_word() {
        assert_eq!(recommendation_term(&diagnose(Some("besouro preto"))), Some("Inseticida"));
        assert_eq!(recommendation_term(&diagnose(Some("mosca"))), Some("Óleo"));
        assert_eq!(recommendation_term(&diagnose(Some("nada"))), None);
    }
}
