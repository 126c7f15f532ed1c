//! Category names and the built-in keyword taxonomy

pub const FOOD: &str = "Alimentação";
pub const TRANSPORT: &str = "Transporte";
pub const SERVICES: &str = "Serviços";
pub const HEALTH: &str = "Saúde";
pub const EDUCATION: &str = "Educação";
pub const LEISURE: &str = "Lazer";
pub const TRANSFER: &str = "Transferência";
/// Fallback for anything no rule or keyword recognizes
pub const OTHER: &str = "Outros";

/// Filter value that matches every category
pub const ALL_CATEGORIES: &str = "Todas";

/// Categories offered before the user has saved a list of their own
pub fn default_categories() -> Vec<String> {
    [FOOD, TRANSPORT, SERVICES, HEALTH, EDUCATION, LEISURE, TRANSFER, OTHER]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Built-in keyword table. Lookup walks categories in this order and the
/// first category with a matching keyword wins.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    (
        FOOD,
        &[
            "supermercado",
            "supermer",
            "mercado",
            "padaria",
            "panificadora",
            "restaurante",
            "lanchonete",
            "pizzaria",
            "hamburgueria",
            "burger",
            "delicias",
            "caseira",
            "mix",
            "cebola",
            "gigantao",
        ],
    ),
    (
        TRANSPORT,
        &[
            "posto",
            "combustível",
            "gasolina",
            "uber",
            "99",
            "taxi",
            "metro",
            "ônibus",
            "estacionamento",
        ],
    ),
    (
        SERVICES,
        &[
            "netflix", "spotify", "youtube", "amazon", "google", "telefone", "internet", "energia",
            "água", "gás",
        ],
    ),
    (
        HEALTH,
        &[
            "farmácia",
            "drogaria",
            "médico",
            "hospital",
            "consulta",
            "exame",
            "medicamento",
        ],
    ),
    (
        EDUCATION,
        &["escola", "universidade", "curso", "livro", "material escolar"],
    ),
    (
        LEISURE,
        &["cinema", "teatro", "show", "viagem", "hotel", "passeio"],
    ),
    (
        TRANSFER,
        &["transferência", "pix", "ted", "doc", "pagamento"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_declaration_order() {
        let names: Vec<&str> = TAXONOMY.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![FOOD, TRANSPORT, SERVICES, HEALTH, EDUCATION, LEISURE, TRANSFER]
        );
    }

    #[test]
    fn test_taxonomy_keywords_are_lowercase() {
        for (_, keywords) in TAXONOMY {
            for kw in *keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }

    #[test]
    fn test_default_categories_end_with_other() {
        let cats = default_categories();
        assert_eq!(cats.len(), 8);
        assert_eq!(cats.last().map(String::as_str), Some(OTHER));
    }
}
