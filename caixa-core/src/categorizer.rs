//! Two-tier description classifier: user rules first, then the built-in
//! taxonomy, then [`OTHER`].

use crate::category::{OTHER, TAXONOMY};
use crate::rules::CategoryRules;

/// Classify a description against the user's rules and the built-in table.
///
/// Every user rule is checked before the taxonomy is consulted.
pub fn classify<'a>(description: &str, rules: &'a CategoryRules) -> &'a str {
    let desc = description.to_lowercase();
    if desc.is_empty() {
        return OTHER;
    }

    if let Some(rule) = rules.first_match(&desc) {
        return rule.category.as_str();
    }

    match_taxonomy(&desc).unwrap_or(OTHER)
}

/// Classify using only the built-in taxonomy. Statement imports go through
/// this path and never see user rules.
pub fn classify_builtin(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    if desc.is_empty() {
        return OTHER;
    }
    match_taxonomy(&desc).unwrap_or(OTHER)
}

fn match_taxonomy(lowered: &str) -> Option<&'static str> {
    TAXONOMY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{FOOD, LEISURE, SERVICES, TRANSFER, TRANSPORT};

    #[test]
    fn test_builtin_food() {
        assert_eq!(classify_builtin("SUPERMERCADO BOM PRECO"), FOOD);
        assert_eq!(classify_builtin("Padaria Pao Quente"), FOOD);
    }

    #[test]
    fn test_empty_description_is_other() {
        let rules = CategoryRules::new();
        assert_eq!(classify("", &rules), OTHER);
        assert_eq!(classify_builtin(""), OTHER);
    }

    #[test]
    fn test_unknown_description_is_other() {
        let rules = CategoryRules::new();
        assert_eq!(classify("LOJA XYZ", &rules), OTHER);
    }

    #[test]
    fn test_taxonomy_order_decides_ties() {
        // "pix" (Transfer) and "mercado" (Food) both match; Food is declared first.
        assert_eq!(classify_builtin("PIX MERCADO CENTRAL"), FOOD);
        assert_eq!(classify_builtin("PIX ENVIADO JOAO"), TRANSFER);
    }

    #[test]
    fn test_user_rule_matching_builtin() {
        let rules: CategoryRules = [("uber", TRANSPORT)].into_iter().collect();
        assert_eq!(classify("UBER TRIP 552", &rules), TRANSPORT);
    }

    #[test]
    fn test_user_rule_overrides_builtin() {
        assert_eq!(classify_builtin("NETFLIX.COM"), SERVICES);

        let rules: CategoryRules = [("netflix", LEISURE)].into_iter().collect();
        assert_eq!(classify("NETFLIX.COM", &rules), LEISURE);
    }

    #[test]
    fn test_user_rules_checked_in_full_before_taxonomy() {
        // The taxonomy would hit "supermercado" early, but a later user rule still wins.
        let rules: CategoryRules = [("farmacia", "Saúde"), ("bom preco", "Mercado do Bairro")]
            .into_iter()
            .collect();
        assert_eq!(classify("SUPERMERCADO BOM PRECO", &rules), "Mercado do Bairro");
    }

    #[test]
    fn test_first_user_rule_wins() {
        let rules: CategoryRules = [("trip", "Viagem"), ("uber", TRANSPORT)]
            .into_iter()
            .collect();
        assert_eq!(classify("UBER TRIP 552", &rules), "Viagem");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let rules: CategoryRules = [("cinema", LEISURE)].into_iter().collect();
        let first = classify("CINEMARK SHOPPING", &rules);
        for _ in 0..10 {
            assert_eq!(classify("CINEMARK SHOPPING", &rules), first);
        }
    }
}
