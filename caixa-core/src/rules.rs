//! User-defined keyword → category overrides.
//!
//! Rules are kept in insertion order: classification returns the first rule
//! whose keyword occurs in the description, so position matters.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A single keyword → category override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Lowercase substring matched against descriptions
    pub keyword: String,
    pub category: String,
}

/// Ordered keyword → category mapping with unique keywords
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRules {
    entries: Vec<CategoryRule>,
    index: HashMap<String, usize>,
}

impl CategoryRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a rule. An existing keyword keeps its position; a new
    /// one goes to the end. Returns `false` for an empty keyword.
    pub fn insert(&mut self, keyword: &str, category: impl Into<String>) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        let category = category.into();

        match self.index.get(&keyword) {
            Some(&pos) => self.entries[pos].category = category,
            None => {
                self.index.insert(keyword.clone(), self.entries.len());
                self.entries.push(CategoryRule { keyword, category });
            }
        }
        true
    }

    /// Remove a rule, returning its category if it existed.
    pub fn remove(&mut self, keyword: &str) -> Option<String> {
        let keyword = keyword.trim().to_lowercase();
        let pos = self.index.remove(&keyword)?;
        let removed = self.entries.remove(pos);
        for (i, rule) in self.entries.iter().enumerate().skip(pos) {
            self.index.insert(rule.keyword.clone(), i);
        }
        Some(removed.category)
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.trim().to_lowercase();
        self.index
            .get(&keyword)
            .map(|&pos| self.entries[pos].category.as_str())
    }

    /// Rules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First rule whose keyword occurs in an already lower-cased description
    pub fn first_match(&self, lowered: &str) -> Option<&CategoryRule> {
        self.entries.iter().find(|r| lowered.contains(r.keyword.as_str()))
    }
}

impl<K: AsRef<str>, C: Into<String>> FromIterator<(K, C)> for CategoryRules {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut rules = CategoryRules::new();
        for (keyword, category) in iter {
            rules.insert(keyword.as_ref(), category);
        }
        rules
    }
}

// Persisted as a plain JSON object; key order is rule order.
impl Serialize for CategoryRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for rule in &self.entries {
            map.serialize_entry(&rule.keyword, &rule.category)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = CategoryRules;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of keyword to category")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut rules = CategoryRules::new();
                while let Some((keyword, category)) = access.next_entry::<String, String>()? {
                    rules.insert(&keyword, category);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(rules: &CategoryRules) -> Vec<&str> {
        rules.iter().map(|r| r.keyword.as_str()).collect()
    }

    #[test]
    fn test_insert_lowercases_keyword() {
        let mut rules = CategoryRules::new();
        assert!(rules.insert("  NetFlix ", "Lazer"));
        assert_eq!(rules.get("netflix"), Some("Lazer"));
        assert_eq!(keywords(&rules), vec!["netflix"]);
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut rules = CategoryRules::new();
        assert!(!rules.insert("   ", "Lazer"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut rules: CategoryRules =
            [("uber", "Transporte"), ("ifood", "Alimentação"), ("cinema", "Lazer")]
                .into_iter()
                .collect();
        rules.insert("UBER", "Trabalho");
        assert_eq!(keywords(&rules), vec!["uber", "ifood", "cinema"]);
        assert_eq!(rules.get("uber"), Some("Trabalho"));
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_remove_then_readd_moves_to_end() {
        let mut rules: CategoryRules =
            [("uber", "Transporte"), ("ifood", "Alimentação"), ("cinema", "Lazer")]
                .into_iter()
                .collect();
        assert_eq!(rules.remove("Uber"), Some("Transporte".to_string()));
        assert_eq!(keywords(&rules), vec!["ifood", "cinema"]);
        assert_eq!(rules.get("cinema"), Some("Lazer"));

        rules.insert("uber", "Transporte");
        assert_eq!(keywords(&rules), vec!["ifood", "cinema", "uber"]);
        assert_eq!(rules.remove("missing"), None);
    }

    #[test]
    fn test_first_match_uses_insertion_order() {
        let rules: CategoryRules = [("posto", "Carro"), ("posto shell", "Viagem")]
            .into_iter()
            .collect();
        let hit = rules.first_match("posto shell br 101").unwrap();
        assert_eq!(hit.category, "Carro");
    }

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"zeta": "Lazer", "alpha": "Saúde", "Mid": "Outros"}"#;
        let rules: CategoryRules = serde_json::from_str(json).unwrap();
        assert_eq!(keywords(&rules), vec!["zeta", "alpha", "mid"]);

        let out = serde_json::to_string(&rules).unwrap();
        assert_eq!(out, r#"{"zeta":"Lazer","alpha":"Saúde","mid":"Outros"}"#);
    }
}
