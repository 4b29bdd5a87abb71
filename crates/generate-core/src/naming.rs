//! Exposed-name derivation shared by the backends.

use std::collections::BTreeMap;

/// Derives the wrapper-level method name for a native function: an alias
/// wins outright; otherwise the configured prefix is dropped and the first
/// remaining character lower-cased (`tixiGetValue` -> `getValue`). Names
/// that do not carry the prefix are kept as they are.
pub fn exposed_method_name(
    native: &str,
    prefix: &str,
    aliases: &BTreeMap<String, String>,
) -> String {
    if let Some(alias) = aliases.get(native) {
        return alias.clone();
    }
    match native.strip_prefix(prefix) {
        Some(rest) if !rest.is_empty() => {
            let mut chars = rest.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_lowercase(), chars.as_str()),
                None => native.to_string(),
            }
        }
        _ => native.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_dropped_and_lowercased() {
        let aliases = BTreeMap::new();
        assert_eq!(exposed_method_name("tixiGetValue", "tixi", &aliases), "getValue");
        assert_eq!(exposed_method_name("tixiUIDCheckExists", "tixi", &aliases), "uIDCheckExists");
    }

    #[test]
    fn test_unprefixed_name_is_kept() {
        let aliases = BTreeMap::new();
        assert_eq!(exposed_method_name("getVersion", "tixi", &aliases), "getVersion");
    }

    #[test]
    fn test_alias_wins() {
        let mut aliases = BTreeMap::new();
        aliases.insert("tixiCreateDocument".to_string(), "create".to_string());
        assert_eq!(exposed_method_name("tixiCreateDocument", "tixi", &aliases), "create");
    }
}
