use crate::config::{ConfigError, ConfigKind};
use crate::period::{Scope, Tier};
use toml::{Table, Value};

/// Recursively merge `overlay` over `base`.
///
/// Tables merge key by key; any other value (arrays included) replaces the
/// base value outright.
pub fn deep_merge(base: &Table, overlay: &Table) -> Table {
    let mut out = base.clone();
    for (key, value) in overlay {
        let merged = match (out.get(key), value) {
            (Some(Value::Table(base_child)), Value::Table(overlay_child)) => {
                Value::Table(deep_merge(base_child, overlay_child))
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// `deep_merge(defaults, profiles.<scope>.<tier>)` for one raw document
pub fn effective_tree(
    doc: &Table,
    kind: ConfigKind,
    scope: Scope,
    tier: Tier,
) -> Result<Table, ConfigError> {
    let defaults = optional_table(doc, kind, "defaults", "defaults")?;
    let profiles = optional_table(doc, kind, "profiles", "profiles")?;

    let profile = match profiles {
        Some(profiles) => {
            let scope_key = format!("profiles.{}", scope);
            match optional_table(profiles, kind, scope.as_str(), &scope_key)? {
                Some(by_tier) => {
                    let tier_key = format!("{}.{}", scope_key, tier);
                    optional_table(by_tier, kind, tier.as_str(), &tier_key)?
                }
                None => None,
            }
        }
        None => None,
    };

    let empty = Table::new();
    Ok(deep_merge(
        defaults.unwrap_or(&empty),
        profile.unwrap_or(&empty),
    ))
}

fn optional_table<'a>(
    table: &'a Table,
    kind: ConfigKind,
    key: &str,
    path: &str,
) -> Result<Option<&'a Table>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(other) => Err(ConfigError::InvalidType {
            kind,
            key: path.to_string(),
            expected: "a table",
            found: other.type_str().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Table {
        text.parse::<Table>().unwrap()
    }

    #[test]
    fn test_tables_merge_recursively() {
        let base = parse("[a]\nx = 1\n[a.inner]\ny = 2\nz = 3\n");
        let overlay = parse("[a.inner]\nz = 30\nw = 4\n");
        let merged = deep_merge(&base, &overlay);
        let inner = merged["a"]["inner"].as_table().unwrap();
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(inner["y"].as_integer(), Some(2));
        assert_eq!(inner["z"].as_integer(), Some(30));
        assert_eq!(inner["w"].as_integer(), Some(4));
    }

    #[test]
    fn test_non_tables_replace() {
        let base = parse("list = [1, 2, 3]\n[t]\nk = 1\n");
        let overlay = parse("list = [9]\nt = \"scalar\"\n");
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["list"].as_array().unwrap().len(), 1);
        assert_eq!(merged["t"].as_str(), Some("scalar"));
    }

    #[test]
    fn test_effective_tree_picks_profile() {
        let doc = parse(
            "[defaults]\nmin = 0.1\nmode = \"a\"\n[profiles.weekly.premium]\nmode = \"b\"\n",
        );
        let tree = effective_tree(&doc, ConfigKind::Filters, Scope::Weekly, Tier::Premium).unwrap();
        assert_eq!(tree["mode"].as_str(), Some("b"));
        assert_eq!(tree["min"].as_float(), Some(0.1));

        let free = effective_tree(&doc, ConfigKind::Filters, Scope::Weekly, Tier::Free).unwrap();
        assert_eq!(free["mode"].as_str(), Some("a"));
    }

    #[test]
    fn test_effective_tree_rejects_non_table_profile() {
        let doc = parse("[profiles]\nweekly = 3\n");
        let err = effective_tree(&doc, ConfigKind::Weights, Scope::Weekly, Tier::Free).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidType { .. }));
    }
}
