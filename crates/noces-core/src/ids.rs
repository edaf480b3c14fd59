//! ID prefix constants.
//!
//! Document IDs are `<prefix>-<8 hex chars>`, generated by the store.

pub const PREFIX_CLIENT: &str = "cli";
pub const PREFIX_EVENT: &str = "evt";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_EXPENSE: &str = "exp";
pub const PREFIX_INVOICE: &str = "inv";
pub const PREFIX_DEVIS: &str = "dev";
pub const PREFIX_CONTRACT: &str = "ctr";
pub const PREFIX_VENDOR: &str = "vnd";
pub const PREFIX_COMPOSITION: &str = "cmp";
pub const PREFIX_ARTICLE: &str = "art";
pub const PREFIX_WAREHOUSE: &str = "whs";
pub const PREFIX_POST_IT: &str = "pst";
pub const PREFIX_INTEGRATION: &str = "itg";

/// Every prefix in use, in collection order.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_CLIENT,
    PREFIX_EVENT,
    PREFIX_TASK,
    PREFIX_EXPENSE,
    PREFIX_INVOICE,
    PREFIX_DEVIS,
    PREFIX_CONTRACT,
    PREFIX_VENDOR,
    PREFIX_COMPOSITION,
    PREFIX_ARTICLE,
    PREFIX_WAREHOUSE,
    PREFIX_POST_IT,
    PREFIX_INTEGRATION,
];

/// Return the prefix part of an ID (`"inv-a3f8b2c1"` -> `"inv"`).
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    let (prefix, rest) = id.split_once('-')?;
    if prefix.is_empty() || rest.is_empty() {
        return None;
    }
    Some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert!(seen.insert(*prefix), "duplicate prefix {prefix}");
        }
    }

    #[test]
    fn prefix_of_splits_on_first_dash() {
        assert_eq!(prefix_of("inv-a3f8b2c1"), Some("inv"));
        assert_eq!(prefix_of("inv-"), None);
        assert_eq!(prefix_of("nodash"), None);
    }
}
