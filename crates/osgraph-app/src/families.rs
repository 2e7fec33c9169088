//! # Family Tables
//!
//! Static lookup tables keyed by family id: which full-text index a family
//! searches, and which prompt the target input shows. These are plain keyed
//! tables; families are data, not types.

/// Family selected when nothing else is supplied.
pub const DEFAULT_FAMILY: &str = "REPO_CONTRIBUTE";

/// Full-text index for repositories.
pub const REPO_SOURCE: &str = "github_repo";
/// Full-text index for user accounts.
pub const USER_SOURCE: &str = "github_user";
/// Full-text index for organizations.
pub const ORG_SOURCE: &str = "github_organization";

const REPO_PLACEHOLDER: &str = "Enter a GitHub repository name";
const USER_PLACEHOLDER: &str = "Enter a GitHub account name";
const ORG_PLACEHOLDER: &str = "Enter a GitHub organization name";

/// family id → search category
const CATEGORY_TABLE: &[(&str, &str)] = &[
    ("REPO_CONTRIBUTE", REPO_SOURCE),
    ("REPO_ECOLOGY", REPO_SOURCE),
    ("REPO_COMMUNITY", REPO_SOURCE),
    ("ACCT_ACTIVITY", USER_SOURCE),
    ("ACCT_PARTNER", USER_SOURCE),
    ("ACCT_INTEREST", USER_SOURCE),
    ("ORG_ACTIVITY", ORG_SOURCE),
];

/// family id → input prompt
const PLACEHOLDER_TABLE: &[(&str, &str)] = &[
    ("REPO_CONTRIBUTE", REPO_PLACEHOLDER),
    ("REPO_ECOLOGY", REPO_PLACEHOLDER),
    ("REPO_COMMUNITY", REPO_PLACEHOLDER),
    ("ACCT_ACTIVITY", USER_PLACEHOLDER),
    ("ACCT_PARTNER", USER_PLACEHOLDER),
    ("ACCT_INTEREST", USER_PLACEHOLDER),
    ("ORG_ACTIVITY", ORG_PLACEHOLDER),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Search category (full-text index) for a family, if the family is known.
#[must_use]
pub fn category_of(family_id: &str) -> Option<&'static str> {
    lookup(CATEGORY_TABLE, family_id)
}

/// Target-input prompt for a family.
///
/// Unknown families fall back to the repository prompt.
#[must_use]
pub fn placeholder_for(family_id: &str) -> &'static str {
    lookup(PLACEHOLDER_TABLE, family_id).unwrap_or(REPO_PLACEHOLDER)
}

/// Whether target ids from `from` remain meaningful after switching to `to`.
///
/// Families missing from the table are compared by the query source they
/// declare, so catalog entries added server-side still behave sensibly.
#[must_use]
pub fn same_category(from_family: &str, from_source: &str, to_family: &str, to_source: &str) -> bool {
    let from = category_of(from_family).unwrap_or(from_source);
    let to = category_of(to_family).unwrap_or(to_source);
    from == to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_families_share_a_category() {
        assert_eq!(category_of("REPO_CONTRIBUTE"), Some(REPO_SOURCE));
        assert!(same_category(
            "REPO_CONTRIBUTE",
            REPO_SOURCE,
            "REPO_ECOLOGY",
            REPO_SOURCE
        ));
    }

    #[test]
    fn account_and_repository_families_differ() {
        assert!(!same_category(
            "REPO_CONTRIBUTE",
            REPO_SOURCE,
            "ACCT_ACTIVITY",
            USER_SOURCE
        ));
    }

    #[test]
    fn unknown_family_compares_by_source() {
        assert_eq!(category_of("CUSTOM"), None);
        assert!(same_category("CUSTOM", REPO_SOURCE, "REPO_COMMUNITY", REPO_SOURCE));
        assert!(!same_category("CUSTOM", "other_index", "REPO_COMMUNITY", REPO_SOURCE));
    }

    #[test]
    fn placeholder_falls_back_to_repository_prompt() {
        assert_eq!(placeholder_for("ACCT_PARTNER"), USER_PLACEHOLDER);
        assert_eq!(placeholder_for("ORG_ACTIVITY"), ORG_PLACEHOLDER);
        assert_eq!(placeholder_for("CUSTOM"), REPO_PLACEHOLDER);
    }
}
