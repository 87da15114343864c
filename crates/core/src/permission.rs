//! Page permission rules and their resolution down the path hierarchy.
//!
//! Every page carries a `view_rule` and a `modify_rule`. A rule is either
//! public (`*`), a named token, or `inherit`. The effective rule for a path is
//! the first explicit rule found walking from the path itself up to the root;
//! if every page on the way inherits (or no page exists), the path is public.
//!
//! A named token `T` for action `A` is satisfied when the caller holds the
//! permission `(A's domain, T)` or the domain wildcard `(A's domain, *)`.
//! Public rules are satisfied by everyone, anonymous callers included.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::path::ancestor_paths;

/// Stored rule value meaning "always satisfied".
pub const RULE_PUBLIC: &str = "*";

/// Stored rule value meaning "defer to the nearest ancestor".
pub const RULE_INHERIT: &str = "inherit";

/// Token that, when held, covers every token of its domain.
pub const TOKEN_WILDCARD: &str = "*";

/// Maximum length of a named permission token.
pub const MAX_TOKEN_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Actions and domains
// ---------------------------------------------------------------------------

/// What a caller wants to do with a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Modify,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Modify => "modify",
        }
    }
}

/// The namespace half of a [`Permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PermissionDomain {
    View,
    Modify,
    Admin,
}

impl PermissionDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionDomain::View => "wikiView",
            PermissionDomain::Modify => "wikiModify",
            PermissionDomain::Admin => "wikiAdmin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "wikiView" => Some(PermissionDomain::View),
            "wikiModify" => Some(PermissionDomain::Modify),
            "wikiAdmin" => Some(PermissionDomain::Admin),
            _ => None,
        }
    }
}

impl From<Action> for PermissionDomain {
    fn from(action: Action) -> Self {
        match action {
            Action::View => PermissionDomain::View,
            Action::Modify => PermissionDomain::Modify,
        }
    }
}

// ---------------------------------------------------------------------------
// Permissions held by callers
// ---------------------------------------------------------------------------

/// A `(domain, token)` pair, written `domain/token` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    pub domain: PermissionDomain,
    pub token: String,
}

impl Permission {
    pub fn new(domain: PermissionDomain, token: impl Into<String>) -> Self {
        Self {
            domain,
            token: token.into(),
        }
    }

    /// Parse a `domain/token` claim. Returns `None` for malformed input.
    pub fn parse(claim: &str) -> Option<Self> {
        let (domain, token) = claim.split_once('/')?;
        let domain = PermissionDomain::parse(domain)?;
        if token != TOKEN_WILDCARD && validate_token(token).is_err() {
            return None;
        }
        Some(Self::new(domain, token))
    }

    pub fn is_wildcard(&self) -> bool {
        self.token == TOKEN_WILDCARD
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain.as_str(), self.token)
    }
}

/// The authorization collaborator: answers whether a caller holds a permission.
pub trait PermissionChecker {
    fn has_perm(&self, required: &Permission) -> bool;
}

/// The permissions attached to one caller.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    grants: HashSet<Permission>,
}

impl PermissionSet {
    /// A caller with no permissions; passes public rules only.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a set from `domain/token` claims.
    ///
    /// Returns the set together with the claims that failed to parse so the
    /// caller can report them.
    pub fn from_claims<S: AsRef<str>>(claims: &[S]) -> (Self, Vec<String>) {
        let mut grants = HashSet::new();
        let mut rejected = Vec::new();
        for claim in claims {
            match Permission::parse(claim.as_ref()) {
                Some(p) => {
                    grants.insert(p);
                }
                None => rejected.push(claim.as_ref().to_string()),
            }
        }
        (Self { grants }, rejected)
    }
}

impl PermissionChecker for PermissionSet {
    fn has_perm(&self, required: &Permission) -> bool {
        if required.is_wildcard() {
            return true;
        }
        self.grants.contains(required)
            || self
                .grants
                .contains(&Permission::new(required.domain, TOKEN_WILDCARD))
    }
}

// ---------------------------------------------------------------------------
// Rules stored on pages
// ---------------------------------------------------------------------------

/// A rule as stored on a page row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRule {
    Public,
    Inherit,
    Token(String),
}

impl PermissionRule {
    /// Parse a stored or user-supplied rule string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            RULE_PUBLIC => Ok(PermissionRule::Public),
            RULE_INHERIT => Ok(PermissionRule::Inherit),
            token => {
                validate_token(token)?;
                Ok(PermissionRule::Token(token.to_string()))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PermissionRule::Public => RULE_PUBLIC,
            PermissionRule::Inherit => RULE_INHERIT,
            PermissionRule::Token(t) => t,
        }
    }

    /// The explicit rule this stands for, or `None` when it inherits.
    pub fn explicit(&self) -> Option<EffectiveRule> {
        match self {
            PermissionRule::Public => Some(EffectiveRule::Public),
            PermissionRule::Inherit => None,
            PermissionRule::Token(t) => Some(EffectiveRule::Token(t.clone())),
        }
    }
}

impl Serialize for PermissionRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermissionRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PermissionRule::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Validate a named token: 1..=64 chars of ASCII alphanumerics, `_` or `-`.
pub fn validate_token(token: &str) -> Result<(), CoreError> {
    if token.is_empty() || token.len() > MAX_TOKEN_LEN {
        return Err(CoreError::Validation(format!(
            "Permission token must be 1 to {MAX_TOKEN_LEN} characters"
        )));
    }
    if token == RULE_INHERIT {
        return Err(CoreError::Validation(
            "'inherit' is not a permission token".into(),
        ));
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Permission token '{token}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

/// The outcome of resolution: never `inherit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveRule {
    Public,
    Token(String),
}

impl EffectiveRule {
    pub fn as_str(&self) -> &str {
        match self {
            EffectiveRule::Public => RULE_PUBLIC,
            EffectiveRule::Token(t) => t,
        }
    }

    /// Whether a caller satisfies this rule for the given action.
    pub fn allows(&self, action: Action, checker: &impl PermissionChecker) -> bool {
        match self {
            EffectiveRule::Public => true,
            EffectiveRule::Token(t) => checker.has_perm(&Permission::new(action.into(), t.clone())),
        }
    }
}

impl Serialize for EffectiveRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The pair of rules stored on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRules {
    pub view_rule: PermissionRule,
    pub modify_rule: PermissionRule,
}

impl PageRules {
    pub fn rule_for(&self, action: Action) -> &PermissionRule {
        match action {
            Action::View => &self.view_rule,
            Action::Modify => &self.modify_rule,
        }
    }
}

/// Effective rules for both actions on one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPermissions {
    pub view: EffectiveRule,
    pub modify: EffectiveRule,
}

/// Sorted path → rules index used for longest-prefix resolution.
///
/// Pages that are not ancestors of a queried path are simply never looked
/// up, so one index can serve many queries (e.g. a page of search results).
#[derive(Debug, Clone, Default)]
pub struct PermissionIndex {
    rules: BTreeMap<String, PageRules>,
}

impl PermissionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, rules: PageRules) {
        self.rules.insert(path.into(), rules);
    }

    /// Resolve the effective rule for `path` (normalized) and `action`.
    pub fn resolve(&self, path: &str, action: Action) -> EffectiveRule {
        ancestor_paths(path)
            .iter()
            .filter_map(|p| self.rules.get(p))
            .find_map(|r| r.rule_for(action).explicit())
            .unwrap_or(EffectiveRule::Public)
    }

    pub fn resolve_both(&self, path: &str) -> ResolvedPermissions {
        ResolvedPermissions {
            view: self.resolve(path, Action::View),
            modify: self.resolve(path, Action::Modify),
        }
    }
}

impl<P: Into<String>> FromIterator<(P, PageRules)> for PermissionIndex {
    fn from_iter<I: IntoIterator<Item = (P, PageRules)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (path, rules) in iter {
            index.insert(path, rules);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(view: &str, modify: &str) -> PageRules {
        PageRules {
            view_rule: PermissionRule::parse(view).unwrap(),
            modify_rule: PermissionRule::parse(modify).unwrap(),
        }
    }

    fn example_index() -> PermissionIndex {
        [
            ("/", rules("*", "editor")),
            ("/docs", rules("inherit", "inherit")),
            ("/docs/secret", rules("sec", "inherit")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn inherit_defers_to_nearest_explicit_ancestor() {
        let index = example_index();
        assert_eq!(index.resolve("/docs", Action::View), EffectiveRule::Public);
        assert_eq!(
            index.resolve("/docs/secret/sub", Action::View),
            EffectiveRule::Token("sec".into())
        );
        assert_eq!(
            index.resolve("/docs/secret", Action::Modify),
            EffectiveRule::Token("editor".into())
        );
    }

    #[test]
    fn all_inherit_defaults_to_public() {
        let index: PermissionIndex = [
            ("/a", rules("inherit", "inherit")),
            ("/a/b", rules("inherit", "inherit")),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.resolve("/a/b/c", Action::View), EffectiveRule::Public);
        assert_eq!(
            PermissionIndex::new().resolve("/anything", Action::Modify),
            EffectiveRule::Public
        );
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let index: PermissionIndex = [("/normal", rules("staff", "staff"))].into_iter().collect();
        assert_eq!(
            index.resolve("/normal-user", Action::View),
            EffectiveRule::Public
        );
        assert_eq!(
            index.resolve("/normal/user", Action::View),
            EffectiveRule::Token("staff".into())
        );
    }

    #[test]
    fn self_rule_wins_over_ancestor() {
        let index: PermissionIndex = [
            ("/", rules("root", "root")),
            ("/a", rules("*", "inherit")),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.resolve("/a", Action::View), EffectiveRule::Public);
        assert_eq!(
            index.resolve("/a", Action::Modify),
            EffectiveRule::Token("root".into())
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let index = example_index();
        let first = index.resolve_both("/docs/secret/x");
        let second = index.resolve_both("/docs/secret/x");
        assert_eq!(first, second);
    }

    #[test]
    fn rule_parse_roundtrips_stored_values() {
        assert_eq!(PermissionRule::parse("*").unwrap(), PermissionRule::Public);
        assert_eq!(
            PermissionRule::parse("inherit").unwrap(),
            PermissionRule::Inherit
        );
        assert_eq!(PermissionRule::parse("special").unwrap().as_str(), "special");
        assert!(PermissionRule::parse("").is_err());
        assert!(PermissionRule::parse("has space").is_err());
        assert!(PermissionRule::parse("a/b").is_err());
    }

    #[test]
    fn public_rule_passes_anonymous() {
        let anon = PermissionSet::anonymous();
        assert!(EffectiveRule::Public.allows(Action::Modify, &anon));
        assert!(!EffectiveRule::Token("sec".into()).allows(Action::View, &anon));
    }

    #[test]
    fn token_rule_checks_matching_domain() {
        let (set, rejected) = PermissionSet::from_claims(&["wikiView/sec", "wikiModify/docs"]);
        assert!(rejected.is_empty());
        let sec = EffectiveRule::Token("sec".into());
        assert!(sec.allows(Action::View, &set));
        assert!(!sec.allows(Action::Modify, &set));
    }

    #[test]
    fn domain_wildcard_covers_every_token() {
        let (set, _) = PermissionSet::from_claims(&["wikiModify/*"]);
        assert!(EffectiveRule::Token("anything".into()).allows(Action::Modify, &set));
        assert!(!EffectiveRule::Token("anything".into()).allows(Action::View, &set));
    }

    #[test]
    fn required_wildcard_always_passes() {
        let anon = PermissionSet::anonymous();
        assert!(anon.has_perm(&Permission::new(PermissionDomain::Admin, "*")));
    }

    #[test]
    fn malformed_claims_are_rejected() {
        let (set, rejected) =
            PermissionSet::from_claims(&["wikiView", "other/x", "wikiView/bad token", "wikiAdmin/purge"]);
        assert_eq!(rejected.len(), 3);
        assert!(set.has_perm(&Permission::new(PermissionDomain::Admin, "purge")));
    }

    #[test]
    fn permission_display_uses_domain_slash_token() {
        let p = Permission::new(PermissionDomain::View, "special");
        assert_eq!(p.to_string(), "wikiView/special");
        assert_eq!(Permission::parse("wikiView/special"), Some(p));
    }
}
