//! Declarative method/path/role access-control matrix.
//!
//! The matrix is an ordered list of rules supplied at startup and consulted
//! once per request, before any handler executes. Rule precedence:
//!
//! 1. an exact literal path beats any wildcard pattern;
//! 2. among wildcard patterns, the longest prefix beats shorter ones;
//! 3. at equal specificity, a method-specific rule beats an any-method rule;
//! 4. remaining ties go to the first-declared rule.
//!
//! A request matching no rule resolves to [`Requirement::Authenticated`],
//! so a path nobody thought to declare is never silently public.

use http::Method;

use crate::identity::Role;

/// What a route demands from a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Anyone may call, with or without a credential.
    Public,
    /// A verified identity must be present; any role will do.
    Authenticated,
    /// A verified identity whose role satisfies the set must be present.
    Roles(Vec<Role>),
}

#[derive(Debug, Clone, PartialEq)]
enum PathPattern {
    Exact(String),
    /// Parsed from a `"/prefix/**"` pattern; matches the prefix itself and
    /// every path under it.
    Prefix(String),
}

impl PathPattern {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => {
                path == prefix || (path.starts_with(prefix) && path[prefix.len()..].starts_with('/'))
            }
        }
    }
}

/// One row of the access-control table.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRule {
    method: Option<Method>,
    pattern: PathPattern,
    requirement: Requirement,
}

impl AccessRule {
    pub fn new(method: Option<Method>, pattern: &str, requirement: Requirement) -> Self {
        Self {
            method,
            pattern: PathPattern::parse(pattern),
            requirement,
        }
    }

    pub fn public(pattern: &str) -> Self {
        Self::new(None, pattern, Requirement::Public)
    }

    pub fn public_for(method: Method, pattern: &str) -> Self {
        Self::new(Some(method), pattern, Requirement::Public)
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self::new(None, pattern, Requirement::Authenticated)
    }

    pub fn authenticated_for(method: Method, pattern: &str) -> Self {
        Self::new(Some(method), pattern, Requirement::Authenticated)
    }

    pub fn roles(pattern: &str, roles: Vec<Role>) -> Self {
        Self::new(None, pattern, Requirement::Roles(roles))
    }

    pub fn roles_for(method: Method, pattern: &str, roles: Vec<Role>) -> Self {
        Self::new(Some(method), pattern, Requirement::Roles(roles))
    }

    /// Specificity key for precedence; `None` when the rule does not match.
    ///
    /// Tuple ordering gives exact > longer prefix > method-specific.
    fn match_key(&self, method: &Method, path: &str) -> Option<(bool, usize, bool)> {
        if let Some(required_method) = &self.method
            && required_method != method
        {
            return None;
        }

        if !self.pattern.matches(path) {
            return None;
        }

        let (exact, specificity) = match &self.pattern {
            PathPattern::Exact(p) => (true, p.len()),
            PathPattern::Prefix(p) => (false, p.len()),
        };

        Some((exact, specificity, self.method.is_some()))
    }
}

/// Process-wide, read-only after construction.
#[derive(Debug, Clone)]
pub struct AccessMatrix {
    rules: Vec<AccessRule>,
}

impl AccessMatrix {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Resolves the requirement for a concrete request line.
    ///
    /// Fail-closed: no matching rule means the caller must be authenticated.
    pub fn resolve(&self, method: &Method, path: &str) -> Requirement {
        let mut best: Option<((bool, usize, bool), &AccessRule)> = None;

        for rule in &self.rules {
            let Some(key) = rule.match_key(method, path) else {
                continue;
            };

            // Strictly greater, so the first-declared rule wins ties.
            if best.as_ref().is_none_or(|(best_key, _)| key > *best_key) {
                best = Some((key, rule));
            }
        }

        best.map(|(_, rule)| rule.requirement.clone())
            .unwrap_or(Requirement::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> AccessMatrix {
        AccessMatrix::new(vec![
            AccessRule::public("/health"),
            AccessRule::public("/api/auth/login"),
            AccessRule::public_for(Method::GET, "/api/programs/**"),
            AccessRule::authenticated_for(Method::POST, "/api/programs/**"),
            AccessRule::authenticated("/api/my/**"),
            AccessRule::roles(
                "/api/instructor/**",
                vec![Role::Instructor, Role::Admin],
            ),
            AccessRule::roles("/api/users/**", vec![Role::Admin]),
        ])
    }

    #[test]
    fn test_exact_literal_match() {
        assert_eq!(
            matrix().resolve(&Method::GET, "/health"),
            Requirement::Public
        );
        assert_eq!(
            matrix().resolve(&Method::POST, "/api/auth/login"),
            Requirement::Public
        );
    }

    #[test]
    fn test_prefix_matches_root_and_subpaths() {
        let m = matrix();
        assert_eq!(m.resolve(&Method::GET, "/api/programs"), Requirement::Public);
        assert_eq!(
            m.resolve(&Method::GET, "/api/programs/7"),
            Requirement::Public
        );
        assert_eq!(
            m.resolve(&Method::GET, "/api/programs/7/reviews"),
            Requirement::Public
        );
    }

    #[test]
    fn test_prefix_does_not_match_sibling_paths() {
        // "/api/programs-extra" shares the string prefix but not the segment
        assert_eq!(
            matrix().resolve(&Method::GET, "/api/programs-extra"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn test_per_method_override_on_identical_prefix() {
        let m = matrix();
        assert_eq!(
            m.resolve(&Method::GET, "/api/programs/7/reviews"),
            Requirement::Public
        );
        assert_eq!(
            m.resolve(&Method::POST, "/api/programs/7/reviews"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn test_method_rules_do_not_leak_to_other_methods() {
        // Neither the GET nor the POST rule covers DELETE; fail closed.
        assert_eq!(
            matrix().resolve(&Method::DELETE, "/api/programs/7"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn test_role_set_rules() {
        let m = matrix();
        assert_eq!(
            m.resolve(&Method::POST, "/api/instructor/programs"),
            Requirement::Roles(vec![Role::Instructor, Role::Admin])
        );
        assert_eq!(
            m.resolve(&Method::GET, "/api/users/3"),
            Requirement::Roles(vec![Role::Admin])
        );
    }

    #[test]
    fn test_unmatched_path_defaults_to_authenticated() {
        let m = matrix();
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert_eq!(
                m.resolve(&method, "/api/does-not-exist"),
                Requirement::Authenticated,
                "default must be fail-closed for {method}",
            );
        }
        assert_eq!(m.resolve(&Method::GET, "/"), Requirement::Authenticated);
    }

    #[test]
    fn test_exact_literal_beats_wildcard() {
        let m = AccessMatrix::new(vec![
            AccessRule::roles("/api/admin/**", vec![Role::Admin]),
            AccessRule::public("/api/admin/status"),
        ]);
        assert_eq!(
            m.resolve(&Method::GET, "/api/admin/status"),
            Requirement::Public
        );
        assert_eq!(
            m.resolve(&Method::GET, "/api/admin/users"),
            Requirement::Roles(vec![Role::Admin])
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let m = AccessMatrix::new(vec![
            AccessRule::public("/api/**"),
            AccessRule::roles("/api/admin/**", vec![Role::Admin]),
        ]);
        assert_eq!(
            m.resolve(&Method::GET, "/api/admin/tools"),
            Requirement::Roles(vec![Role::Admin])
        );
        assert_eq!(m.resolve(&Method::GET, "/api/other"), Requirement::Public);
    }

    #[test]
    fn test_declaration_order_breaks_exact_ties() {
        let m = AccessMatrix::new(vec![
            AccessRule::public("/api/thing"),
            AccessRule::authenticated("/api/thing"),
        ]);
        assert_eq!(m.resolve(&Method::GET, "/api/thing"), Requirement::Public);
    }

    #[test]
    fn test_catch_all_prefix() {
        let m = AccessMatrix::new(vec![AccessRule::public("/**")]);
        assert_eq!(m.resolve(&Method::GET, "/anything"), Requirement::Public);
        assert_eq!(m.resolve(&Method::GET, "/a/b/c"), Requirement::Public);
    }
}
