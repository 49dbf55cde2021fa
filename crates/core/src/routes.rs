//! Declarative route-to-access table.
//!
//! Every screen's access requirement lives in one [`RouteTable`] instead of being re-checked by
//! each screen. Patterns are `/`-separated segments:
//! - a literal segment matches itself,
//! - `:name` matches any single segment,
//! - a trailing `*` matches the remainder of the path, including nothing.
//!
//! When several patterns match, the most specific wins: more literal segments first, then a
//! pattern without `*` over one with it, then declaration order.
//!
//! Tables can be loaded from YAML:
//!
//! ```yaml
//! routes:
//!   - pattern: /auth/login
//!     access: public
//!   - pattern: /profile
//!     access: authenticated
//!   - pattern: /dashboard/users/*
//!     access: [admin, member]
//! ```

use crate::role::{Role, RoleSet};
use crate::{PortalError, PortalResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in visitor, whatever their role.
    Authenticated,
    /// Signed-in visitors whose role is in the set.
    Roles(RoleSet),
}

impl Serialize for Access {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Access::Public => serializer.serialize_str("public"),
            Access::Authenticated => serializer.serialize_str("authenticated"),
            Access::Roles(roles) => roles.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAccess {
            Keyword(String),
            Roles(Vec<Role>),
        }

        match RawAccess::deserialize(deserializer)? {
            RawAccess::Keyword(keyword) => match keyword.as_str() {
                "public" => Ok(Access::Public),
                "authenticated" => Ok(Access::Authenticated),
                other => Err(serde::de::Error::custom(format!(
                    "access must be 'public', 'authenticated' or a list of roles, got '{other}'"
                ))),
            },
            RawAccess::Roles(roles) => Ok(Access::Roles(roles.into_iter().collect())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    Rest,
}

/// A parsed route pattern such as `/dashboard/appointments/:id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the pattern does not start with `/`, contains an
    /// empty `:` parameter name, or uses `*` anywhere but the last segment.
    pub fn parse(raw: &str) -> PortalResult<Self> {
        if !raw.starts_with('/') {
            return Err(PortalError::InvalidInput(format!(
                "route pattern must start with '/': '{raw}'"
            )));
        }

        let parts: Vec<&str> = split_segments(raw).collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let segment = if *part == "*" {
                if index + 1 != parts.len() {
                    return Err(PortalError::InvalidInput(format!(
                        "'*' must be the last segment of a route pattern: '{raw}'"
                    )));
                }
                Segment::Rest
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PortalError::InvalidInput(format!(
                        "route parameter needs a name: '{raw}'"
                    )));
                }
                Segment::Param
            } else {
                Segment::Literal((*part).to_owned())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn matches(&self, path: &[&str]) -> bool {
        let mut remaining = path.iter();
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if remaining.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if remaining.next() != Some(&literal.as_str()) {
                        return false;
                    }
                }
            }
        }
        remaining.next().is_none()
    }

    /// Ordering key for "most specific wins".
    fn specificity(&self) -> (usize, bool) {
        let literals = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();
        let exact = !self.segments.contains(&Segment::Rest);
        (literals, exact)
    }
}

impl Serialize for RoutePattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RoutePattern::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub pattern: RoutePattern,
    pub access: Access,
}

impl RouteRule {
    pub fn new(pattern: &str, access: Access) -> PortalResult<Self> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            access,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<RouteRule>,
}

impl RouteTable {
    /// Build a table from rules.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::RouteTableInvalid`] if two rules share a pattern or a rule admits an
    /// empty set of roles.
    pub fn from_rules(routes: Vec<RouteRule>) -> PortalResult<Self> {
        for (index, rule) in routes.iter().enumerate() {
            if let Access::Roles(roles) = rule.access {
                if roles.is_empty() {
                    return Err(PortalError::RouteTableInvalid(format!(
                        "route '{}' admits no roles",
                        rule.pattern.as_str()
                    )));
                }
            }
            if routes[..index].iter().any(|r| r.pattern == rule.pattern) {
                return Err(PortalError::RouteTableInvalid(format!(
                    "duplicate route pattern '{}'",
                    rule.pattern.as_str()
                )));
            }
        }
        Ok(Self { routes })
    }

    /// Parse a YAML route table, reporting the failing field path on schema errors.
    pub fn from_yaml_str(yaml_text: &str) -> PortalResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let parsed: RouteTable = match serde_path_to_error::deserialize(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_owned()
                } else {
                    path
                };
                return Err(PortalError::RouteTableSchema {
                    path,
                    message: err.into_inner().to_string(),
                });
            }
        };
        Self::from_rules(parsed.routes)
    }

    pub fn from_yaml_file(path: &Path) -> PortalResult<Self> {
        let yaml_text = std::fs::read_to_string(path).map_err(PortalError::RouteTableRead)?;
        Self::from_yaml_str(&yaml_text)
    }

    pub fn to_yaml(&self) -> PortalResult<String> {
        serde_yaml::to_string(self).map_err(|e| PortalError::RouteTableInvalid(e.to_string()))
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.routes
    }

    /// Find the most specific rule for `path`. Query strings, fragments and trailing slashes are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::UnknownRoute`] when no rule matches.
    pub fn lookup(&self, path: &str) -> PortalResult<&RouteRule> {
        let segments: Vec<&str> = split_segments(strip_query(path)).collect();

        let mut best: Option<&RouteRule> = None;
        for rule in self.routes.iter().filter(|r| r.pattern.matches(&segments)) {
            match best {
                Some(current) if current.pattern.specificity() >= rule.pattern.specificity() => {}
                _ => best = Some(rule),
            }
        }
        best.ok_or_else(|| PortalError::UnknownRoute(path.to_owned()))
    }
}

impl Default for RouteTable {
    /// The portal's built-in screens and who may see them.
    fn default() -> Self {
        use Role::*;

        let admin_member = Access::Roles(RoleSet::of(&[Admin, Member]));
        let staff = Access::Roles(RoleSet::of(&[Admin, Member, Recp, Doctor]));
        let everyone = Access::Roles(RoleSet::all());
        let front_desk = Access::Roles(RoleSet::of(&[Admin, Recp]));

        let table: [(&str, Access); 26] = [
            ("/", Access::Public),
            ("/auth/login", Access::Public),
            ("/auth/register", Access::Public),
            ("/auth/forgot-password", Access::Public),
            ("/auth/reset-password", Access::Public),
            ("/auth/verify-otp", Access::Public),
            ("/profile", Access::Authenticated),
            ("/dashboard", Access::Authenticated),
            ("/dashboard/users", admin_member),
            ("/dashboard/users/*", admin_member),
            ("/dashboard/users/export", Access::Roles(RoleSet::of(&[Admin]))),
            ("/dashboard/doctors", admin_member),
            ("/dashboard/doctors/*", admin_member),
            ("/dashboard/website", admin_member),
            ("/dashboard/website/*", admin_member),
            ("/dashboard/tests", staff),
            ("/dashboard/tests/*", staff),
            ("/dashboard/mer", staff),
            ("/dashboard/mer/*", staff),
            ("/dashboard/reports", everyone),
            ("/dashboard/reports/*", everyone),
            ("/dashboard/appointments", everyone),
            ("/dashboard/appointments/:id", everyone),
            ("/dashboard/appointments/new", everyone),
            ("/dashboard/appointments/existing-user", front_desk),
            ("/dashboard/appointments/new-user", front_desk),
        ];

        let routes = table
            .into_iter()
            .filter_map(|(pattern, access)| RouteRule::new(pattern, access).ok())
            .collect();
        Self { routes }
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_for(table: &RouteTable, path: &str) -> Access {
        table.lookup(path).unwrap().access
    }

    #[test]
    fn default_table_patterns_all_parse() {
        assert_eq!(RouteTable::default().rules().len(), 26);
    }

    #[test]
    fn public_routes() {
        let table = RouteTable::default();
        for path in [
            "/",
            "/auth/login",
            "/auth/register",
            "/auth/forgot-password",
            "/auth/reset-password",
        ] {
            assert_eq!(access_for(&table, path), Access::Public, "{path}");
        }
    }

    #[test]
    fn literal_beats_wildcard() {
        let table = RouteTable::default();
        assert_eq!(
            access_for(&table, "/dashboard/users/export"),
            Access::Roles(RoleSet::of(&[Role::Admin]))
        );
        assert_eq!(
            access_for(&table, "/dashboard/users/64f1c/edit"),
            Access::Roles(RoleSet::of(&[Role::Admin, Role::Member]))
        );
    }

    #[test]
    fn literal_beats_param() {
        let table = RouteTable::default();
        assert_eq!(
            access_for(&table, "/dashboard/appointments/new-user"),
            Access::Roles(RoleSet::of(&[Role::Admin, Role::Recp]))
        );
        assert_eq!(
            access_for(&table, "/dashboard/appointments/8812"),
            Access::Roles(RoleSet::all())
        );
    }

    #[test]
    fn query_fragment_and_trailing_slash_are_ignored() {
        let table = RouteTable::default();
        assert_eq!(access_for(&table, "/profile/?tab=security#top"), Access::Authenticated);
    }

    #[test]
    fn unknown_route_is_an_error() {
        let err = RouteTable::default().lookup("/billing").unwrap_err();
        assert!(matches!(err, PortalError::UnknownRoute(p) if p == "/billing"));
    }

    #[test]
    fn param_does_not_match_missing_segment() {
        let table =
            RouteTable::from_rules(vec![RouteRule::new("/a/:id", Access::Public).unwrap()]).unwrap();
        assert!(table.lookup("/a").is_err());
        assert!(table.lookup("/a/1/2").is_err());
        assert!(table.lookup("/a/1").is_ok());
    }

    #[test]
    fn wildcard_matches_empty_remainder() {
        let table =
            RouteTable::from_rules(vec![RouteRule::new("/docs/*", Access::Public).unwrap()]).unwrap();
        assert!(table.lookup("/docs").is_ok());
        assert!(table.lookup("/docs/a/b/c").is_ok());
    }

    #[test]
    fn pattern_validation() {
        assert!(RoutePattern::parse("dashboard").is_err());
        assert!(RoutePattern::parse("/a/*/b").is_err());
        assert!(RoutePattern::parse("/a/:").is_err());
    }

    #[test]
    fn yaml_table_loads() {
        let yaml = r#"
routes:
  - pattern: /
    access: public
  - pattern: /profile
    access: authenticated
  - pattern: /dashboard/labs/*
    access: [doctor, member]
"#;
        let table = RouteTable::from_yaml_str(yaml).unwrap();
        assert_eq!(
            access_for(&table, "/dashboard/labs/cbc"),
            Access::Roles(RoleSet::of(&[Role::Doctor, Role::Member]))
        );
    }

    #[test]
    fn yaml_schema_errors_carry_path() {
        let yaml = r#"
routes:
  - pattern: /
    access: public
  - pattern: /x
    access: [admin, owner]
"#;
        let err = RouteTable::from_yaml_str(yaml).unwrap_err();
        match err {
            PortalError::RouteTableSchema { path, .. } => assert!(path.starts_with("routes[1]")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn yaml_rejects_duplicates_and_empty_role_lists() {
        let duplicate = "routes:\n  - {pattern: /a, access: public}\n  - {pattern: /a, access: authenticated}\n";
        assert!(matches!(
            RouteTable::from_yaml_str(duplicate),
            Err(PortalError::RouteTableInvalid(_))
        ));

        let empty = "routes:\n  - {pattern: /a, access: []}\n";
        assert!(matches!(
            RouteTable::from_yaml_str(empty),
            Err(PortalError::RouteTableInvalid(_))
        ));
    }

    #[test]
    fn default_table_survives_yaml_round_trip() {
        let table = RouteTable::default();
        let yaml = table.to_yaml().unwrap();
        assert_eq!(RouteTable::from_yaml_str(&yaml).unwrap(), table);
    }
}
