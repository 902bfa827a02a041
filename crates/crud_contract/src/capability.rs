//! Explicit capability model for permission-gated UI.
//!
//! The backend ships permission names such as `manage-any-cases` or `view-own-clients`. They are
//! parsed once into [`Capability`] values; gating decisions only look at the parsed action,
//! resource, and scope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DescriptorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Operation a capability grants.
pub enum CapabilityAction {
    /// Read rows.
    View,
    /// Create rows.
    Create,
    /// Update rows.
    Edit,
    /// Delete rows.
    Delete,
    /// Export rows.
    Export,
    /// Every operation on the resource.
    Manage,
}

impl CapabilityAction {
    /// Permission-name token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Manage => "manage",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "view" | "read" => Some(Self::View),
            "create" => Some(Self::Create),
            "edit" | "update" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            "export" => Some(Self::Export),
            "manage" => Some(Self::Manage),
            _ => None,
        }
    }

    /// Returns `true` when a grant of `self` covers `required`.
    pub fn covers(self, required: Self) -> bool {
        self == Self::Manage || self == required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Which rows a capability reaches.
pub enum CapabilityScope {
    /// Every row.
    Any,
    /// Rows owned by the viewer.
    Own,
    /// No rows.
    None,
}

impl CapabilityScope {
    /// Permission-name token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Own => "own",
            Self::None => "none",
        }
    }

    /// Returns `true` when the scope reaches a row with the given ownership.
    ///
    /// `Own` reaches owned rows and page-level checks; a row whose owner cannot be read is not
    /// reached.
    pub fn reaches(self, ownership: Ownership) -> bool {
        match self {
            Self::Any => true,
            Self::Own => matches!(ownership, Ownership::Owned | Ownership::NoRow),
            Self::None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Relationship between the viewer and the row being gated.
pub enum Ownership {
    /// The viewer owns the row.
    Owned,
    /// Someone else owns the row.
    NotOwned,
    /// A row is in context but its owner is not tracked or not readable.
    Unknown,
    /// No row in context (page-level buttons such as create).
    NoRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// One granted or required capability.
pub struct Capability {
    /// Operation.
    pub action: CapabilityAction,
    /// Resource slug (`cases`, `case-types`).
    pub resource: String,
    /// Row reach.
    pub scope: CapabilityScope,
}

impl Capability {
    /// Creates a capability with [`CapabilityScope::Any`].
    pub fn new(action: CapabilityAction, resource: impl Into<String>) -> Self {
        Self {
            action,
            resource: resource.into(),
            scope: CapabilityScope::Any,
        }
    }

    /// Replaces the scope.
    pub fn scoped(mut self, scope: CapabilityScope) -> Self {
        self.scope = scope;
        self
    }

    /// Parses `action[-scope]-resource` permission names.
    ///
    /// A missing scope means [`CapabilityScope::Any`].
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::InvalidPermission`] for unknown actions or missing resources.
    pub fn parse(raw: &str) -> Result<Self, DescriptorError> {
        let invalid = || DescriptorError::InvalidPermission(raw.to_string());
        let (action, rest) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let action = CapabilityAction::parse(action).ok_or_else(invalid)?;
        let (scope, resource) = match rest.split_once('-') {
            Some(("any", resource)) => (CapabilityScope::Any, resource),
            Some(("own", resource)) => (CapabilityScope::Own, resource),
            Some(("none", resource)) => (CapabilityScope::None, resource),
            _ => (CapabilityScope::Any, rest),
        };
        if resource.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            action,
            resource: resource.to_string(),
            scope,
        })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.action.token(),
            self.scope.token(),
            self.resource
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Capabilities granted to the current viewer.
pub struct PermissionSet {
    grants: Vec<Capability>,
}

impl PermissionSet {
    /// Builds a set from parsed capabilities.
    pub fn new(grants: Vec<Capability>) -> Self {
        Self { grants }
    }

    /// Parses backend permission names, returning the set and the names that did not parse.
    pub fn from_names<I, S>(names: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut grants = Vec::new();
        let mut rejected = Vec::new();
        for name in names {
            match Capability::parse(name.as_ref()) {
                Ok(capability) => grants.push(capability),
                Err(_) => rejected.push(name.as_ref().to_string()),
            }
        }
        (Self { grants }, rejected)
    }

    /// Returns `true` when some grant covers `required` for a row of the given ownership.
    ///
    /// The scope carried by `required` is ignored; only grant scopes matter.
    pub fn allows(&self, required: &Capability, ownership: Ownership) -> bool {
        self.grants.iter().any(|grant| {
            grant.resource == required.resource
                && grant.action.covers(required.action)
                && grant.scope.reaches(ownership)
        })
    }

    /// Widest scope granted for `action` on `resource`.
    pub fn scope_for(&self, action: CapabilityAction, resource: &str) -> CapabilityScope {
        self.grants
            .iter()
            .filter(|grant| grant.resource == resource && grant.action.covers(action))
            .map(|grant| grant.scope)
            .min()
            .unwrap_or(CapabilityScope::None)
    }

    /// Iterates grants.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.grants.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_scoped_and_unscoped_names() {
        assert_eq!(
            Capability::parse("manage-any-case-types").unwrap(),
            Capability::new(CapabilityAction::Manage, "case-types")
        );
        assert_eq!(
            Capability::parse("view-own-clients").unwrap(),
            Capability::new(CapabilityAction::View, "clients").scoped(CapabilityScope::Own)
        );
        assert_eq!(
            Capability::parse("manage-cases").unwrap().scope,
            CapabilityScope::Any
        );
        assert!(Capability::parse("approve-cases").is_err());
        assert!(Capability::parse("manage").is_err());
        assert!(Capability::parse("manage-any-").is_err());
    }

    #[test]
    fn manage_grant_covers_specific_actions_within_scope() {
        let (set, rejected) =
            PermissionSet::from_names(["manage-own-cases", "view-any-clients", "bogus"]);
        assert_eq!(rejected, vec!["bogus".to_string()]);

        let edit_case = Capability::new(CapabilityAction::Edit, "cases");
        assert!(set.allows(&edit_case, Ownership::Owned));
        assert!(set.allows(&edit_case, Ownership::NoRow));
        assert!(!set.allows(&edit_case, Ownership::NotOwned));
        assert!(!set.allows(&edit_case, Ownership::Unknown));

        let delete_client = Capability::new(CapabilityAction::Delete, "clients");
        assert!(!set.allows(&delete_client, Ownership::Owned));
        let view_client = Capability::new(CapabilityAction::View, "clients");
        assert!(set.allows(&view_client, Ownership::Unknown));
        assert_eq!(
            set.scope_for(CapabilityAction::View, "clients"),
            CapabilityScope::Any
        );
        assert_eq!(
            set.scope_for(CapabilityAction::Delete, "hearings"),
            CapabilityScope::None
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let capability =
            Capability::new(CapabilityAction::Delete, "tasks").scoped(CapabilityScope::Own);
        assert_eq!(capability.to_string(), "delete-own-tasks");
        assert_eq!(Capability::parse(&capability.to_string()).unwrap(), capability);
    }
}
