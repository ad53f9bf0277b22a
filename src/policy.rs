//! Authorization decisions for user and cat operations.
//!
//! Every mutating operation asks [`decide`] before touching the store.
//! Each [`Action`] maps to exactly one [`Rule`]; the rule alone decides.

use std::fmt;

use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    UpdateOwn,
    DeleteOwn,
    /// Admin deletion of any record.
    DeleteAny,
    /// Replace a cat's owner snapshot.
    ReassignOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Public,
    OwnerOnly,
    AdminOnly,
    AdminOrOwner,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Read,
        Action::UpdateOwn,
        Action::DeleteOwn,
        Action::DeleteAny,
        Action::ReassignOwner,
    ];

    /// The rule table. `DeleteAny` and `ReassignOwner` are both admin-gated but
    /// admit different actors, so they keep separate rules.
    pub const fn rule(self) -> Rule {
        match self {
            Action::Read => Rule::Public,
            Action::UpdateOwn | Action::DeleteOwn => Rule::OwnerOnly,
            Action::DeleteAny => Rule::AdminOnly,
            Action::ReassignOwner => Rule::AdminOrOwner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    AdminRequired,
    OwnerRequired,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::AdminRequired => f.write_str("admin required"),
            DenyReason::OwnerRequired => f.write_str("owner required"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decide whether `actor_id` with `actor_role` may perform `action` on a
/// resource owned by `owner_id`. For a user record the owner is the user
/// itself.
pub fn decide(actor_id: Uuid, actor_role: Role, owner_id: Uuid, action: Action) -> Decision {
    let is_admin = actor_role == Role::Admin;
    let is_owner = actor_id == owner_id;

    match action.rule() {
        Rule::Public => Decision::Allow,
        Rule::OwnerOnly if is_owner => Decision::Allow,
        Rule::OwnerOnly => Decision::Deny(DenyReason::OwnerRequired),
        Rule::AdminOnly if is_admin => Decision::Allow,
        Rule::AdminOnly => Decision::Deny(DenyReason::AdminRequired),
        Rule::AdminOrOwner if is_admin || is_owner => Decision::Allow,
        Rule::AdminOrOwner => Decision::Deny(DenyReason::AdminRequired),
    }
}
