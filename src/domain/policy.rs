//! Access policy
//!
//! Decides, given a caller's role, which operations are permitted. The
//! services only ever ask `is_staff`; how the role was established (JWT,
//! anonymous request) is the auth boundary's business.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// May manage items and close loans
    Staff,
    /// May browse and submit borrow requests
    Guest,
}

/// Who is making the request.
#[derive(Clone, Debug)]
pub struct Caller {
    pub username: Option<String>,
    pub role: Role,
}

impl Caller {
    pub fn staff(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            role: Role::Staff,
        }
    }

    pub fn guest() -> Self {
        Self {
            username: None,
            role: Role::Guest,
        }
    }
}

pub trait AccessPolicy: Send + Sync {
    fn is_staff(&self, caller: &Caller) -> bool;
}

/// Default policy: the staff capability comes straight from the caller's role.
pub struct RolePolicy;

impl AccessPolicy for RolePolicy {
    fn is_staff(&self, caller: &Caller) -> bool {
        caller.role == Role::Staff
    }
}
