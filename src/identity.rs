//! Identity collaborator contract.

/// The signed-in user and the groups they belong to. Both ids are opaque
/// strings owned by the auth and membership collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub group_ids: Vec<String>,
}

/// Supplies the current user, or `None` when signed out.
///
/// Callers must re-check on every use: the user can sign out between a
/// page load and a later poll tick.
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<UserContext>;
}
