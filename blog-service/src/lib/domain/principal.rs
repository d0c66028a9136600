use crate::domain::authentication::models::AuthenticationId;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// The authenticated caller of a request.
///
/// Built from a verified access token and passed explicitly into service
/// calls that depend on who is acting.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub auth_id: AuthenticationId,
    pub user_id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }
}
