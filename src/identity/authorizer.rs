use crate::error::{AppError, AppResult};
use crate::model::User;

/// Gate for admin-only routes. Anonymous callers get the same 403 as
/// residents do.
pub fn require_admin(user: Option<User>) -> AppResult<User> {
    match user {
        Some(u) if u.is_admin() => Ok(u),
        _ => Err(AppError::admin_required()),
    }
}

/// Records a user may act on: their own, or anything for an admin.
pub fn ensure_owner_or_admin(user: &User, owner_id: &str) -> AppResult<()> {
    if user.user_id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("not_authorized", "Not authorized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::Utc;

    fn user(id: &str, role: Role) -> User {
        User {
            user_id: id.into(),
            email: format!("{id}@example.com"),
            name: id.into(),
            picture: None,
            phone: None,
            address: None,
            role,
            firebase_tenant_id: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn admin_gate() {
        assert!(require_admin(Some(user("a", Role::Admin))).is_ok());
        assert_eq!(require_admin(Some(user("r", Role::Resident))).unwrap_err().http_status(), 403);
        assert_eq!(require_admin(Some(user("s", Role::Staff))).unwrap_err().http_status(), 403);
        assert_eq!(require_admin(None).unwrap_err().http_status(), 403);
    }

    #[test]
    fn ownership_gate() {
        let owner = user("u1", Role::Resident);
        let other = user("u2", Role::Resident);
        let admin = user("adm", Role::Admin);
        assert!(ensure_owner_or_admin(&owner, "u1").is_ok());
        assert!(ensure_owner_or_admin(&admin, "u1").is_ok());
        assert_eq!(ensure_owner_or_admin(&other, "u1").unwrap_err().http_status(), 403);
    }
}
