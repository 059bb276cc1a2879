use serde::Serialize;

use crate::auth::role::Role;

/// The verified identity consumed from the external provider: uid, email,
/// and the custom role claim. This service stores no users of its own.
#[derive(Debug, Clone, Serialize)]
pub struct AuthedUser {
    pub uid: String,
    pub email: String,
    pub role: Role,
}
