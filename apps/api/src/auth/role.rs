use serde::{Deserialize, Serialize};

/// The three roles recognized by the service. Role is the sole authorization
/// input, carried as a custom claim by the external identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Analyst,
    Surveyor,
}

impl Role {
    /// Resolves a raw claim value. Unknown or absent claims fall back to the
    /// least-privileged role.
    pub fn from_claim(raw: Option<&str>) -> Role {
        match raw {
            Some("admin") => Role::Admin,
            Some("analyst") => Role::Analyst,
            _ => Role::Surveyor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Analyst => "analyst",
            Role::Surveyor => "surveyor",
        }
    }

    /// Analytics dashboards are visible to analysts and admins.
    pub fn can_view_analytics(self) -> bool {
        matches!(self, Role::Admin | Role::Analyst)
    }

    /// Only admins may change another account's role claim.
    pub fn can_manage_roles(self) -> bool {
        matches!(self, Role::Admin)
    }
}
