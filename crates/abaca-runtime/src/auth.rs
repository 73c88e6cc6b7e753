use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplace account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Buyer,
    /// Municipal Agriculture Office staff
    Mao,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Buyer => "buyer",
            Role::Mao => "mao",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Role::Farmer),
            "buyer" => Ok(Role::Buyer),
            "mao" | "officer" => Ok(Role::Mao),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Read-only session capability handed to collaborators that talk to the
/// backend. Nothing below the CLI reads credentials from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
    role: Option<Role>,
}

impl AuthContext {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            role: None,
        }
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// Keep tokens out of logs
impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}
