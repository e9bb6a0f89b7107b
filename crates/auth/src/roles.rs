use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role tier of a user account.
///
/// Tiers are totally ordered (`Member < Admin < Super`) and serialize as their
/// integer tier (0, 1, 2), which is how clients send them.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RoleTier {
    #[default]
    Member = 0,
    Admin = 1,
    Super = 2,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown role tier {0} (expected 0, 1 or 2)")]
pub struct UnknownRoleTier(pub u8);

impl RoleTier {
    pub const ALL: [RoleTier; 3] = [RoleTier::Member, RoleTier::Admin, RoleTier::Super];

    /// Admins and super-admins.
    pub fn is_staff(self) -> bool {
        self >= RoleTier::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoleTier::Member => "member",
            RoleTier::Admin => "admin",
            RoleTier::Super => "super",
        }
    }
}

impl TryFrom<u8> for RoleTier {
    type Error = UnknownRoleTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RoleTier::Member),
            1 => Ok(RoleTier::Admin),
            2 => Ok(RoleTier::Super),
            other => Err(UnknownRoleTier(other)),
        }
    }
}

impl From<RoleTier> for u8 {
    fn from(value: RoleTier) -> Self {
        value as u8
    }
}

impl core::fmt::Display for RoleTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
