//! Portal roles as carried in the access token's `role` claim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::jwt;

/// Role of the signed-in user.
///
/// Only used to decide what the client shows (menus, admin screens). The
/// backend authorizes every request on its own; a forged or stale role claim
/// can at most reveal a screen whose data requests will then be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular cooperative member.
    #[serde(rename = "regular")]
    RegularUser,
    /// Management board.
    Board,
    /// Control board.
    Control,
    /// Accountant.
    Accountant,
    /// Administrator.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegularUser => "regular",
            Self::Board => "board",
            Self::Control => "control",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
        }
    }

    /// Roles whose screens this role may see.
    #[must_use]
    pub const fn includes(self) -> &'static [Self] {
        match self {
            Self::Admin => &[
                Self::Admin,
                Self::Control,
                Self::Board,
                Self::Accountant,
                Self::RegularUser,
            ],
            Self::Control => &[Self::Control, Self::Board, Self::RegularUser],
            Self::Board => &[Self::Board, Self::RegularUser],
            Self::Accountant => &[Self::Accountant],
            Self::RegularUser => &[Self::RegularUser],
        }
    }

    /// Returns true if screens meant for `required` should be shown.
    #[must_use]
    pub fn can_view(self, required: Self) -> bool {
        self.includes().contains(&required)
    }

    /// Returns true for the admin back office.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Reads the role hint from a token. Unknown or missing roles give `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        jwt::role(token).and_then(|r| r.parse().ok())
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
        match s {
            "regular" => Ok(Self::RegularUser),
            "board" => Ok(Self::Board),
            "control" => Ok(Self::Control),
            "accountant" => Ok(Self::Accountant),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
