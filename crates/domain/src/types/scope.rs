//! Application permission scope
//!
//! The API encodes granted permissions as a bit mask. Configuration may give
//! the scope either as that mask or as a list of permission names; both end
//! up as a [`Scope`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::VkError;

/// A single grantable permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Notify,
    Friends,
    Photos,
    Audio,
    Video,
    Offers,
    Questions,
    Pages,
    Status,
    Notes,
    Messages,
    Wall,
    Ads,
    Offline,
    Docs,
    Groups,
    Notifications,
    Stats,
    Email,
    Market,
}

crate::impl_name_conversions!(Permission {
    Notify => "notify",
    Friends => "friends",
    Photos => "photos",
    Audio => "audio",
    Video => "video",
    Offers => "offers",
    Questions => "questions",
    Pages => "pages",
    Status => "status",
    Notes => "notes",
    Messages => "messages",
    Wall => "wall",
    Ads => "ads",
    Offline => "offline",
    Docs => "docs",
    Groups => "groups",
    Notifications => "notifications",
    Stats => "stats",
    Email => "email",
    Market => "market",
});

impl Permission {
    /// Bit of this permission in the scope mask.
    #[must_use]
    pub const fn bit(self) -> u64 {
        match self {
            Self::Notify => 1,
            Self::Friends => 1 << 1,
            Self::Photos => 1 << 2,
            Self::Audio => 1 << 3,
            Self::Video => 1 << 4,
            Self::Offers => 1 << 5,
            Self::Questions => 1 << 6,
            Self::Pages => 1 << 7,
            Self::Status => 1 << 10,
            Self::Notes => 1 << 11,
            Self::Messages => 1 << 12,
            Self::Wall => 1 << 13,
            Self::Ads => 1 << 15,
            Self::Offline => 1 << 16,
            Self::Docs => 1 << 17,
            Self::Groups => 1 << 18,
            Self::Notifications => 1 << 19,
            Self::Stats => 1 << 20,
            Self::Email => 1 << 22,
            Self::Market => 1 << 27,
        }
    }
}

/// Set of permissions requested by (or granted to) an application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ScopeRepr", into = "u64")]
pub struct Scope {
    mask: u64,
}

impl Scope {
    #[must_use]
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    #[must_use]
    pub const fn from_mask(mask: u64) -> Self {
        Self { mask }
    }

    /// Build a scope from permission names, rejecting unknown names.
    pub fn from_names<I, S>(names: I) -> Result<Self, VkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| !name.as_ref().trim().is_empty())
            .try_fold(Self::empty(), |scope, name| {
                let permission =
                    Permission::from_str(name.as_ref()).map_err(VkError::InvalidInput)?;
                Ok(scope.with(permission))
            })
    }

    #[must_use]
    pub const fn with(self, permission: Permission) -> Self {
        Self { mask: self.mask | permission.bit() }
    }

    #[must_use]
    pub const fn contains(self, permission: Permission) -> bool {
        self.mask & permission.bit() != 0
    }

    #[must_use]
    pub const fn mask(self) -> u64 {
        self.mask
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.mask == 0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mask)
    }
}

impl FromStr for Scope {
    type Err = VkError;

    /// Accepts a decimal mask (`"65540"`) or comma-separated names
    /// (`"offline,photos"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(mask) = trimmed.parse::<u64>() {
            return Ok(Self::from_mask(mask));
        }
        Self::from_names(trimmed.split(','))
    }
}

impl From<Scope> for u64 {
    fn from(scope: Scope) -> Self {
        scope.mask
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeRepr {
    Mask(u64),
    Names(Vec<String>),
    Text(String),
}

impl TryFrom<ScopeRepr> for Scope {
    type Error = VkError;

    fn try_from(repr: ScopeRepr) -> Result<Self, Self::Error> {
        match repr {
            ScopeRepr::Mask(mask) => Ok(Self::from_mask(mask)),
            ScopeRepr::Names(names) => Self::from_names(names),
            ScopeRepr::Text(text) => text.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_fold_into_mask() {
        let scope = Scope::from_names(["offline", "photos"]).unwrap();

        assert_eq!(scope.mask(), 65540);
        assert_eq!(scope.to_string(), "65540");
        assert!(scope.contains(Permission::Photos));
        assert!(!scope.contains(Permission::Wall));
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = Scope::from_names(["photos", "teleport"]).unwrap_err();
        assert!(matches!(err, VkError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_mask_and_list() {
        assert_eq!("8196".parse::<Scope>().unwrap(), Scope::from_mask(8196));
        assert_eq!(
            "wall, friends".parse::<Scope>().unwrap(),
            Scope::empty().with(Permission::Wall).with(Permission::Friends)
        );
        assert!("".parse::<Scope>().unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_any_representation() {
        let from_list: Scope = serde_json::from_str(r#"["offline","photos"]"#).unwrap();
        let from_mask: Scope = serde_json::from_str("65540").unwrap();
        let from_text: Scope = serde_json::from_str(r#""offline,photos""#).unwrap();

        assert_eq!(from_list, from_mask);
        assert_eq!(from_text, from_mask);
        assert_eq!(serde_json::to_string(&from_list).unwrap(), "65540");
    }
}
