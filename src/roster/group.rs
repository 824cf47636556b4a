/// Player permission groups
use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// In-game permission level, lowest first
///
/// Any group may be changed to any other; only membership in this set is
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionGroup {
    #[serde(rename = "Player")]
    Player,
    #[serde(rename = "Graduate Engineer")]
    GraduateEngineer,
    #[serde(rename = "Engineer")]
    Engineer,
    #[serde(rename = "Senior Engineer")]
    SeniorEngineer,
    #[serde(rename = "Admin")]
    Admin,
}

impl PermissionGroup {
    pub const ALL: [PermissionGroup; 5] = [
        PermissionGroup::Player,
        PermissionGroup::GraduateEngineer,
        PermissionGroup::Engineer,
        PermissionGroup::SeniorEngineer,
        PermissionGroup::Admin,
    ];

    /// The engineering track shown on the engineer roster page
    pub const ENGINEERS: [PermissionGroup; 3] = [
        PermissionGroup::GraduateEngineer,
        PermissionGroup::Engineer,
        PermissionGroup::SeniorEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionGroup::Player => "Player",
            PermissionGroup::GraduateEngineer => "Graduate Engineer",
            PermissionGroup::Engineer => "Engineer",
            PermissionGroup::SeniorEngineer => "Senior Engineer",
            PermissionGroup::Admin => "Admin",
        }
    }
}

impl FromStr for PermissionGroup {
    type Err = RosterError;

    /// Exact, case-sensitive match on the stored names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| RosterError::InvalidGroup(s.to_string()))
    }
}

impl fmt::Display for PermissionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order() {
        assert!(PermissionGroup::Player < PermissionGroup::GraduateEngineer);
        assert!(PermissionGroup::GraduateEngineer < PermissionGroup::Engineer);
        assert!(PermissionGroup::Engineer < PermissionGroup::SeniorEngineer);
        assert!(PermissionGroup::SeniorEngineer < PermissionGroup::Admin);

        let mut sorted = PermissionGroup::ALL;
        sorted.sort();
        assert_eq!(sorted, PermissionGroup::ALL);
    }

    #[test]
    fn test_group_from_str() {
        for group in PermissionGroup::ALL {
            assert_eq!(group.as_str().parse::<PermissionGroup>().unwrap(), group);
        }

        assert!(matches!(
            "Intern".parse::<PermissionGroup>(),
            Err(RosterError::InvalidGroup(_))
        ));
        assert!("engineer".parse::<PermissionGroup>().is_err());
        assert!("".parse::<PermissionGroup>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&PermissionGroup::SeniorEngineer).unwrap();
        assert_eq!(json, r#""Senior Engineer""#);

        let group: PermissionGroup = serde_json::from_str(r#""Graduate Engineer""#).unwrap();
        assert_eq!(group, PermissionGroup::GraduateEngineer);
        assert_eq!(group.to_string(), "Graduate Engineer");
    }
}
