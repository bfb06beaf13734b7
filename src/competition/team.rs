//! Team identities and the built-in catalog

use serde::{Deserialize, Serialize};

/// Short code identifying a team (e.g. "GS")
pub type TeamCode = String;

/// A club: immutable reference data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub code: TeamCode,
    /// Primary kit color (CSS hex)
    pub color1: String,
    /// Secondary kit color (CSS hex)
    pub color2: String,
}

impl Team {
    pub fn new(name: &str, code: &str, color1: &str, color2: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            color1: color1.to_string(),
            color2: color2.to_string(),
        }
    }
}

/// Default catalog: (name, code, color1, color2)
const DEFAULT_CATALOG: [(&str, &str, &str, &str); 12] = [
    ("Galatasaray", "GS", "#FDB913", "#A30008"),
    ("Fenerbahçe", "FB", "#003366", "#FFCC00"),
    ("Beşiktaş", "BJK", "#000000", "#FFFFFF"),
    ("Trabzonspor", "TS", "#8B0000", "#87CEEB"),
    ("Başakşehir", "İBFK", "#FF6600", "#003366"),
    ("Adana Demirspor", "ADS", "#003366", "#418FDE"),
    ("Alanyaspor", "ALA", "#FF6600", "#008000"),
    ("Antalyaspor", "ANT", "#FF0000", "#FFFFFF"),
    ("Sivasspor", "SİV", "#FF0000", "#FFFFFF"),
    ("Konyaspor", "KON", "#008000", "#FFFFFF"),
    ("Kayserispor", "KAY", "#FF0000", "#FFFF00"),
    ("Gaziantep FK", "GFK", "#DE0000", "#000000"),
];

/// The built-in team catalog, in display order
pub fn default_teams() -> Vec<Team> {
    DEFAULT_CATALOG
        .iter()
        .map(|(name, code, c1, c2)| Team::new(name, code, c1, c2))
        .collect()
}

/// Look a team up by code
pub fn find_team<'a>(teams: &'a [Team], code: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_codes_unique() {
        let teams = default_teams();
        let codes: HashSet<_> = teams.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes.len(), teams.len());
    }

    #[test]
    fn test_find_team() {
        let teams = default_teams();
        assert_eq!(find_team(&teams, "BJK").map(|t| t.name.as_str()), Some("Beşiktaş"));
        assert!(find_team(&teams, "XYZ").is_none());
    }
}
