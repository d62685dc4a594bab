/// Padel club directory
///
/// The bot edits one message per game and the message carries the venue as a
/// plain name or a maps anchor. This table is how a bare name gets its link
/// back: exact-name match only, no fuzzy lookup.
#[derive(Debug, Clone)]
pub struct ClubConfig {
    pub name: &'static str,
    pub maps_url: &'static str,
}

impl ClubConfig {
    pub fn new(name: &'static str, maps_url: &'static str) -> Self {
        Self { name, maps_url }
    }
}

/// Get the list of Dubai padel clubs the group plays at
pub fn get_clubs() -> Vec<ClubConfig> {
    vec![
        ClubConfig::new(
            "SANDDUNE PADEL CLUB Al Qouz",
            "https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7",
        ),
        ClubConfig::new(
            "Padel Park Al Barsha",
            "https://maps.app.goo.gl/kQmWcR2yVfJq3u5Z6",
        ),
        ClubConfig::new(
            "Just Padel Business Bay",
            "https://maps.app.goo.gl/m8HtGdX4bLpS9e2E8",
        ),
        ClubConfig::new(
            "Matcha Club Al Quoz",
            "https://maps.app.goo.gl/u2VbNcY6fRkT4w7D9",
        ),
        ClubConfig::new(
            "The Padel Lab Al Quoz",
            "https://maps.app.goo.gl/p5JrKeZ8dMnU6q3B4",
        ),
        ClubConfig::new(
            "ISD Padel Dubai Sports City",
            "https://maps.app.goo.gl/w7DsLfA3cNqV8y4F2",
        ),
        ClubConfig::new(
            "Real Padel Club Mirdif",
            "https://maps.app.goo.gl/e4XwMbB9gTrY2u6H5",
        ),
    ]
}

#[derive(Debug, Clone)]
pub struct ClubDirectory {
    clubs: Vec<ClubConfig>,
}

impl Default for ClubDirectory {
    fn default() -> Self {
        Self { clubs: get_clubs() }
    }
}

impl ClubDirectory {
    pub fn with_clubs(clubs: Vec<ClubConfig>) -> Self {
        Self { clubs }
    }

    /// Exact-name lookup, case-sensitive by design: club names in the
    /// directory are spelled the way the messages spell them.
    pub fn maps_url_for(&self, name: &str) -> Option<&'static str> {
        self.clubs
            .iter()
            .find(|club| club.name == name.trim())
            .map(|club| club.maps_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_club_resolves() {
        let directory = ClubDirectory::default();
        assert!(
            directory
                .maps_url_for("SANDDUNE PADEL CLUB Al Qouz")
                .is_some()
        );
    }

    #[test]
    fn test_unknown_club_is_none() {
        let directory = ClubDirectory::default();
        assert!(directory.maps_url_for("Some Other Club").is_none());
    }

    #[test]
    fn test_lookup_trims_whitespace() {
        let directory = ClubDirectory::default();
        assert!(
            directory
                .maps_url_for("  SANDDUNE PADEL CLUB Al Qouz ")
                .is_some()
        );
    }
}
