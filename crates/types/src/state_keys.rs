//! Externally readable state-variable layout of the rating agent.

use crate::{Address, ProjectId};

/// Separator between the parts of a composite state key.
pub const KEY_SEPARATOR: char = '*';

/// Reputation asset id, set once by `define`.
pub const ASSET_KEY: &str = "asset";

/// Total reputation units ever minted.
pub const SUPPLY_KEY: &str = "supply";

/// Prefix of per-donor and per-project-donor rating keys.
pub const RATING_PREFIX: &str = "rating";

/// `rating*<donor>`
pub fn donor_rating_key(donor: &Address) -> String {
    format!("{RATING_PREFIX}{KEY_SEPARATOR}{donor}")
}

/// `rating*<project>*<donor>`
pub fn project_rating_key(project: &ProjectId, donor: &Address) -> String {
    format!("{RATING_PREFIX}{KEY_SEPARATOR}{project}{KEY_SEPARATOR}{donor}")
}

/// Classification of a rating key read back from state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingKey<'a> {
    Donor(&'a str),
    ProjectDonor { project: &'a str, donor: &'a str },
}

/// Split a state key into its rating components, if it is one.
pub fn parse_rating_key(key: &str) -> Option<RatingKey<'_>> {
    let rest = key
        .strip_prefix(RATING_PREFIX)?
        .strip_prefix(KEY_SEPARATOR)?;
    match rest.split_once(KEY_SEPARATOR) {
        None => Some(RatingKey::Donor(rest)),
        Some((project, donor)) => Some(RatingKey::ProjectDonor { project, donor }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_layout() {
        let donor = Address::new("DONOR").unwrap();
        let project = ProjectId::new("owner/repo").unwrap();
        assert_eq!(donor_rating_key(&donor), "rating*DONOR");
        assert_eq!(project_rating_key(&project, &donor), "rating*owner/repo*DONOR");
    }

    #[test]
    fn parse_round_trips_layout() {
        assert_eq!(parse_rating_key("rating*D"), Some(RatingKey::Donor("D")));
        assert_eq!(
            parse_rating_key("rating*p/q*D"),
            Some(RatingKey::ProjectDonor {
                project: "p/q",
                donor: "D"
            })
        );
        assert_eq!(parse_rating_key("supply"), None);
        assert_eq!(parse_rating_key("ratings*D"), None);
    }
}
