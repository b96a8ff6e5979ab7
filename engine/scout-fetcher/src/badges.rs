//! Club badge lookup
//!
//! Cartola club ids are not understood by the badge provider, so each club is
//! translated through a static table before the badge URL is built. No request is
//! made to the provider and the resulting URL is not verified.

use std::collections::HashMap;

/// 2026 Série A clubs: (Cartola club id, badge provider club id)
const SERIE_A_2026: [(i64, i64); 20] = [
    // RJ
    (262, 5981),
    (267, 1974),
    (266, 1961),
    (263, 1958),
    // SP
    (264, 1957),
    (275, 1963),
    (276, 1981),
    (277, 1968),
    (280, 1999),
    (2305, 21982),
    // MG
    (282, 1977),
    (283, 1954),
    // RS
    (284, 5926),
    (285, 1966),
    // PR
    (293, 1967),
    (294, 1980),
    // SC
    (315, 21845),
    // PA
    (364, 2012),
    // BA
    (265, 1955),
    (287, 1995),
];

/// Cartola club id -> badge provider club id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubBadgeMap {
    clubs: HashMap<i64, i64>,
}

impl Default for ClubBadgeMap {
    fn default() -> Self {
        Self::from_pairs(SERIE_A_2026)
    }
}

impl ClubBadgeMap {
    pub fn empty() -> Self {
        Self { clubs: HashMap::new() }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self { clubs: pairs.into_iter().collect() }
    }

    pub fn provider_club_id(&self, club_id: i64) -> Option<i64> {
        self.clubs.get(&club_id).copied()
    }

    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }
}

/// Builds badge URLs from a club map and a URL template
#[derive(Debug, Clone)]
pub struct BadgeResolver {
    clubs: ClubBadgeMap,
    url_template: String,
}

impl BadgeResolver {
    pub fn new(clubs: ClubBadgeMap, url_template: impl Into<String>) -> Self {
        Self { clubs, url_template: url_template.into() }
    }

    /// Badge URL for a club, or an empty string when the club is not mapped
    pub fn badge_url(&self, club_id: i64) -> String {
        match self.clubs.provider_club_id(club_id) {
            Some(provider_id) => self.url_template.replace("{id}", &provider_id.to_string()),
            None => String::new(),
        }
    }
}
