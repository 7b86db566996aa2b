//! Canonicalization of historical team and venue names.
//!
//! The CSV export spans many seasons, so the same franchise or ground shows
//! up under rebrands, spelling variants and inconsistent city qualifiers.
//! Aggregation keys on names, which only works if every variant collapses to
//! a single canonical string before anything downstream sees it.

use crate::constants::MISSING_MARKER;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Franchise rebrands, exact match on the trimmed name.
static TEAM_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Rising Pune Supergiant", "Rising Pune Supergiants"),
        ("Delhi Daredevils", "Delhi Capitals"),
        ("Kings XI Punjab", "Punjab Kings"),
        ("Royal Challengers Bengaluru", "Royal Challengers Bangalore"),
    ])
});

/// Ground renames, spelling variants and city-qualifier inconsistencies,
/// collapsed to one "Stadium, City" string per ground.
static VENUE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&'static str, &[&'static str])] = &[
        (
            "M Chinnaswamy Stadium, Bengaluru",
            &["M Chinnaswamy Stadium", "M.Chinnaswamy Stadium"],
        ),
        ("Wankhede Stadium, Mumbai", &["Wankhede Stadium"]),
        ("Eden Gardens, Kolkata", &["Eden Gardens"]),
        (
            "Arun Jaitley Stadium, Delhi",
            &["Feroz Shah Kotla", "Feroz Shah Kotla Ground", "Arun Jaitley Stadium"],
        ),
        (
            "MA Chidambaram Stadium, Chennai",
            &[
                "MA Chidambaram Stadium",
                "MA Chidambaram Stadium, Chepauk",
                "MA Chidambaram Stadium, Chepauk, Chennai",
                "M.A. Chidambaram Stadium",
            ],
        ),
        (
            "Punjab Cricket Association IS Bindra Stadium, Mohali",
            &[
                "Punjab Cricket Association Stadium, Mohali",
                "Punjab Cricket Association IS Bindra Stadium",
                "Punjab Cricket Association IS Bindra Stadium, Mohali, Chandigarh",
            ],
        ),
        (
            "Rajiv Gandhi International Stadium, Hyderabad",
            &[
                "Rajiv Gandhi International Stadium",
                "Rajiv Gandhi International Stadium, Uppal",
                "Rajiv Gandhi Intl. Cricket Stadium",
            ],
        ),
        ("Sawai Mansingh Stadium, Jaipur", &["Sawai Mansingh Stadium"]),
        (
            "Dr DY Patil Sports Academy, Mumbai",
            &["Dr DY Patil Sports Academy", "Dr. DY Patil Sports Academy"],
        ),
        ("Brabourne Stadium, Mumbai", &["Brabourne Stadium"]),
        (
            "Narendra Modi Stadium, Ahmedabad",
            &["Sardar Patel Stadium, Motera", "Narendra Modi Stadium"],
        ),
        (
            "Maharashtra Cricket Association Stadium, Pune",
            &[
                "Maharashtra Cricket Association Stadium",
                "Subrata Roy Sahara Stadium",
            ],
        ),
        (
            "Dr YS Rajasekhara Reddy ACA-VDCA Cricket Stadium, Visakhapatnam",
            &[
                "Dr. Y.S. Rajasekhara Reddy ACA-VDCA Cricket Stadium",
                "ACA-VDCA Stadium",
            ],
        ),
        (
            "Himachal Pradesh Cricket Association Stadium, Dharamsala",
            &["Himachal Pradesh Cricket Association Stadium"],
        ),
        ("Holkar Cricket Stadium, Indore", &["Holkar Cricket Stadium"]),
        (
            "JSCA International Stadium Complex, Ranchi",
            &["JSCA International Stadium Complex"],
        ),
        ("Barabati Stadium, Cuttack", &["Barabati Stadium"]),
        (
            "Shaheed Veer Narayan Singh International Stadium, Raipur",
            &["Shaheed Veer Narayan Singh International Stadium"],
        ),
        ("Green Park, Kanpur", &["Green Park"]),
        (
            "Saurashtra Cricket Association Stadium, Rajkot",
            &["Saurashtra Cricket Association Stadium"],
        ),
        (
            "Vidarbha Cricket Association Stadium, Nagpur",
            &["Vidarbha Cricket Association Stadium, Jamtha"],
        ),
        ("Nehru Stadium, Kochi", &["Nehru Stadium"]),
        (
            "Bharat Ratna Shri Atal Bihari Vajpayee Ekana Cricket Stadium, Lucknow",
            &[
                "Bharat Ratna Shri Atal Bihari Vajpayee Ekana Cricket Stadium",
                "Ekana Cricket Stadium",
            ],
        ),
        (
            "Zayed Cricket Stadium, Abu Dhabi",
            &["Sheikh Zayed Stadium", "Zayed Cricket Stadium"],
        ),
        (
            "Dubai International Cricket Stadium, Dubai",
            &["Dubai International Cricket Stadium"],
        ),
        ("Sharjah Cricket Stadium, Sharjah", &["Sharjah Cricket Stadium"]),
        ("Newlands, Cape Town", &["Newlands"]),
        ("St George's Park, Gqeberha", &["St George's Park"]),
        ("Kingsmead, Durban", &["Kingsmead"]),
        ("SuperSport Park, Centurion", &["SuperSport Park"]),
        ("New Wanderers Stadium, Johannesburg", &["New Wanderers Stadium"]),
        ("Buffalo Park, East London", &["Buffalo Park"]),
        ("De Beers Diamond Oval, Kimberley", &["De Beers Diamond Oval"]),
        ("OUTsurance Oval, Bloemfontein", &["OUTsurance Oval"]),
        (
            "Barsapara Cricket Stadium, Guwahati",
            &["Barsapara Cricket Stadium"],
        ),
    ];

    let mut map = HashMap::new();
    for (canonical, aliases) in groups {
        for alias in *aliases {
            map.insert(*alias, *canonical);
        }
    }
    map
});

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_MARKER)
}

/// Maps a raw team name to its canonical present-day name.
///
/// Blank input or the missing marker means the team is absent. Unrecognized
/// names pass through trimmed, so new franchises need no table change.
pub fn team_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }
    Some(
        TEAM_ALIASES
            .get(trimmed)
            .map(|s| s.to_string())
            .unwrap_or_else(|| trimmed.to_string()),
    )
}

/// Maps a raw venue name to its canonical "Stadium, City" form.
pub fn venue_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }
    Some(
        VENUE_ALIASES
            .get(trimmed)
            .map(|s| s.to_string())
            .unwrap_or_else(|| trimmed.to_string()),
    )
}

/// Missing-marker handling for plain optional fields (margin, targets, ...).
pub fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebrands_collapse_to_canonical() {
        assert_eq!(team_name("Delhi Daredevils").as_deref(), Some("Delhi Capitals"));
        assert_eq!(team_name("Kings XI Punjab").as_deref(), Some("Punjab Kings"));
        assert_eq!(
            team_name("Rising Pune Supergiant").as_deref(),
            Some("Rising Pune Supergiants")
        );
        assert_eq!(
            team_name("Royal Challengers Bengaluru").as_deref(),
            Some("Royal Challengers Bangalore")
        );
    }

    #[test]
    fn alias_and_canonical_agree() {
        for (alias, canonical) in TEAM_ALIASES.iter() {
            assert_eq!(team_name(alias), team_name(canonical));
        }
        for (alias, canonical) in VENUE_ALIASES.iter() {
            assert_eq!(venue_name(alias), venue_name(canonical));
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["Delhi Daredevils", "Chennai Super Kings", "  Gujarat Titans "] {
            let once = team_name(raw).unwrap();
            assert_eq!(team_name(&once).as_deref(), Some(once.as_str()));
        }
        for raw in ["M.Chinnaswamy Stadium", "Eden Gardens", "Some New Ground"] {
            let once = venue_name(raw).unwrap();
            assert_eq!(venue_name(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn missing_marker_and_blank_are_absent() {
        assert_eq!(team_name(""), None);
        assert_eq!(team_name("  "), None);
        assert_eq!(team_name("NA"), None);
        assert_eq!(team_name("na"), None);
        assert_eq!(venue_name("NA"), None);
        assert_eq!(optional_field(" NA "), None);
        assert_eq!(optional_field(""), None);
    }

    #[test]
    fn unknown_names_pass_through_trimmed() {
        assert_eq!(
            team_name("  Ahmedabad Avengers  ").as_deref(),
            Some("Ahmedabad Avengers")
        );
        assert_eq!(venue_name(" Lords ").as_deref(), Some("Lords"));
    }

    #[test]
    fn chinnaswamy_variants_share_one_canonical_name() {
        let a = venue_name("M.Chinnaswamy Stadium");
        let b = venue_name("M Chinnaswamy Stadium, Bengaluru");
        assert_eq!(a, b);
        assert_eq!(a.as_deref(), Some("M Chinnaswamy Stadium, Bengaluru"));
    }

    #[test]
    fn venue_table_is_exact_match_not_substring() {
        assert_eq!(
            venue_name("Eden Gardens Annex").as_deref(),
            Some("Eden Gardens Annex")
        );
    }
}
