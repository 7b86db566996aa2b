//! "Pick a random iconic match" heuristic.
//!
//! A match qualifies through its stage (final/qualifier/eliminator), a super
//! over, or a close finish. Selection among qualifying matches is uniform at
//! random over a bounded sample; with no candidates, any sampled match is
//! served with a generic significance line.

use crate::constants::DISPLAY_DATE_FORMAT;
use crate::model::Match;
use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconicMatch {
    pub season: String,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub venue: Option<String>,
    pub date: String,
    pub match_winner: Option<String>,
    pub result: String,
    pub result_margin: Option<String>,
    pub match_type: String,
    pub super_over: String,
    pub method: Option<String>,
    /// Why this match made the cut.
    pub significance: String,
}

const GENERIC_SIGNIFICANCE: &str = "Featured memorable IPL clash";

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Margin parsed from its string form; non-numeric counts as not-a-margin.
fn parse_margin(margin: Option<&str>) -> i64 {
    margin
        .and_then(|m| m.trim().parse::<i64>().ok())
        .unwrap_or(-1)
}

fn went_super_over(m: &Match) -> bool {
    let flag = m.super_over.trim();
    flag.eq_ignore_ascii_case("y")
        || flag.eq_ignore_ascii_case("yes")
        || m.method.as_deref().map_or(false, |method| contains_ci(method, "super"))
}

fn is_close_finish(m: &Match) -> bool {
    let margin = parse_margin(m.result_margin.as_deref());
    if margin <= 0 {
        return false;
    }
    if contains_ci(&m.result, "wicket") {
        return margin <= 2;
    }
    if contains_ci(&m.result, "run") {
        return margin <= 5;
    }
    false
}

pub fn is_iconic(m: &Match) -> bool {
    let stage = contains_ci(&m.match_type, "final")
        || contains_ci(&m.match_type, "qualifier")
        || contains_ci(&m.match_type, "eliminator");
    stage || went_super_over(m) || is_close_finish(m)
}

/// First matching rule wins: stage beats super over beats close finish.
pub fn significance(m: &Match) -> String {
    if contains_ci(&m.match_type, "final") {
        return "Grand Finale showdown on the big stage".to_string();
    }
    if contains_ci(&m.match_type, "qualifier") {
        return "High-stakes Qualifier clash".to_string();
    }
    if contains_ci(&m.match_type, "eliminator") {
        return "Do-or-die Eliminator classic".to_string();
    }
    if went_super_over(m) {
        return "Thrilling Super Over finish".to_string();
    }

    let margin = parse_margin(m.result_margin.as_deref());
    if contains_ci(&m.result, "wicket") {
        if margin > 0 {
            return format!("Nail-biting finish by {} wickets", margin);
        }
        return "Nail-biting finish by wickets".to_string();
    }
    if contains_ci(&m.result, "run") {
        if margin > 0 {
            return format!("Edge-of-seat defense by {} runs", margin);
        }
        return "Edge-of-seat defense by runs".to_string();
    }
    GENERIC_SIGNIFICANCE.to_string()
}

fn to_dto(m: &Match, significance: String) -> IconicMatch {
    IconicMatch {
        season: m.season.clone(),
        team1: m.team1.clone(),
        team2: m.team2.clone(),
        venue: m.venue.clone(),
        date: m.date.format(DISPLAY_DATE_FORMAT).to_string(),
        match_winner: m.match_winner.clone(),
        result: m.result.clone(),
        result_margin: m.result_margin.clone(),
        match_type: m.match_type.clone(),
        super_over: m.super_over.clone(),
        method: m.method.clone(),
        significance,
    }
}

/// Picks one iconic match uniformly at random from the sample, or any sample
/// match with a generic line when nothing qualifies. `None` only for an
/// empty sample.
pub fn pick_random(sample: &[Match]) -> Option<IconicMatch> {
    if sample.is_empty() {
        return None;
    }
    let mut rng = rand::thread_rng();

    let candidates: Vec<&Match> = sample.iter().filter(|m| is_iconic(m)).collect();
    if candidates.is_empty() {
        return sample
            .choose(&mut rng)
            .map(|m| to_dto(m, GENERIC_SIGNIFICANCE.to_string()));
    }

    candidates
        .choose(&mut rng)
        .map(|m| to_dto(m, significance(m)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_match() -> Match {
        Match {
            id: None,
            city: "Chennai".into(),
            date: NaiveDate::from_ymd_opt(2019, 5, 12).unwrap(),
            player_of_match: None,
            venue: Some("MA Chidambaram Stadium, Chennai".into()),
            team1: Some("Chennai Super Kings".into()),
            team2: Some("Mumbai Indians".into()),
            toss_winner: None,
            toss_decision: "bat".into(),
            match_winner: Some("Mumbai Indians".into()),
            result: "runs".into(),
            result_margin: Some("23".into()),
            umpire1: "U1".into(),
            umpire2: "U2".into(),
            season: "2019".into(),
            match_type: "League".into(),
            target_runs: None,
            target_overs: None,
            super_over: "N".into(),
            method: None,
        }
    }

    #[test]
    fn stage_matches_are_iconic() {
        for stage in ["Final", "Qualifier 1", "Eliminator", "final"] {
            let mut m = base_match();
            m.match_type = stage.into();
            assert!(is_iconic(&m), "{stage}");
        }
    }

    #[test]
    fn close_finish_boundaries_are_inclusive() {
        let mut wickets = base_match();
        wickets.result = "wickets".into();
        wickets.result_margin = Some("2".into());
        assert!(is_iconic(&wickets));
        wickets.result_margin = Some("3".into());
        assert!(!is_iconic(&wickets));

        let mut runs = base_match();
        runs.result = "runs".into();
        runs.result_margin = Some("5".into());
        assert!(is_iconic(&runs));
        runs.result_margin = Some("6".into());
        assert!(!is_iconic(&runs));
    }

    #[test]
    fn bad_margins_are_not_close() {
        let mut m = base_match();
        m.result = "wickets".into();
        for margin in [None, Some("abc"), Some("0"), Some("-3")] {
            m.result_margin = margin.map(Into::into);
            assert!(!is_iconic(&m));
        }
    }

    #[test]
    fn super_over_flag_or_method_qualifies() {
        let mut m = base_match();
        m.super_over = "Y".into();
        assert!(is_iconic(&m));

        let mut m = base_match();
        m.method = Some("Super Over".into());
        assert!(is_iconic(&m));
    }

    #[test]
    fn significance_prefers_stage_over_super_over() {
        let mut m = base_match();
        m.match_type = "Final".into();
        m.super_over = "Y".into();
        assert_eq!(significance(&m), "Grand Finale showdown on the big stage");

        m.match_type = "League".into();
        assert_eq!(significance(&m), "Thrilling Super Over finish");
    }

    #[test]
    fn margin_appears_in_close_finish_text() {
        let mut m = base_match();
        m.result = "wickets".into();
        m.result_margin = Some("2".into());
        assert_eq!(significance(&m), "Nail-biting finish by 2 wickets");
    }

    #[test]
    fn empty_sample_yields_none_and_dull_sample_falls_back() {
        assert!(pick_random(&[]).is_none());

        let dull = vec![base_match()];
        let picked = pick_random(&dull).unwrap();
        assert_eq!(picked.significance, GENERIC_SIGNIFICANCE);
        assert_eq!(picked.date, "12 May 2019");
    }
}
