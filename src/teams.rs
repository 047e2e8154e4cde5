use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const TEAM_SLUGS: [(&str, &str); 32] = [
    ("BUF", "buffalo-bills"),
    ("KC", "kansas-city-chiefs"),
    ("LV", "las-vegas-raiders"),
    ("PHI", "philadelphia-eagles"),
    ("CHI", "chicago-bears"),
    ("ARI", "arizona-cardinals"),
    ("ATL", "atlanta-falcons"),
    ("BAL", "baltimore-ravens"),
    ("CAR", "carolina-panthers"),
    ("CIN", "cincinnati-bengals"),
    ("CLE", "cleveland-browns"),
    ("DAL", "dallas-cowboys"),
    ("DEN", "denver-broncos"),
    ("DET", "detroit-lions"),
    ("GB", "green-bay-packers"),
    ("HOU", "houston-texans"),
    ("IND", "indianapolis-colts"),
    ("JAC", "jacksonville-jaguars"),
    ("LAC", "los-angeles-chargers"),
    ("LAR", "los-angeles-rams"),
    ("MIA", "miami-dolphins"),
    ("MIN", "minnesota-vikings"),
    ("NE", "new-england-patriots"),
    ("NO", "new-orleans-saints"),
    ("NYG", "new-york-giants"),
    ("NYJ", "new-york-jets"),
    ("PIT", "pittsburgh-steelers"),
    ("SEA", "seattle-seahawks"),
    ("SF", "san-francisco-49ers"),
    ("TB", "tampa-bay-buccaneers"),
    ("TEN", "tennessee-titans"),
    ("WAS", "washington-commanders"),
];

static SLUG_BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| TEAM_SLUGS.iter().copied().collect());

pub fn team_slug(code: &str) -> String {
    match SLUG_BY_CODE.get(code) {
        Some(slug) => (*slug).to_string(),
        None => code.to_lowercase(),
    }
}

pub fn is_known_team(code: &str) -> bool {
    SLUG_BY_CODE.contains_key(code)
}
