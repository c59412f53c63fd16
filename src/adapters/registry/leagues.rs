//! Built-in league table.
//!
//! Display names for the division codes used by the football-data
//! style datasets the classifier is trained on. Config entries without
//! a `name` take theirs from here.

/// `(code, display name)` pairs, sorted by code.
pub const LEAGUES: &[(&str, &str)] = &[
    ("ARG", "Primera Division (Argentina)"),
    ("AUT", "Bundesliga (Austria)"),
    ("B1", "Belgian Pro League"),
    ("BRA", "Brasileirao"),
    ("CHN", "Chinese Super League"),
    ("D1", "Bundesliga (Germany)"),
    ("D2", "2. Bundesliga (Germany)"),
    ("DEN", "Superliga (Denmark)"),
    ("E0", "Premier League (England)"),
    ("E1", "English League Championship"),
    ("E2", "English League One"),
    ("E3", "English League Two"),
    ("EC", "National League (England)"),
    ("F1", "Ligue 1 (France)"),
    ("F2", "Ligue 2 (France)"),
    ("FIN", "Veikkausliiga (Finland)"),
    ("G1", "Super League (Greece)"),
    ("I1", "Serie A (Italy)"),
    ("I2", "Serie B (Italy)"),
    ("IRL", "Premier Division (Ireland)"),
    ("JAP", "J1 League (Japan)"),
    ("MEX", "Liga MX (Mexico)"),
    ("N1", "Eredivisie (Netherlands)"),
    ("NOR", "Eliteserien (Norway)"),
    ("P1", "Primeira Liga (Portugal)"),
    ("POL", "Ekstraklasa (Poland)"),
    ("ROM", "Liga I (Romania)"),
    ("RUS", "Premier League (Russia)"),
    ("SC0", "Scottish Premiership"),
    ("SC1", "Scottish Championship"),
    ("SC2", "Scottish League One"),
    ("SC3", "Scottish League Two"),
    ("SP1", "La Liga (Spain)"),
    ("SP2", "La Liga 2 (Spain)"),
    ("SUI", "Super League (Switzerland)"),
    ("SWE", "Allsvenskan (Sweden)"),
    ("T1", "Super Lig (Turkey)"),
    ("USA", "Major League Soccer (USA/Canada)"),
];

/// Built-in display name for `code`.
pub fn league_name(code: &str) -> Option<&'static str> {
    LEAGUES
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|i| LEAGUES[i].1)
}
