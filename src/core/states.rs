/// Postal abbreviation for every state, DC and the territories the API can report.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
    ("American Samoa", "AS"),
    ("Guam", "GU"),
    ("Northern Mariana Islands", "MP"),
    ("Puerto Rico", "PR"),
    ("United States Minor Outlying Islands", "UM"),
    ("Virgin Islands, U.S.", "VI"),
];

/// (abbreviation, row, column) on an 8 x 11 tile grid.
pub const TILE_GRID: &[(&str, u8, u8)] = &[
    ("AK", 0, 0),
    ("ME", 0, 10),
    ("VT", 1, 9),
    ("NH", 1, 10),
    ("WA", 2, 0),
    ("ID", 2, 1),
    ("MT", 2, 2),
    ("ND", 2, 3),
    ("MN", 2, 4),
    ("IL", 2, 5),
    ("WI", 2, 6),
    ("MI", 2, 7),
    ("NY", 2, 8),
    ("RI", 2, 9),
    ("MA", 2, 10),
    ("OR", 3, 0),
    ("NV", 3, 1),
    ("WY", 3, 2),
    ("SD", 3, 3),
    ("IA", 3, 4),
    ("IN", 3, 5),
    ("OH", 3, 6),
    ("PA", 3, 7),
    ("NJ", 3, 8),
    ("CT", 3, 9),
    ("CA", 4, 0),
    ("UT", 4, 1),
    ("CO", 4, 2),
    ("NE", 4, 3),
    ("MO", 4, 4),
    ("KY", 4, 5),
    ("WV", 4, 6),
    ("VA", 4, 7),
    ("MD", 4, 8),
    ("DE", 4, 9),
    ("AZ", 5, 1),
    ("NM", 5, 2),
    ("KS", 5, 3),
    ("AR", 5, 4),
    ("TN", 5, 5),
    ("NC", 5, 6),
    ("SC", 5, 7),
    ("DC", 5, 8),
    ("OK", 6, 3),
    ("LA", 6, 4),
    ("MS", 6, 5),
    ("AL", 6, 6),
    ("GA", 6, 7),
    ("HI", 7, 0),
    ("TX", 7, 3),
    ("FL", 7, 8),
];

pub const GRID_ROWS: u8 = 8;
pub const GRID_COLS: u8 = 11;

pub fn abbreviation(name: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, abbr)| *abbr)
}

pub fn name_for(abbr: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(_, a)| a.eq_ignore_ascii_case(abbr))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookup_both_ways() {
        assert_eq!(abbreviation("Massachusetts"), Some("MA"));
        assert_eq!(abbreviation("Virgin Islands, U.S."), Some("VI"));
        assert_eq!(abbreviation("Atlantis"), None);
        assert_eq!(name_for("wv"), Some("West Virginia"));
    }

    #[test]
    fn grid_covers_fifty_states_and_dc() {
        assert_eq!(TILE_GRID.len(), 51);
        let abbrs: HashSet<&str> = TILE_GRID.iter().map(|(a, _, _)| *a).collect();
        assert_eq!(abbrs.len(), 51);
        for abbr in &abbrs {
            assert!(name_for(abbr).is_some(), "{abbr} has no name");
        }
    }

    #[test]
    fn grid_cells_unique_and_in_bounds() {
        let cells: HashSet<(u8, u8)> = TILE_GRID.iter().map(|(_, r, c)| (*r, *c)).collect();
        assert_eq!(cells.len(), TILE_GRID.len());
        assert!(TILE_GRID.iter().all(|(_, r, c)| *r < GRID_ROWS && *c < GRID_COLS));
    }
}
