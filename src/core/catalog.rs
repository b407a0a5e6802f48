use super::IndicatorSpec;

fn spec(
    source_id: &str,
    display_name: &str,
    category: &str,
    sort_key: &str,
    invert: bool,
) -> IndicatorSpec {
    IndicatorSpec {
        source_id: source_id.to_string(),
        display_name: display_name.to_string(),
        category: category.to_string(),
        sort_key: sort_key.to_string(),
        default_weight: 0,
        invert,
    }
}

/// ACS subject-table indicators offered when the config lists none.
pub fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        spec(
            "S1501_C02_014E",
            "Percent of population 25+ with high school degree or higher",
            "Education",
            "high school degree",
            false,
        ),
        spec(
            "S1501_C02_015E",
            "Percent of population 25+ with bachelor's degree or higher",
            "Education",
            "bachelor's degree",
            false,
        ),
        spec(
            "S1501_C02_013E",
            "Percent of population 25+ with graduate degree or higher",
            "Education",
            "graduate degree",
            false,
        ),
        spec(
            "S2701_C05_001E",
            "Percent of population without health insurance",
            "Healthcare",
            "health insurance",
            true,
        ),
        spec(
            "S1901_C01_012E",
            "Median household income in the past 12 months",
            "Economy",
            "household income median",
            false,
        ),
        spec(
            "S1901_C01_013E",
            "Mean household income in the past 12 months",
            "Economy",
            "household income mean",
            false,
        ),
        spec(
            "S2301_C04_001E",
            "Unemployment rates for 16+",
            "Economy",
            "unemployment rates",
            true,
        ),
    ]
}
