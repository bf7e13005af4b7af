use crate::forecast::period::TempCategory;

/// Converts a temperature to Fahrenheit when its unit tag is Celsius.
///
/// The tag is matched case-insensitively against `"C"`; any other tag is
/// assumed to already be Fahrenheit and the value passes through unchanged.
pub fn normalize_to_fahrenheit(value: f64, unit: &str) -> f64 {
    if unit.eq_ignore_ascii_case("C") {
        value * 9.0 / 5.0 + 32.0
    } else {
        value
    }
}

/// Maps a Fahrenheit temperature onto a coarse category.
///
/// Band lower bounds are inclusive: 85 is exactly hot, 60 exactly moderate.
pub fn categorize(temperature_f: f64) -> TempCategory {
    if temperature_f >= 85.0 {
        TempCategory::Hot
    } else if temperature_f >= 60.0 {
        TempCategory::Moderate
    } else {
        TempCategory::Cold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_converts_to_fahrenheit() {
        assert_eq!(normalize_to_fahrenheit(0.0, "C"), 32.0);
        assert_eq!(normalize_to_fahrenheit(100.0, "C"), 212.0);
        assert_eq!(normalize_to_fahrenheit(30.0, "c"), 86.0);
    }

    #[test]
    fn other_units_pass_through() {
        assert_eq!(normalize_to_fahrenheit(75.0, "F"), 75.0);
        assert_eq!(normalize_to_fahrenheit(75.0, ""), 75.0);
    }

    #[test]
    fn band_lower_bounds_are_inclusive() {
        assert_eq!(categorize(85.0), TempCategory::Hot);
        assert_eq!(categorize(84.999), TempCategory::Moderate);
        assert_eq!(categorize(60.0), TempCategory::Moderate);
        assert_eq!(categorize(59.999), TempCategory::Cold);
    }

    #[test]
    fn extremes_categorize() {
        assert_eq!(categorize(110.0), TempCategory::Hot);
        assert_eq!(categorize(-20.0), TempCategory::Cold);
    }
}
