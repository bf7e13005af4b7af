use crate::forecast::period::ForecastPeriod;

/// Period names that identify "today" in an NWS period list.
const TODAY_MARKERS: [&str; 4] = ["today", "this morning", "this afternoon", "tonight"];

/// Picks the period representing "today" from an ordered period list.
///
/// Scans in order and returns the first period whose name, case-insensitively,
/// contains one of the known day-part markers, falling back to the first
/// period when none match. Returns `None` only for an empty list. Period names, not
/// dates, are the selection signal; NWS names follow this convention.
pub fn choose_today(periods: &[ForecastPeriod]) -> Option<&ForecastPeriod> {
    periods
        .iter()
        .find(|period| {
            let name = period.name.to_lowercase();
            TODAY_MARKERS.iter().any(|marker| name.contains(marker))
        })
        .or_else(|| periods.first())
}
