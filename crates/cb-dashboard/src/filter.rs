//! Call history filters and stats.
//!
//! Filtering is pure: [`HistoryFilter::apply`] depends only on its inputs
//! and applying it to its own output changes nothing.

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use shared_types::{Recording, RecordingStatus};
use std::collections::BTreeSet;
use std::fmt;

/// Recording status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RecordingStatus),
}

impl StatusFilter {
    /// All → available → processing → failed → All
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(RecordingStatus::ALL[0]),
            StatusFilter::Only(current) => RecordingStatus::ALL
                .iter()
                .position(|s| s == current)
                .and_then(|i| RecordingStatus::ALL.get(i + 1))
                .map(|s| StatusFilter::Only(*s))
                .unwrap_or(StatusFilter::All),
        }
    }

    fn matches(&self, status: RecordingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

/// Company filter: all companies or one exact company id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompanyFilter {
    #[default]
    All,
    Only(String),
}

impl CompanyFilter {
    /// Step through `companies` in order, wrapping back to `All`.
    pub fn next(&self, companies: &[String]) -> Self {
        let next_index = match self {
            CompanyFilter::All => 0,
            CompanyFilter::Only(current) => companies
                .iter()
                .position(|c| c == current)
                .map(|i| i + 1)
                .unwrap_or(companies.len()),
        };
        companies
            .get(next_index)
            .map(|c| CompanyFilter::Only(c.clone()))
            .unwrap_or(CompanyFilter::All)
    }

    fn matches(&self, company_id: &str) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::Only(wanted) => wanted == company_id,
        }
    }
}

impl fmt::Display for CompanyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyFilter::All => f.write_str("all"),
            CompanyFilter::Only(company) => f.write_str(company),
        }
    }
}

/// Recording date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateFilter {
    pub fn next(&self) -> Self {
        match self {
            DateFilter::All => DateFilter::Today,
            DateFilter::Today => DateFilter::Week,
            DateFilter::Week => DateFilter::Month,
            DateFilter::Month => DateFilter::All,
        }
    }

    /// Earliest admitted recording date, evaluated in `now`'s time zone:
    /// midnight today, seven days back, or one calendar month back.
    pub fn cutoff<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        match self {
            DateFilter::All => None,
            DateFilter::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| midnight.and_local_timezone(now.timezone()).earliest())
                .map(|start| start.with_timezone(&Utc)),
            DateFilter::Week => Some((now.clone() - Duration::days(7)).with_timezone(&Utc)),
            DateFilter::Month => now
                .clone()
                .checked_sub_months(Months::new(1))
                .map(|start| start.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateFilter::All => "all",
            DateFilter::Today => "today",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
        })
    }
}

/// Combined history filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryFilter {
    pub search: String,
    pub status: StatusFilter,
    pub company: CompanyFilter,
    pub date: DateFilter,
}

impl HistoryFilter {
    /// Recordings passing every criterion, in input order.
    pub fn apply<Tz: TimeZone>(&self, recordings: &[Recording], now: &DateTime<Tz>) -> Vec<Recording> {
        let cutoff = self.date.cutoff(now);
        let needle = self.search.to_lowercase();

        recordings
            .iter()
            .filter(|r| self.matches_search(r, &needle))
            .filter(|r| self.status.matches(r.status))
            .filter(|r| self.company.matches(&r.company_id))
            .filter(|r| cutoff.map_or(true, |start| r.date >= start))
            .cloned()
            .collect()
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Names and ids match case-insensitively; phone numbers are plain
    /// substrings.
    fn matches_search(&self, recording: &Recording, needle: &str) -> bool {
        if self.search.is_empty() {
            return true;
        }
        recording.client_name.to_lowercase().contains(needle)
            || recording.phone_number.contains(&self.search)
            || recording.driver_phone.contains(&self.search)
            || recording.driver_id.to_lowercase().contains(needle)
            || recording.company_id.to_lowercase().contains(needle)
    }
}

/// Summary counters shown above the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub total: usize,
    pub available: usize,
    pub drivers: usize,
    pub companies: usize,
}

impl HistoryStats {
    pub fn from_recordings(recordings: &[Recording]) -> Self {
        let drivers: BTreeSet<&str> = recordings
            .iter()
            .map(|r| r.driver_id.as_str())
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            total: recordings.len(),
            available: recordings
                .iter()
                .filter(|r| r.status == RecordingStatus::Available)
                .count(),
            drivers: drivers.len(),
            companies: companies(recordings).len(),
        }
    }
}

/// Sorted distinct non-empty company ids.
pub fn companies(recordings: &[Recording]) -> Vec<String> {
    recordings
        .iter()
        .map(|r| r.company_id.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MockFeed;
    use chrono::FixedOffset;
    use proptest::prelude::*;

    fn recordings() -> Vec<Recording> {
        MockFeed::new().recording_list()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let all = recordings();
        let filtered = HistoryFilter::default().apply(&all, &Utc::now());
        assert_eq!(filtered, all);
    }

    #[test]
    fn test_search_is_case_insensitive_on_ids() {
        let filter = HistoryFilter {
            search: "div876".into(),
            ..Default::default()
        };
        let ids: Vec<String> = filter
            .apply(&recordings(), &Utc::now())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["rec_2", "rec_5"]);
    }

    #[test]
    fn test_search_matches_phone_substring() {
        let filter = HistoryFilter {
            search: "056-789".into(),
            ..Default::default()
        };
        let found = filter.apply(&recordings(), &Utc::now());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "rec_4");
    }

    #[test]
    fn test_status_and_company() {
        let filter = HistoryFilter {
            status: StatusFilter::Only(RecordingStatus::Available),
            company: CompanyFilter::Only("C123456789".into()),
            ..Default::default()
        };
        let ids: Vec<String> = filter
            .apply(&recordings(), &Utc::now())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["rec_1", "rec_4"]);
    }

    #[test]
    fn test_date_cutoffs() {
        let now = utc(2024, 1, 15, 12, 0);
        assert_eq!(DateFilter::All.cutoff(&now), None);
        assert_eq!(DateFilter::Today.cutoff(&now), Some(utc(2024, 1, 15, 0, 0)));
        assert_eq!(DateFilter::Week.cutoff(&now), Some(utc(2024, 1, 8, 12, 0)));
        assert_eq!(DateFilter::Month.cutoff(&now), Some(utc(2023, 12, 15, 12, 0)));
    }

    #[test]
    fn test_today_uses_local_midnight() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap();
        assert_eq!(DateFilter::Today.cutoff(&now), Some(utc(2024, 1, 14, 22, 0)));
    }

    #[test]
    fn test_today_filter_on_mock_history() {
        let filter = HistoryFilter {
            date: DateFilter::Today,
            ..Default::default()
        };
        let ids: Vec<String> = filter
            .apply(&recordings(), &utc(2024, 1, 15, 18, 0))
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["rec_1", "rec_2"]);
    }

    #[test]
    fn test_stats() {
        let stats = HistoryStats::from_recordings(&recordings());
        assert_eq!(
            stats,
            HistoryStats {
                total: 5,
                available: 3,
                drivers: 3,
                companies: 3,
            }
        );
        assert_eq!(
            companies(&recordings()),
            vec!["C123456789", "C555666777", "C987654321"]
        );
    }

    #[test]
    fn test_filter_cycling() {
        assert_eq!(
            StatusFilter::All.next(),
            StatusFilter::Only(RecordingStatus::Available)
        );
        assert_eq!(
            StatusFilter::Only(RecordingStatus::Failed).next(),
            StatusFilter::All
        );
        assert_eq!(DateFilter::Month.next(), DateFilter::All);

        let list = companies(&recordings());
        let first = CompanyFilter::All.next(&list);
        assert_eq!(first, CompanyFilter::Only("C123456789".into()));
        let last = CompanyFilter::Only("C987654321".into()).next(&list);
        assert_eq!(last, CompanyFilter::All);
    }

    fn filter_strategy() -> impl Strategy<Value = HistoryFilter> {
        (
            prop::sample::select(vec!["", "c1", "DIV", "050", "לוי", "Sarah"]),
            prop::sample::select(vec![
                StatusFilter::All,
                StatusFilter::Only(RecordingStatus::Available),
                StatusFilter::Only(RecordingStatus::Failed),
            ]),
            prop::sample::select(vec![
                CompanyFilter::All,
                CompanyFilter::Only("C987654321".to_string()),
            ]),
            prop::sample::select(vec![
                DateFilter::All,
                DateFilter::Today,
                DateFilter::Week,
                DateFilter::Month,
            ]),
        )
            .prop_map(|(search, status, company, date)| HistoryFilter {
                search: search.to_string(),
                status,
                company,
                date,
            })
    }

    proptest! {
        #[test]
        fn prop_apply_is_idempotent(filter in filter_strategy(), hours in 0i64..24 * 60) {
            let now = utc(2024, 1, 10, 0, 0) + Duration::hours(hours);
            let once = filter.apply(&recordings(), &now);
            let twice = filter.apply(&once, &now);
            prop_assert_eq!(once, twice);
        }
    }
}
