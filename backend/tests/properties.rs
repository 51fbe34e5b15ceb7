//! Property tests for the banner and directory engines.

mod support;

use chrono::{Duration as ChronoDuration, NaiveDate};
use eduportal::db::InMemoryStore;
use eduportal::models::{
    DirectoryRecord, FixedOffsetZone, Schedule, UtcMillis, Window, MILLIS_PER_DAY,
    MILLIS_PER_HOUR,
};
use eduportal::services::{
    apply_filters, format_countdown, page_links, paginate, resolve_banner, total_pages,
    BannerController, BannerDecision, BannerLabels, DismissalTracker, FilterState, PageLink,
    Phase, SuppressReason,
};
use proptest::prelude::*;

use support::tashkent;

/// (days after the previous window, start minute, window length in minutes)
type DaySpec = (i64, u32, u32);

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
}

fn hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn build_schedule(days: &[DaySpec]) -> Schedule {
    let mut date = base_date();
    let windows = days
        .iter()
        .enumerate()
        .map(|(i, &(step, start, len))| {
            if i > 0 {
                date += ChronoDuration::days(step);
            }
            Window::new(date.format("%Y-%m-%d").to_string(), hhmm(start), hhmm(start + len))
        })
        .collect();
    Schedule::new(windows)
}

fn day_specs() -> impl Strategy<Value = Vec<DaySpec>> {
    prop::collection::vec((1i64..=2, 0u32..720, 1u32..720), 1..12)
}

/// Any instant from three days before the period to a week after it.
fn around_period() -> impl Strategy<Value = UtcMillis> {
    let start = tashkent(2, 16, 0, 0, 0);
    start..start + 35 * MILLIS_PER_DAY
}

fn record_strategy() -> impl Strategy<Value = DirectoryRecord> {
    let titles = prop::sample::select(vec![
        "Tashkent State University",
        "Samarkand State University",
        "Inha University in Tashkent",
        "Bukhara Medical Institute",
        "Open Physics Textbook",
    ]);
    let regions = prop::sample::select(vec!["Tashkent", "tashkent", "Samarkand", "Bukhara", ""]);
    let kinds = prop::sample::select(vec!["State", "Private", "state", ""]);

    (titles, regions, kinds).prop_map(|(title, region, kind)| {
        let mut record = DirectoryRecord::new(title);
        if !region.is_empty() {
            record = record.with_region(region);
        }
        if !kind.is_empty() {
            record = record.with_kind(kind);
        }
        record
    })
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        prop::sample::select(vec!["", "tashkent", "STATE", "university", "textbook"]),
        prop::sample::select(vec!["", "Tashkent", "tashkent", "Samarkand"]),
        prop::sample::select(vec!["", "State", "Private"]),
    )
        .prop_map(|(search, region, kind)| {
            FilterState::default()
                .with_search(search)
                .with_region(region)
                .with_kind(kind)
        })
}

fn titles(records: &[&DirectoryRecord]) -> Vec<String> {
    records.iter().map(|r| r.title.clone()).collect()
}

proptest! {
    #[test]
    fn prop_phase_is_total_and_targets_the_future(days in day_specs(), now in around_period()) {
        let schedule = build_schedule(&days);
        let decision = resolve_banner(
            &schedule,
            &FixedOffsetZone::uzbekistan(),
            &BannerLabels::default(),
            now,
        );

        match decision {
            BannerDecision::Render(state) => {
                prop_assert!(state.target_timestamp > now);
                prop_assert_eq!(state.day_number.is_none(), state.phase == Phase::BeforePeriod);
                prop_assert!(state.phase != Phase::PeriodOver);
            }
            BannerDecision::Suppress(reason) => {
                prop_assert!(matches!(
                    reason,
                    SuppressReason::PeriodOver
                        | SuppressReason::FinalWindowClosed
                        | SuppressReason::NoWindowToday
                ));
            }
        }
    }

    #[test]
    fn prop_countdown_decreases_inside_a_window(
        days in day_specs(),
        pick in any::<prop::sample::Index>(),
        first in 0.0..1.0f64,
        second in 0.0..1.0f64,
    ) {
        let schedule = build_schedule(&days);
        let zone = FixedOffsetZone::uzbekistan();
        let entries: Vec<_> = schedule.entries().collect();
        let entry = &entries[pick.index(entries.len())];
        let open = entry.parsed.start_instant(&zone);
        let close = entry.parsed.end_instant(&zone);

        let span = (close - open) as f64;
        let (lo, hi) = if first <= second { (first, second) } else { (second, first) };
        let a = open + (span * lo) as i64;
        let b = open + (span * hi) as i64;
        prop_assume!(b - a >= 1_000 && b < close);

        let labels = BannerLabels::default();
        let at_a = resolve_banner(&schedule, &zone, &labels, a);
        let at_b = resolve_banner(&schedule, &zone, &labels, b);
        prop_assert_eq!(at_a.phase(), Some(Phase::InsideWindow));
        prop_assert_eq!(at_b.phase(), Some(Phase::InsideWindow));

        let later = format_countdown(close, b);
        let earlier = format_countdown(close, a);
        prop_assert!(earlier > later, "{} should be after {}", earlier, later);
    }

    #[test]
    fn prop_dismissal_hides_until_expiry(
        at in around_period(),
        hours in 1i64..48,
        delta in 0i64..72 * MILLIS_PER_HOUR,
    ) {
        let schedule = build_schedule(&[(1, 354, 731), (1, 353, 733)]);
        let zone = FixedOffsetZone::uzbekistan();
        let labels = BannerLabels::default();
        let mut banner = BannerController::new(
            schedule.clone(),
            zone,
            labels.clone(),
            hours * MILLIS_PER_HOUR,
            DismissalTracker::new(InMemoryStore::new(), "hidden_until"),
        );
        banner.dismiss(at).unwrap();

        let later = at + delta;
        let decision = banner.decision(later);
        if delta < hours * MILLIS_PER_HOUR {
            prop_assert_eq!(decision, BannerDecision::Suppress(SuppressReason::Dismissed));
        } else {
            prop_assert_eq!(decision, resolve_banner(&schedule, &zone, &labels, later));
        }
    }

    #[test]
    fn prop_filters_commute(
        records in prop::collection::vec(record_strategy(), 0..40),
        filters in filter_strategy(),
    ) {
        let combined = titles(&apply_filters(&records, &filters));

        let search_only = FilterState::default().with_search(filters.search.clone());
        let region_only = FilterState::default().with_region(filters.region.clone());
        let kind_only = FilterState::default().with_kind(filters.kind.clone());

        let chain = |order: [&FilterState; 3]| -> Vec<String> {
            let mut current: Vec<&DirectoryRecord> = records.iter().collect();
            for step in order {
                current.retain(|r| step.matches(*r));
            }
            titles(&current)
        };

        prop_assert_eq!(&chain([&search_only, &region_only, &kind_only]), &combined);
        prop_assert_eq!(&chain([&kind_only, &region_only, &search_only]), &combined);
        prop_assert_eq!(&chain([&region_only, &search_only, &kind_only]), &combined);
    }

    #[test]
    fn prop_region_filter_is_case_sensitive(records in prop::collection::vec(record_strategy(), 0..40)) {
        let lower = apply_filters(&records, &FilterState::default().with_region("tashkent"));
        prop_assert!(lower.iter().all(|r| r.region.as_ref().and_then(|v| v.primary()) == Some("tashkent")));
    }

    #[test]
    fn prop_pagination_resets_out_of_range(
        count in 0usize..200,
        page_size in 1usize..30,
        page in -5i64..30,
    ) {
        let records: Vec<usize> = (0..count).collect();
        let result = paginate(&records, page, page_size);
        let total = total_pages(count, page_size);

        prop_assert_eq!(result.total_pages, total);
        let in_range = page >= 1 && (page as usize) <= total;
        let expected = if in_range { page as usize } else { 1 };
        prop_assert_eq!(result.effective_page, expected);

        let offset = (expected - 1) * page_size;
        prop_assert_eq!(result.items.len(), page_size.min(count.saturating_sub(offset)));
        prop_assert_eq!(result.items.first().copied(), records.get(offset).copied());
    }

    #[test]
    fn prop_page_links_are_well_formed(total in 1usize..80, current_seed in any::<prop::sample::Index>()) {
        let current = current_seed.index(total) + 1;
        let links = page_links(current, total);

        prop_assert!(links.len() <= 7);
        prop_assert_eq!(links.first(), Some(&PageLink::Page(1)));
        prop_assert_eq!(links.last(), Some(&PageLink::Page(total)));
        prop_assert!(links.contains(&PageLink::Page(current)));

        let pages: Vec<usize> = links
            .iter()
            .filter_map(|l| match l {
                PageLink::Page(n) => Some(*n),
                PageLink::Ellipsis => None,
            })
            .collect();
        prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(links.windows(2).all(|w| !(w[0] == PageLink::Ellipsis && w[1] == PageLink::Ellipsis)));
    }
}
