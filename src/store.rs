//! Single view state shared by every page.
//!
//! Browser interactions become [`Action`]s. [`Store::dispatch`] applies an
//! action and returns the [`Load`]s it needs; their outcomes come back as
//! [`Action::Loaded`]. Each load carries a [`Ticket`] so that a response
//! issued before a newer navigation (or a newer load of the same section)
//! is dropped instead of overwriting the view.

use crate::chart::{tag_weights, MonthlyChart, TagWeight};
use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{
    Checkin, CheckinForm, DailyCount, ListPage, Record, RecordForm, Summary, TagCount,
};
use crate::notify::{Notifications, ToastKind};
use crate::pagination::Pagination;
use chrono::{Datelike, NaiveDate};
use std::{collections::HashMap, fmt, str::FromStr, time::Instant};
use tracing::{debug, error, warn};

pub const OFFLINE_WARNING: &str = "Cannot reach the server, please try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Records,
    Checkin,
    Stats,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Records, Page::Checkin, Page::Stats];

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Records => "records",
            Page::Checkin => "checkin",
            Page::Stats => "stats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Records => "Records",
            Page::Checkin => "Check-in",
            Page::Stats => "Stats",
        }
    }
}

impl FromStr for Page {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.as_str() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Health,
    Summary,
    RecentRecords,
    RecentCheckins,
    Records,
    Checkins,
    Monthly,
    Tags,
}

impl Section {
    fn failure_message(self) -> &'static str {
        match self {
            Section::Health => OFFLINE_WARNING,
            Section::Summary => "Failed to load data",
            Section::RecentRecords | Section::Records => "Failed to load records",
            Section::RecentCheckins | Section::Checkins => "Failed to load check-ins",
            Section::Monthly => "Failed to load monthly stats",
            Section::Tags => "Failed to load tag analysis",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Generation token of one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub section: Section,
    pub epoch: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Health,
    Summary,
    RecentRecords { per_page: u32 },
    RecentCheckins { per_page: u32 },
    Records { page: u32, per_page: u32, search: Option<String> },
    Checkins { page: u32, per_page: u32 },
    Monthly { year: i32, month: u32 },
    Tags,
}

impl Request {
    pub fn section(&self) -> Section {
        match self {
            Request::Health => Section::Health,
            Request::Summary => Section::Summary,
            Request::RecentRecords { .. } => Section::RecentRecords,
            Request::RecentCheckins { .. } => Section::RecentCheckins,
            Request::Records { .. } => Section::Records,
            Request::Checkins { .. } => Section::Checkins,
            Request::Monthly { .. } => Section::Monthly,
            Request::Tags => Section::Tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    pub ticket: Ticket,
    pub request: Request,
}

#[derive(Debug)]
pub enum Payload {
    Health,
    Summary(Summary),
    RecentRecords(Vec<Record>),
    RecentCheckins(Vec<Checkin>),
    Records(ListPage<Record>),
    Checkins(ListPage<Checkin>),
    Monthly(Vec<DailyCount>),
    Tags(Vec<TagCount>),
}

#[derive(Debug)]
pub struct Loaded {
    pub ticket: Ticket,
    pub request: Request,
    pub result: Result<Payload, ApiError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Dashboard,
    Records {
        page: Option<u32>,
        search: Option<String>,
    },
    Checkin {
        page: Option<u32>,
    },
    Stats {
        year: Option<i32>,
        month: Option<u32>,
    },
}

impl Route {
    pub fn page(&self) -> Page {
        match self {
            Route::Dashboard => Page::Dashboard,
            Route::Records { .. } => Page::Records,
            Route::Checkin { .. } => Page::Checkin,
            Route::Stats { .. } => Page::Stats,
        }
    }
}

#[derive(Debug)]
pub enum Action {
    Boot { today: NaiveDate },
    Navigate(Route),
    Loaded(Loaded),
    RecordSubmitted {
        form: RecordForm,
        result: Result<Record, ApiError>,
    },
    CheckinSubmitted {
        form: CheckinForm,
        result: Result<Checkin, ApiError>,
    },
}

#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub search: Option<String>,
    pub loaded: bool,
}

impl<T> ListView<T> {
    fn new(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(per_page),
            search: None,
            loaded: false,
        }
    }

    fn apply(&mut self, requested: u32, page: ListPage<T>) {
        self.pagination
            .apply_response(page.current_page.unwrap_or(requested), page.pages, page.total);
        self.items = page.items;
        self.loaded = true;
    }
}

#[derive(Debug)]
pub struct Store {
    pub page: Page,
    pub today: NaiveDate,
    pub connected: Option<bool>,
    pub summary: Option<Summary>,
    pub recent_records: Vec<Record>,
    pub recent_checkins: Vec<Checkin>,
    pub records: ListView<Record>,
    pub checkins: ListView<Checkin>,
    pub stats_year: i32,
    pub stats_month: u32,
    pub monthly: Option<MonthlyChart>,
    pub tags: Vec<TagWeight>,
    pub record_form: RecordForm,
    pub checkin_form: CheckinForm,
    pub notifications: Notifications,
    recent_per_page: u32,
    epoch: u64,
    issued: HashMap<Section, u64>,
}

impl Store {
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        Self {
            page: Page::Dashboard,
            today,
            connected: None,
            summary: None,
            recent_records: Vec::new(),
            recent_checkins: Vec::new(),
            records: ListView::new(config.records_per_page),
            checkins: ListView::new(config.checkins_per_page),
            stats_year: today.year(),
            stats_month: today.month(),
            monthly: None,
            tags: Vec::new(),
            record_form: RecordForm::with_date(today),
            checkin_form: CheckinForm::with_date(today),
            notifications: Notifications::default(),
            recent_per_page: config.recent_per_page,
            epoch: 0,
            issued: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Load> {
        self.dispatch_at(action, Instant::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> Vec<Load> {
        match action {
            Action::Boot { today } => self.boot(today),
            Action::Navigate(route) => self.navigate(route),
            Action::Loaded(loaded) => {
                self.apply_loaded(loaded, now);
                Vec::new()
            }
            Action::RecordSubmitted { form, result } => {
                match result {
                    Ok(record) => {
                        debug!(id = record.id, "record created");
                        self.record_form = RecordForm::with_date(self.today);
                        self.notifications.push_at(ToastKind::Success, "Record saved", now);
                    }
                    Err(err) => {
                        error!(error = %err, "failed to create record");
                        self.record_form = form;
                        self.notifications.push_at(
                            ToastKind::Error,
                            err.user_message("Failed to save record"),
                            now,
                        );
                    }
                }
                Vec::new()
            }
            Action::CheckinSubmitted { form, result } => {
                match result {
                    Ok(checkin) => {
                        debug!(id = checkin.id, "check-in created");
                        self.checkin_form = CheckinForm::with_date(self.today);
                        self.notifications.push_at(ToastKind::Success, "Check-in saved", now);
                    }
                    Err(err) => {
                        error!(error = %err, "failed to create check-in");
                        self.checkin_form = form;
                        self.notifications.push_at(
                            ToastKind::Error,
                            err.user_message("Failed to save check-in"),
                            now,
                        );
                    }
                }
                Vec::new()
            }
        }
    }

    fn boot(&mut self, today: NaiveDate) -> Vec<Load> {
        self.today = today;
        self.record_form = RecordForm::with_date(today);
        self.checkin_form = CheckinForm::with_date(today);
        self.stats_year = today.year();
        self.stats_month = today.month();

        let mut loads = self.navigate(Route::Dashboard);
        let per_page = self.recent_per_page;
        loads.push(self.issue(Request::RecentCheckins { per_page }));
        loads.push(self.issue(Request::Health));
        loads
    }

    fn navigate(&mut self, route: Route) -> Vec<Load> {
        self.epoch += 1;
        self.page = route.page();

        match route {
            Route::Dashboard => {
                let per_page = self.recent_per_page;
                vec![
                    self.issue(Request::Summary),
                    self.issue(Request::RecentRecords { per_page }),
                ]
            }
            Route::Records { page, search } => {
                let pagination = &self.records.pagination;
                let mut target =
                    page.unwrap_or_else(|| pagination.clamp(pagination.current_page));
                if let Some(search) = search {
                    let search = Some(search.trim().to_string()).filter(|s| !s.is_empty());
                    if search != self.records.search {
                        self.records.search = search;
                        self.records.pagination.reset();
                        target = 1;
                    }
                }
                let Some(page) = self.records.pagination.request(target) else {
                    debug!(page = target, "records page out of range, not requested");
                    return Vec::new();
                };
                let per_page = self.records.pagination.per_page;
                let search = self.records.search.clone();
                vec![self.issue(Request::Records {
                    page,
                    per_page,
                    search,
                })]
            }
            Route::Checkin { page } => {
                let pagination = &self.checkins.pagination;
                let target = page.unwrap_or_else(|| pagination.clamp(pagination.current_page));
                let Some(page) = self.checkins.pagination.request(target) else {
                    debug!(page = target, "check-in page out of range, not requested");
                    return Vec::new();
                };
                let per_page = self.checkins.pagination.per_page;
                vec![self.issue(Request::Checkins { page, per_page })]
            }
            Route::Stats { year, month } => {
                if let Some(year) = year.filter(|year| (1..=9999).contains(year)) {
                    self.stats_year = year;
                }
                if let Some(month) = month.filter(|month| (1..=12).contains(month)) {
                    self.stats_month = month;
                }
                let (year, month) = (self.stats_year, self.stats_month);
                vec![
                    self.issue(Request::Summary),
                    self.issue(Request::Monthly { year, month }),
                    self.issue(Request::Tags),
                ]
            }
        }
    }

    fn issue(&mut self, request: Request) -> Load {
        let section = request.section();
        let seq = self.issued.entry(section).or_insert(0);
        *seq += 1;
        Load {
            ticket: Ticket {
                section,
                epoch: self.epoch,
                seq: *seq,
            },
            request,
        }
    }

    /// Whether a response for `ticket` may still update the view.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.epoch == self.epoch && self.issued.get(&ticket.section) == Some(&ticket.seq)
    }

    fn apply_loaded(&mut self, loaded: Loaded, now: Instant) {
        let Loaded {
            ticket,
            request,
            result,
        } = loaded;

        if ticket.section == Section::Health {
            match result {
                Ok(_) => self.connected = Some(true),
                Err(err) => {
                    warn!(error = %err, "api health check failed");
                    self.connected = Some(false);
                    self.notifications.push_at(ToastKind::Warning, OFFLINE_WARNING, now);
                }
            }
            return;
        }

        if !self.is_current(&ticket) {
            debug!(
                section = %ticket.section,
                epoch = ticket.epoch,
                seq = ticket.seq,
                "dropping stale response"
            );
            return;
        }

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                error!(section = %ticket.section, error = %err, "load failed");
                self.notifications.push_at(
                    ToastKind::Error,
                    err.user_message(ticket.section.failure_message()),
                    now,
                );
                return;
            }
        };

        match (payload, request) {
            (Payload::Summary(summary), _) => self.summary = Some(summary),
            (Payload::RecentRecords(records), _) => self.recent_records = records,
            (Payload::RecentCheckins(checkins), _) => self.recent_checkins = checkins,
            (Payload::Records(page), Request::Records { page: requested, .. }) => {
                self.records.apply(requested, page)
            }
            (Payload::Checkins(page), Request::Checkins { page: requested, .. }) => {
                self.checkins.apply(requested, page)
            }
            (Payload::Monthly(counts), Request::Monthly { year, month }) => {
                self.monthly = Some(MonthlyChart::from_counts(year, month, &counts))
            }
            (Payload::Tags(tags), _) => self.tags = tag_weights(&tags),
            (payload, request) => {
                error!(?payload, ?request, "response does not match its request");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Phase;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn store() -> Store {
        let config = Config {
            records_per_page: 10,
            checkins_per_page: 5,
            recent_per_page: 5,
            ..Config::default()
        };
        Store::new(&config, today())
    }

    fn loaded(load: &Load, result: Result<Payload, ApiError>) -> Action {
        Action::Loaded(Loaded {
            ticket: load.ticket,
            request: load.request.clone(),
            result,
        })
    }

    fn summary(total_records: u64) -> Summary {
        Summary {
            total_records,
            total_checkins: 3,
            avg_mood_score: Some(7.2),
            recent_records: 2,
        }
    }

    fn records_page(ids: &[u64], total: u64) -> ListPage<Record> {
        ListPage {
            items: ids
                .iter()
                .map(|id| Record {
                    id: *id,
                    title: format!("record {id}"),
                    content: String::new(),
                    mood: None,
                    weather: None,
                    location: None,
                    record_date: today(),
                    tags: None,
                    media_files: Vec::new(),
                })
                .collect(),
            total: Some(total),
            pages: None,
            current_page: None,
        }
    }

    fn checkins_page(ids: &[u64], total: u64, pages: u32) -> ListPage<Checkin> {
        ListPage {
            items: ids
                .iter()
                .map(|id| Checkin {
                    id: *id,
                    date: today(),
                    sleep_hours: None,
                    exercise_minutes: None,
                    water_intake: None,
                    mood_score: None,
                    notes: None,
                })
                .collect(),
            total: Some(total),
            pages: Some(pages),
            current_page: None,
        }
    }

    fn records_route(page: Option<u32>) -> Route {
        Route::Records { page, search: None }
    }

    fn offline() -> ApiError {
        ApiError::Status {
            status: 503,
            message: None,
        }
    }

    #[test]
    fn page_names_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.as_str().parse::<Page>(), Ok(page));
        }
        assert!("settings".parse::<Page>().is_err());
    }

    #[test]
    fn boot_issues_dashboard_checkins_and_one_health_probe() {
        let mut store = store();
        let loads = store.dispatch(Action::Boot { today: today() });
        let sections: Vec<Section> = loads.iter().map(|load| load.ticket.section).collect();
        assert_eq!(
            sections,
            vec![
                Section::Summary,
                Section::RecentRecords,
                Section::RecentCheckins,
                Section::Health
            ]
        );
        assert_eq!(store.page, Page::Dashboard);
        assert_eq!(store.record_form.record_date, "2026-10-18");
    }

    #[test]
    fn failed_health_probe_warns_once_and_other_loads_still_apply() {
        let mut store = store();
        let loads = store.dispatch(Action::Boot { today: today() });
        let now = Instant::now();

        // Completion order differs from issue order.
        let health = loads.iter().find(|l| l.request == Request::Health).unwrap();
        store.dispatch_at(loaded(health, Err(offline())), now);
        let summary_load = loads.iter().find(|l| l.request == Request::Summary).unwrap();
        store.dispatch_at(loaded(summary_load, Ok(Payload::Summary(summary(5)))), now);

        assert_eq!(store.notifications.count_of(ToastKind::Warning), 1);
        assert_eq!(store.notifications.len(), 1);
        assert_eq!(store.connected, Some(false));
        assert_eq!(store.summary.as_ref().map(|s| s.total_records), Some(5));
    }

    #[test]
    fn navigating_twice_drops_the_first_response() {
        let mut store = store();
        let first = store.dispatch(Action::Navigate(Route::Dashboard));
        let second = store.dispatch(Action::Navigate(Route::Dashboard));
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);

        store.dispatch(loaded(&second[0], Ok(Payload::Summary(summary(9)))));
        store.dispatch(loaded(&first[0], Ok(Payload::Summary(summary(1)))));

        assert_eq!(store.summary.as_ref().map(|s| s.total_records), Some(9));
    }

    #[test]
    fn response_for_a_page_left_behind_is_dropped() {
        let mut store = store();
        let records = store.dispatch(Action::Navigate(Route::Records {
            page: None,
            search: None,
        }));
        store.dispatch(Action::Navigate(Route::Stats {
            year: None,
            month: None,
        }));

        store.dispatch(loaded(&records[0], Ok(Payload::Records(records_page(&[1, 2], 2)))));
        assert!(store.records.items.is_empty());
        assert!(!store.records.loaded);
        assert_eq!(store.page, Page::Stats);
    }

    #[test]
    fn records_pagination_follows_reported_total() {
        let mut store = store();
        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: None,
            search: None,
        }));
        assert_eq!(
            loads[0].request,
            Request::Records {
                page: 1,
                per_page: 10,
                search: None
            }
        );
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[1, 2, 3], 23)))));
        assert_eq!(store.records.pagination.total_pages, 3);
        assert_eq!(store.records.items.len(), 3);

        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: Some(4),
            search: None,
        }));
        assert!(loads.is_empty(), "page 4 of 3 must not be requested");
        assert_eq!(store.records.items.len(), 3);

        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: Some(3),
            search: None,
        }));
        assert_eq!(loads.len(), 1);
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[21, 22, 23], 23)))));
        assert_eq!(store.records.pagination.current_page, 3);
    }

    #[test]
    fn shrunken_records_list_is_reloaded_on_plain_revisit() {
        let mut store = store();
        let loads = store.dispatch(Action::Navigate(records_route(None)));
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[1], 30)))));
        let loads = store.dispatch(Action::Navigate(records_route(Some(3))));
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[21], 30)))));
        assert_eq!(store.records.pagination.current_page, 3);

        // Reloading page 3 after rows were deleted on the server.
        let loads = store.dispatch(Action::Navigate(records_route(Some(3))));
        let mut shrunk = records_page(&[], 15);
        shrunk.pages = Some(2);
        shrunk.current_page = Some(3);
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(shrunk))));
        assert_eq!(store.records.pagination.total_pages, 2);
        assert_eq!(store.records.pagination.current_page, 2);

        let loads = store.dispatch(Action::Navigate(records_route(None)));
        assert_eq!(
            loads.iter().map(|l| l.request.clone()).collect::<Vec<_>>(),
            vec![Request::Records {
                page: 2,
                per_page: 10,
                search: None
            }]
        );
    }

    #[test]
    fn checkin_pagination_clamps_and_drops_stale_pages() {
        let mut store = store();
        let first = store.dispatch(Action::Navigate(Route::Checkin { page: None }));
        assert_eq!(
            first[0].request,
            Request::Checkins {
                page: 1,
                per_page: 5
            }
        );
        store.dispatch(loaded(&first[0], Ok(Payload::Checkins(checkins_page(&[1, 2], 12, 3)))));
        assert_eq!(store.checkins.pagination.total_pages, 3);

        assert!(store.dispatch(Action::Navigate(Route::Checkin { page: Some(0) })).is_empty());
        assert!(store.dispatch(Action::Navigate(Route::Checkin { page: Some(4) })).is_empty());

        let second = store.dispatch(Action::Navigate(Route::Checkin { page: Some(2) }));
        let third = store.dispatch(Action::Navigate(Route::Checkin { page: Some(3) }));
        store.dispatch(loaded(&third[0], Ok(Payload::Checkins(checkins_page(&[11], 12, 3)))));
        store.dispatch(loaded(&second[0], Ok(Payload::Checkins(checkins_page(&[6, 7], 12, 3)))));

        assert_eq!(store.checkins.pagination.current_page, 3);
        assert_eq!(
            store.checkins.items.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![11]
        );
        assert!(store.checkins.pagination.next().is_none());
    }

    #[test]
    fn failed_list_loads_report_and_keep_the_view_usable() {
        let mut store = store();
        let now = Instant::now();
        let loads = store.dispatch(Action::Navigate(records_route(None)));
        store.dispatch_at(
            loaded(&loads[0], Ok(Payload::Records(records_page(&[1, 2], 2)))),
            now,
        );

        let loads = store.dispatch(Action::Navigate(records_route(None)));
        let failure = ApiError::Status {
            status: 500,
            message: Some("database locked".into()),
        };
        store.dispatch_at(loaded(&loads[0], Err(failure)), now);
        assert_eq!(store.records.items.len(), 2);
        assert_eq!(store.page, Page::Records);

        let loads = store.dispatch(Action::Navigate(Route::Checkin { page: None }));
        store.dispatch_at(loaded(&loads[0], Err(offline())), now);
        assert!(!store.checkins.loaded);

        let messages: Vec<&str> = store
            .notifications
            .active_at(now)
            .map(|(toast, _)| toast.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec!["Failed to load records: database locked", "Failed to load check-ins"]
        );
        assert_eq!(store.notifications.count_of(ToastKind::Error), 2);

        // Both tabs still issue their loads afterwards.
        assert_eq!(store.dispatch(Action::Navigate(records_route(None))).len(), 1);
        assert_eq!(store.dispatch(Action::Navigate(Route::Checkin { page: None })).len(), 1);
    }

    #[test]
    fn search_change_resets_to_first_page() {
        let mut store = store();
        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: None,
            search: None,
        }));
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[1], 30)))));
        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: Some(2),
            search: None,
        }));
        store.dispatch(loaded(&loads[0], Ok(Payload::Records(records_page(&[11], 30)))));
        assert_eq!(store.records.pagination.current_page, 2);

        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: Some(2),
            search: Some(" park ".into()),
        }));
        assert_eq!(
            loads[0].request,
            Request::Records {
                page: 1,
                per_page: 10,
                search: Some("park".into())
            }
        );

        // Same keyword again keeps the requested page.
        let loads = store.dispatch(Action::Navigate(Route::Records {
            page: Some(1),
            search: Some("park".into()),
        }));
        assert_eq!(loads.len(), 1);
    }

    #[test]
    fn stats_loads_are_independent() {
        let mut store = store();
        let loads = store.dispatch(Action::Navigate(Route::Stats {
            year: Some(2026),
            month: Some(9),
        }));
        assert_eq!(loads.len(), 3);

        let monthly = loads
            .iter()
            .find(|l| l.ticket.section == Section::Monthly)
            .unwrap();
        let tags = loads.iter().find(|l| l.ticket.section == Section::Tags).unwrap();
        store.dispatch(loaded(monthly, Err(offline())));
        store.dispatch(loaded(
            tags,
            Ok(Payload::Tags(vec![
                TagCount {
                    tag: "work".into(),
                    count: 4,
                },
                TagCount {
                    tag: "rest".into(),
                    count: 2,
                },
            ])),
        ));

        assert!(store.monthly.is_none());
        assert_eq!(store.tags.len(), 2);
        assert_eq!(store.tags[1].weight, 0.5);
        assert_eq!(store.notifications.count_of(ToastKind::Error), 1);
    }

    #[test]
    fn invalid_stats_period_keeps_current_one() {
        let mut store = store();
        let loads = store.dispatch(Action::Navigate(Route::Stats {
            year: Some(2025),
            month: Some(13),
        }));
        let monthly = loads
            .iter()
            .find(|l| l.ticket.section == Section::Monthly)
            .unwrap();
        assert_eq!(
            monthly.request,
            Request::Monthly {
                year: 2025,
                month: 10
            }
        );
    }

    #[test]
    fn failed_submission_keeps_form_and_reports_server_text() {
        let mut store = store();
        let form = CheckinForm {
            date: "2026-10-18".into(),
            notes: "slept badly".into(),
            ..CheckinForm::default()
        };
        let now = Instant::now();
        store.dispatch_at(
            Action::CheckinSubmitted {
                form: form.clone(),
                result: Err(ApiError::Rejected {
                    message: Some("already checked in today".into()),
                }),
            },
            now,
        );
        assert_eq!(store.checkin_form, form);
        let (toast, phase) = store.notifications.active_at(now).next().unwrap();
        assert_eq!(phase, Phase::Visible);
        assert_eq!(toast.message, "Failed to save check-in: already checked in today");

        store.notifications.prune_at(now + Duration::from_secs(4));
        assert!(store.notifications.is_empty());
    }

    #[test]
    fn successful_submission_resets_form() {
        let mut store = store();
        let form = RecordForm {
            title: "Walk".into(),
            content: "park".into(),
            record_date: "2026-10-17".into(),
            ..RecordForm::default()
        };
        let record = records_page(&[7], 1).items.remove(0);
        store.dispatch(Action::RecordSubmitted {
            form,
            result: Ok(record),
        });
        assert_eq!(store.record_form, RecordForm::with_date(today()));
        assert_eq!(store.notifications.count_of(ToastKind::Success), 1);
    }
}
