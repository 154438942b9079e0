use crate::models::{Checkin, CheckinForm, Mood, Record, RecordForm, Weather};
use crate::notify::{Phase, ToastKind};
use crate::pagination::Pagination;
use crate::store::{ListView, Page, Store};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write;
use std::time::Instant;

/// Bytes left unescaped in query values: RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn render_page(store: &Store, now: Instant) -> String {
    let page_section = |page: Page, body: String| {
        let class = if store.page == page { "page active" } else { "page" };
        format!(r#"<section id="{id}-page" class="{class}">{body}</section>"#, id = page.as_str())
    };

    fill(
        INDEX_HTML,
        &[
            ("STATUS", render_status(store.connected)),
            ("NAV", render_nav(store.page)),
            ("MESSAGES", render_messages(store, now)),
            ("DASHBOARD", page_section(Page::Dashboard, render_dashboard(store))),
            ("RECORDS", page_section(Page::Records, render_records_page(store))),
            ("CHECKIN", page_section(Page::Checkin, render_checkin_page(store))),
            ("STATS", page_section(Page::Stats, render_stats_page(store))),
        ],
    )
}

/// Substitutes `{{NAME}}` slots in one pass, so inserted text is never rescanned.
fn fill(template: &str, slots: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let slot = after.find("}}").and_then(|end| {
            slots
                .iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (end, value))
        });
        match slot {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_status(connected: Option<bool>) -> String {
    let (class, label) = match connected {
        Some(true) => ("online", "Connected"),
        Some(false) => ("offline", "Offline"),
        None => ("unknown", "Checking connection"),
    };
    format!(r#"<span id="connection" class="status {class}">{label}</span>"#)
}

fn render_nav(active: Page) -> String {
    Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == active { "nav-link active" } else { "nav-link" };
            format!(
                r#"<a class="{class}" href="/pages/{id}" data-page="{id}">{label}</a>"#,
                id = page.as_str(),
                label = page.label()
            )
        })
        .collect()
}

fn render_messages(store: &Store, now: Instant) -> String {
    store
        .notifications
        .active_at(now)
        .map(|(toast, phase)| {
            let icon = match toast.kind {
                ToastKind::Success => "&#10004;",
                ToastKind::Error => "&#10006;",
                ToastKind::Warning => "&#9888;",
            };
            let fading = if phase == Phase::Fading { " fading" } else { "" };
            format!(
                r#"<div class="message {kind}{fading}" data-id="{id}" data-remaining-ms="{ms}"><span class="icon">{icon}</span><span>{message}</span></div>"#,
                id = toast.id,
                kind = toast.kind.as_str(),
                ms = toast.remaining_at(now).as_millis(),
                message = text(&toast.message),
            )
        })
        .collect()
}

fn stat(id: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="stat"><span class="label">{label}</span><span id="{id}" class="value">{value}</span></div>"#,
        value = text(value)
    )
}

fn render_summary(store: &Store, prefix: &str) -> String {
    let (records, checkins, mood, recent) = match &store.summary {
        Some(summary) => (
            summary.total_records.to_string(),
            summary.total_checkins.to_string(),
            summary
                .avg_mood_score
                .map(|score| score.to_string())
                .unwrap_or_else(|| "--".to_string()),
            summary.recent_records.to_string(),
        ),
        None => ("--".into(), "--".into(), "--".into(), "--".into()),
    };
    format!(
        r#"<div class="panel">{}{}{}{}</div>"#,
        stat(&format!("{prefix}total-records"), "Records", &records),
        stat(&format!("{prefix}total-checkins"), "Check-ins", &checkins),
        stat(&format!("{prefix}avg-mood"), "Average mood", &mood),
        stat(&format!("{prefix}recent-records"), "Last 7 days", &recent),
    )
}

fn render_dashboard(store: &Store) -> String {
    format!(
        r#"<h2>Overview</h2>{summary}<div class="columns"><div><h3>Recent records</h3>{records}</div><div><h3>Recent check-ins</h3>{checkins}</div></div>"#,
        summary = render_summary(store, ""),
        records = render_record_list(
            "recent-records-list",
            &store.recent_records,
            "No records yet"
        ),
        checkins = render_checkin_list(
            "recent-checkins-list",
            &store.recent_checkins,
            "No check-ins yet"
        ),
    )
}

/// Placeholder for an empty list, telling a failed load apart from an empty one.
fn empty_text<T>(view: &ListView<T>, empty: &'static str) -> &'static str {
    if view.loaded { empty } else { "Not loaded yet" }
}

fn render_record_list(id: &str, records: &[Record], empty: &str) -> String {
    if records.is_empty() {
        return format!(r#"<ul id="{id}" class="list"><li class="empty">{empty}</li></ul>"#);
    }
    let mut html = format!(r#"<ul id="{id}" class="list">"#);
    for record in records {
        let mut meta = vec![record.record_date.to_string()];
        if let Some(mood) = record.mood {
            meta.push(mood.label().to_string());
        }
        if let Some(weather) = record.weather {
            meta.push(weather.label().to_string());
        }
        if let Some(location) = record.location.as_deref().filter(|l| !l.is_empty()) {
            meta.push(location.to_string());
        }
        if !record.media_files.is_empty() {
            meta.push(format!("{} attachment(s)", record.media_files.len()));
        }
        let tags: String = record
            .tag_list()
            .iter()
            .map(|tag| format!(r#"<span class="tag">{}</span>"#, text(tag)))
            .collect();
        let _ = write!(
            html,
            r#"<li class="record" data-id="{id}"><strong>{title}</strong><span class="meta">{meta}</span><p>{content}</p>{tags}</li>"#,
            id = record.id,
            title = text(&record.title),
            meta = text(&meta.join(" · ")),
            content = text(&record.content),
        );
    }
    html.push_str("</ul>");
    html
}

fn render_checkin_list(id: &str, checkins: &[Checkin], empty: &str) -> String {
    if checkins.is_empty() {
        return format!(r#"<ul id="{id}" class="list"><li class="empty">{empty}</li></ul>"#);
    }
    let mut html = format!(r#"<ul id="{id}" class="list">"#);
    for checkin in checkins {
        let mut facts = Vec::new();
        if let Some(hours) = checkin.sleep_hours {
            facts.push(format!("sleep {hours} h"));
        }
        if let Some(minutes) = checkin.exercise_minutes {
            facts.push(format!("exercise {minutes} min"));
        }
        if let Some(water) = checkin.water_intake {
            facts.push(format!("water {water} ml"));
        }
        if let Some(score) = checkin.mood_score {
            facts.push(format!("mood {score}/10"));
        }
        let _ = write!(
            html,
            r#"<li class="checkin" data-id="{id}"><strong>{date}</strong><span class="meta">{facts}</span>{notes}</li>"#,
            id = checkin.id,
            date = checkin.date,
            facts = text(&facts.join(" · ")),
            notes = checkin
                .notes
                .as_deref()
                .map(|notes| format!("<p>{}</p>", text(notes)))
                .unwrap_or_default(),
        );
    }
    html.push_str("</ul>");
    html
}

fn render_pager(page: Page, pagination: &Pagination, search: Option<&str>) -> String {
    let search = search
        .map(|s| format!("&amp;search={}", utf8_percent_encode(s, QUERY_VALUE)))
        .unwrap_or_default();
    let link = |target: Option<u32>, label: &str, rel: &str| match target {
        Some(target) => format!(
            r#"<a class="pager-link" rel="{rel}" href="/pages/{id}?page={target}{search}">{label}</a>"#,
            id = page.as_str()
        ),
        None => format!(r#"<span class="pager-link disabled">{label}</span>"#),
    };
    format!(
        r#"<nav class="pager">{prev}<span class="pager-status">Page {current} of {total}</span>{next}</nav>"#,
        prev = link(pagination.prev(), "Previous", "prev"),
        next = link(pagination.next(), "Next", "next"),
        current = pagination.current_page,
        total = pagination.last_page(),
    )
}

fn options<T: Copy>(
    all: &[T],
    selected: &str,
    value: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> String {
    let mut html = String::from(r#"<option value="">--</option>"#);
    for item in all.iter().copied() {
        let chosen = if value(item) == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{chosen}>{}</option>"#,
            value(item),
            label(item)
        );
    }
    html
}

fn render_record_form(form: &RecordForm) -> String {
    format!(
        r#"<form id="record-form" method="post" action="/records" enctype="multipart/form-data">
  <label>Title<input name="title" required value="{title}" /></label>
  <label>Date<input type="date" id="date" name="record_date" required value="{date}" /></label>
  <label>Mood<select name="mood">{moods}</select></label>
  <label>Weather<select name="weather">{weathers}</select></label>
  <label>Location<input name="location" value="{location}" /></label>
  <label>Tags<input name="tags" placeholder="comma, separated" value="{tags}" /></label>
  <label class="wide">Content<textarea name="content" required>{content}</textarea></label>
  <label class="wide">Media<input type="file" name="media" multiple accept="image/*,video/*,audio/*" /></label>
  <button type="submit" class="btn-primary">Save record</button>
</form>"#,
        title = attr(&form.title),
        date = attr(&form.record_date),
        moods = options(Mood::ALL, &form.mood, Mood::as_str, Mood::label),
        weathers = options(Weather::ALL, &form.weather, Weather::as_str, Weather::label),
        location = attr(&form.location),
        tags = attr(&form.tags),
        content = text(&form.content),
    )
}

fn render_records_page(store: &Store) -> String {
    let search = store.records.search.as_deref();
    format!(
        r#"<h2>Records</h2>{form}<form id="search-form" method="get" action="/pages/records"><input type="search" name="search" placeholder="Search records" value="{search}" /><button type="submit">Search</button></form>{list}{pager}"#,
        form = render_record_form(&store.record_form),
        search = attr(search.unwrap_or_default()),
        list = render_record_list(
            "records-list",
            &store.records.items,
            empty_text(&store.records, "No records yet")
        ),
        pager = render_pager(Page::Records, &store.records.pagination, search),
    )
}

fn render_checkin_form(form: &CheckinForm) -> String {
    format!(
        r#"<form id="checkin-form" method="post" action="/checkins">
  <label>Date<input type="date" id="checkin-date" name="date" required value="{date}" /></label>
  <label>Sleep (hours)<input type="number" name="sleep_hours" min="0" max="24" step="0.5" value="{sleep}" /></label>
  <label>Exercise (minutes)<input type="number" name="exercise_minutes" min="0" value="{exercise}" /></label>
  <label>Water (ml)<input type="number" name="water_intake" min="0" step="50" value="{water}" /></label>
  <label>Mood score<input type="number" name="mood_score" min="1" max="10" value="{mood}" /></label>
  <label class="wide">Notes<textarea name="notes">{notes}</textarea></label>
  <button type="submit" class="btn-primary">Check in</button>
</form>"#,
        date = attr(&form.date),
        sleep = attr(&form.sleep_hours),
        exercise = attr(&form.exercise_minutes),
        water = attr(&form.water_intake),
        mood = attr(&form.mood_score),
        notes = text(&form.notes),
    )
}

fn render_checkin_page(store: &Store) -> String {
    format!(
        r#"<h2>Daily check-in</h2>{form}{list}{pager}"#,
        form = render_checkin_form(&store.checkin_form),
        list = render_checkin_list(
            "checkins-list",
            &store.checkins.items,
            empty_text(&store.checkins, "No check-ins yet")
        ),
        pager = render_pager(Page::Checkin, &store.checkins.pagination, None),
    )
}

fn render_tags(store: &Store) -> String {
    if store.tags.is_empty() {
        return r#"<ul id="tag-analysis" class="tags"><li class="empty">No tags yet</li></ul>"#.to_string();
    }
    let mut html = String::from(r#"<ul id="tag-analysis" class="tags">"#);
    for tag in &store.tags {
        let _ = write!(
            html,
            r#"<li><span class="tag-name">{name}</span><span class="tag-bar"><span class="tag-fill" style="width: {percent:.1}%"></span></span><span class="tag-count">{count}</span></li>"#,
            name = text(&tag.tag),
            percent = tag.percent(),
            count = tag.count,
        );
    }
    html.push_str("</ul>");
    html
}

fn render_stats_page(store: &Store) -> String {
    let chart = store
        .monthly
        .as_ref()
        .map(|chart| chart.render_svg())
        .unwrap_or_else(|| r#"<p class="empty">No chart data</p>"#.to_string());
    format!(
        r#"<h2>Stats</h2>{summary}<form id="stats-form" method="get" action="/pages/stats"><input type="number" id="stats-year" name="year" min="2000" max="9999" value="{year}" /><input type="number" id="stats-month" name="month" min="1" max="12" value="{month}" /><button type="submit">Show</button></form><div class="chart-card"><h3>Records per day, {year}-{month:02}</h3>{chart}</div><h3>Tags</h3>{tags}"#,
        summary = render_summary(store, "stats-"),
        year = store.stats_year,
        month = store.stats_month,
        tags = render_tags(store),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Life Log</title>
  <style>
    :root {
      --bg: #f6f1e7;
      --ink: #2b2a28;
      --muted: #7a746d;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }
    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 20px;
    }
    nav.tabs { display: flex; gap: 6px; padding: 6px; background: rgba(47, 72, 88, 0.08); border-radius: 999px; }
    .nav-link { padding: 8px 14px; border-radius: 999px; color: var(--muted); text-decoration: none; font-weight: 600; }
    .nav-link.active { background: white; color: var(--accent-2); }
    .page { display: none; }
    .page.active { display: grid; gap: 18px; }
    .panel { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 14px; }
    .stat { background: white; border-radius: 16px; padding: 16px; display: grid; gap: 6px; }
    .stat .label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.12em; color: var(--muted); }
    .stat .value { font-size: 1.6rem; font-weight: 600; color: var(--accent-2); }
    .columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 18px; }
    .list { list-style: none; margin: 0; padding: 0; display: grid; gap: 10px; }
    .list li { background: white; border-radius: 14px; padding: 12px 14px; display: grid; gap: 4px; }
    .meta, .empty { color: var(--muted); font-size: 0.9rem; }
    .tag { display: inline-block; margin-right: 6px; padding: 2px 8px; border-radius: 999px; background: rgba(255, 107, 74, 0.12); font-size: 0.8rem; }
    form { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 12px; align-items: end; }
    label { display: grid; gap: 4px; font-size: 0.9rem; color: var(--muted); }
    label.wide { grid-column: 1 / -1; }
    input, select, textarea { font: inherit; padding: 8px 10px; border-radius: 10px; border: 1px solid rgba(47, 72, 88, 0.2); }
    textarea { min-height: 90px; }
    button { border: none; border-radius: 999px; padding: 10px 18px; font-weight: 600; cursor: pointer; }
    .btn-primary { background: var(--accent); color: white; }
    .pager { display: flex; gap: 14px; align-items: center; justify-content: center; }
    .pager-link { color: var(--accent-2); font-weight: 600; }
    .pager-link.disabled { color: var(--muted); opacity: 0.5; }
    .chart-card { background: white; border-radius: 18px; padding: 16px; }
    #monthly-chart { width: 100%; height: 260px; display: block; }
    .chart-bar { fill: var(--accent); }
    .chart-grid { stroke: rgba(47, 72, 88, 0.12); }
    .chart-label { fill: var(--muted); font-size: 11px; }
    .tags { list-style: none; margin: 0; padding: 0; display: grid; gap: 8px; }
    .tags li { display: grid; grid-template-columns: 140px 1fr 48px; gap: 10px; align-items: center; }
    .tag-bar { background: rgba(47, 72, 88, 0.08); border-radius: 999px; height: 12px; overflow: hidden; }
    .tag-fill { display: block; height: 100%; background: var(--accent-2); }
    #message-container { position: fixed; top: 16px; right: 16px; display: grid; gap: 8px; z-index: 10; }
    .message { padding: 12px 16px; border-radius: 12px; color: white; display: flex; gap: 8px; transition: opacity 300ms ease; }
    .message.success { background: #2d7a4b; }
    .message.error { background: #c63b2b; }
    .message.warning { background: #c98a1b; }
    .message.fading { opacity: 0; }
    header { display: flex; align-items: center; justify-content: space-between; }
    .status { font-size: 0.8rem; padding: 4px 10px; border-radius: 999px; color: white; }
    .status.online { background: #2d7a4b; }
    .status.offline { background: #c63b2b; }
    .status.unknown { background: var(--muted); }
  </style>
</head>
<body>
  <div id="message-container">{{MESSAGES}}</div>
  <main class="app">
    <header><h1>Life Log</h1>{{STATUS}}</header>
    <nav class="tabs">{{NAV}}</nav>
    {{DASHBOARD}}
    {{RECORDS}}
    {{CHECKIN}}
    {{STATS}}
  </main>
  <script>
    document.querySelectorAll('#message-container .message').forEach((el) => {
      const remaining = Number(el.dataset.remainingMs || 0);
      setTimeout(() => {
        el.classList.add('fading');
        setTimeout(() => el.remove(), 300);
      }, remaining);
    });
  </script>
</body>
</html>
"#;
