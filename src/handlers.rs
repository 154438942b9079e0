use crate::errors::AppError;
use crate::loader;
use crate::models::{CheckinForm, MediaUpload, RecordForm};
use crate::state::AppState;
use crate::store::{Action, Page, Route};
use crate::ui::render_page;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use chrono::Local;
use serde::Deserialize;
use std::time::Instant;
use tracing::info;

/// Query string of the page routes. Values stay strings so that an empty
/// form input never turns into a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    search: Option<String>,
    year: Option<String>,
    month: Option<String>,
}

impl PageQuery {
    fn number<T: std::str::FromStr>(value: &Option<String>) -> Option<T> {
        value.as_deref().and_then(|value| value.trim().parse().ok())
    }

    pub fn into_route(self, page: Page) -> Route {
        match page {
            Page::Dashboard => Route::Dashboard,
            Page::Records => Route::Records {
                page: Self::number(&self.page),
                search: self.search,
            },
            Page::Checkin => Route::Checkin {
                page: Self::number(&self.page),
            },
            Page::Stats => Route::Stats {
                year: Self::number(&self.year),
                month: Self::number(&self.month),
            },
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = Local::now().date_naive();
    loader::dispatch(&state, Action::Boot { today }).await;
    render(&state).await
}

pub async fn show_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let page: Page = page
        .parse()
        .map_err(|_| AppError::not_found(format!("unknown page: {page}")))?;
    loader::dispatch(&state, Action::Navigate(query.into_route(page))).await;
    Ok(render(&state).await)
}

pub async fn create_record(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = RecordForm::default();
    let mut media = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "media" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;
            // An untouched file input still posts an empty part.
            if filename.is_empty() && bytes.is_empty() {
                continue;
            }
            media.push(MediaUpload {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            form.set(&name, field.text().await?);
        }
    }

    let record = form.to_new_record(media)?;
    info!(title = %record.title, attachments = record.media.len(), "submitting record");
    let result = state.client.create_record(record).await;
    loader::dispatch(&state, Action::RecordSubmitted { form, result }).await;
    Ok(Redirect::to("/pages/records"))
}

pub async fn create_checkin(
    State(state): State<AppState>,
    Form(form): Form<CheckinForm>,
) -> Result<Redirect, AppError> {
    let checkin = form.to_new_checkin()?;
    info!(date = %checkin.date, "submitting check-in");
    let result = state.client.create_checkin(&checkin).await;
    loader::dispatch(&state, Action::CheckinSubmitted { form, result }).await;
    Ok(Redirect::to("/pages/checkin"))
}

async fn render(state: &AppState) -> Html<String> {
    let now = Instant::now();
    let mut store = state.store.lock().await;
    store.notifications.prune_at(now);
    Html(render_page(&store, now))
}
