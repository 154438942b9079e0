use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{
    Checkin, DailyCount, ListPage, NewCheckin, NewRecord, Record, Summary, TagCount,
};
use reqwest::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Typed access to the life-log REST API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.api_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: None,
            });
        }
        let _: Value = response.json().await?;
        Ok(())
    }

    pub async fn summary(&self) -> Result<Summary, ApiError> {
        let mut body = self.send(self.client.get(self.url("/stats/summary"))).await?;
        field(&mut body, "summary")
    }

    pub async fn records(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
    ) -> Result<ListPage<Record>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("per_page", per_page.to_string())];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        let request = self.client.get(self.url("/records")).query(&query);
        list_page(self.send(request).await?, "records")
    }

    pub async fn create_record(&self, record: NewRecord) -> Result<Record, ApiError> {
        let mut form = multipart::Form::new();
        for (name, value) in record.text_fields() {
            form = form.text(name, value);
        }
        for upload in record.media {
            let part = multipart::Part::bytes(upload.bytes)
                .file_name(upload.filename)
                .mime_str(&upload.content_type)?;
            form = form.part("media", part);
        }
        let mut body = self
            .send(self.client.post(self.url("/records")).multipart(form))
            .await?;
        field(&mut body, "record")
    }

    pub async fn checkins(&self, page: u32, per_page: u32) -> Result<ListPage<Checkin>, ApiError> {
        let request = self
            .client
            .get(self.url("/checkins"))
            .query(&[("page", page), ("per_page", per_page)]);
        list_page(self.send(request).await?, "checkins")
    }

    pub async fn create_checkin(&self, checkin: &NewCheckin) -> Result<Checkin, ApiError> {
        let mut body = self
            .send(self.client.post(self.url("/checkins")).json(checkin))
            .await?;
        field(&mut body, "checkin")
    }

    pub async fn monthly_stats(&self, year: i32, month: u32) -> Result<Vec<DailyCount>, ApiError> {
        let request = self
            .client
            .get(self.url("/stats/monthly"))
            .query(&[("year", year.to_string()), ("month", month.to_string())]);
        let mut body = self.send(request).await?;
        field(&mut body, "stats")
    }

    pub async fn tag_analysis(&self) -> Result<Vec<TagCount>, ApiError> {
        let mut body = self.send(self.client.get(self.url("/tags/analysis"))).await?;
        field(&mut body, "tags")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| error_message(&body));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        unwrap_envelope(serde_json::from_slice(&bytes)?)
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Accepts `{ "success": true, ... }` and turns anything else into `Rejected`.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    match body.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(body),
        _ => Err(ApiError::Rejected {
            message: error_message(&body),
        }),
    }
}

pub fn field<T: DeserializeOwned>(body: &mut Value, key: &'static str) -> Result<T, ApiError> {
    let raw = body
        .get_mut(key)
        .map(Value::take)
        .ok_or(ApiError::MissingField(key))?;
    Ok(serde_json::from_value(raw)?)
}

pub fn list_page<T: DeserializeOwned>(
    mut body: Value,
    key: &'static str,
) -> Result<ListPage<T>, ApiError> {
    let items = field(&mut body, key)?;
    let number = |name: &str| body.get(name).and_then(Value::as_u64);
    Ok(ListPage {
        items,
        total: number("total"),
        pages: number("pages").and_then(|pages| u32::try_from(pages).ok()),
        current_page: number("current_page").and_then(|page| u32::try_from(page).ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_without_success_is_rejected_with_server_text() {
        let err = unwrap_envelope(json!({ "success": false, "error": "title is required" }))
            .unwrap_err();
        match err {
            ApiError::Rejected { message } => {
                assert_eq!(message.as_deref(), Some("title is required"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            unwrap_envelope(json!({ "summary": {} })),
            Err(ApiError::Rejected { message: None })
        ));
    }

    #[test]
    fn summary_field_is_extracted() {
        let mut body = unwrap_envelope(json!({
            "success": true,
            "summary": { "total_records": 5, "total_checkins": 3, "avg_mood_score": 7.2, "recent_records": 2 }
        }))
        .unwrap();
        let summary: Summary = field(&mut body, "summary").unwrap();
        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.avg_mood_score, Some(7.2));
    }

    #[test]
    fn missing_key_is_reported() {
        let mut body = json!({ "success": true });
        let err = field::<Vec<TagCount>>(&mut body, "tags").unwrap_err();
        assert!(matches!(err, ApiError::MissingField("tags")));
    }

    #[test]
    fn list_page_reads_totals() {
        let page: ListPage<TagCount> = list_page(
            json!({
                "success": true,
                "checkins": [{ "tag": "x", "count": 1 }],
                "total": 21,
                "pages": 3,
                "current_page": 2
            }),
            "checkins",
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(21));
        assert_eq!(page.pages, Some(3));
        assert_eq!(page.current_page, Some(2));
    }

    #[test]
    fn base_url_is_taken_from_config() {
        let config = Config {
            api_base_url: "http://10.0.0.2:5000/api".into(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/health"), "http://10.0.0.2:5000/api/health");
    }
}
