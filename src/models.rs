use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal, $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str().eq_ignore_ascii_case(value))
                    .ok_or(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Mood tag attached to a record.
    Mood {
        Happy => "happy", "Happy",
        Excited => "excited", "Excited",
        Calm => "calm", "Calm",
        Grateful => "grateful", "Grateful",
        Content => "content", "Content",
        Tired => "tired", "Tired",
        Sad => "sad", "Sad",
        Anxious => "anxious", "Anxious",
        Angry => "angry", "Angry",
        Stressed => "stressed", "Stressed",
    }
);

string_enum!(
    Weather {
        Sunny => "sunny", "Sunny",
        Cloudy => "cloudy", "Cloudy",
        Overcast => "overcast", "Overcast",
        Rainy => "rainy", "Rainy",
        Snowy => "snowy", "Snowy",
        Windy => "windy", "Windy",
        Foggy => "foggy", "Foggy",
        Stormy => "stormy", "Stormy",
    }
);

/// Unknown or empty enum strings decode as `None` instead of failing the list.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaFile {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub location: Option<String>,
    pub record_date: NaiveDate,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
}

impl Record {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Checkin {
    pub id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub exercise_minutes: Option<u32>,
    #[serde(default)]
    pub water_intake: Option<u32>,
    #[serde(default)]
    pub mood_score: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Summary {
    pub total_records: u64,
    pub total_checkins: u64,
    #[serde(default)]
    pub avg_mood_score: Option<f64>,
    pub recent_records: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// One page of a list endpoint plus the totals the server reported with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub pages: Option<u32>,
    pub current_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub title: String,
    pub content: String,
    pub record_date: NaiveDate,
    pub mood: Option<Mood>,
    pub weather: Option<Weather>,
    pub location: Option<String>,
    pub tags: Option<String>,
    pub media: Vec<MediaUpload>,
}

impl NewRecord {
    /// Text parts of the multipart body. Absent optional fields are left out.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("content", self.content.clone()),
            ("record_date", self.record_date.to_string()),
        ];
        if let Some(mood) = self.mood {
            fields.push(("mood", mood.as_str().to_string()));
        }
        if let Some(weather) = self.weather {
            fields.push(("weather", weather.as_str().to_string()));
        }
        if let Some(location) = &self.location {
            fields.push(("location", location.clone()));
        }
        if let Some(tags) = &self.tags {
            fields.push(("tags", tags.clone()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCheckin {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid {field}: {value:?}")]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

/// Record form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    pub title: String,
    pub content: String,
    pub mood: String,
    pub weather: String,
    pub location: String,
    pub record_date: String,
    pub tags: String,
}

impl RecordForm {
    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            record_date: date.to_string(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "content" => self.content = value,
            "mood" => self.mood = value,
            "weather" => self.weather = value,
            "location" => self.location = value,
            "record_date" => self.record_date = value,
            "tags" => self.tags = value,
            _ => {}
        }
    }

    pub fn to_new_record(&self, media: Vec<MediaUpload>) -> Result<NewRecord, FieldError> {
        let record_date = parse_date("record_date", &self.record_date)?;
        Ok(NewRecord {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            record_date,
            mood: parse_optional("mood", &self.mood)?,
            weather: parse_optional("weather", &self.weather)?,
            location: non_empty(&self.location),
            tags: non_empty(&self.tags),
            media,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckinForm {
    pub date: String,
    pub sleep_hours: String,
    pub exercise_minutes: String,
    pub water_intake: String,
    pub mood_score: String,
    pub notes: String,
}

impl CheckinForm {
    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }

    pub fn to_new_checkin(&self) -> Result<NewCheckin, FieldError> {
        Ok(NewCheckin {
            date: parse_date("date", &self.date)?,
            sleep_hours: parse_optional("sleep_hours", &self.sleep_hours)?,
            exercise_minutes: parse_optional("exercise_minutes", &self.exercise_minutes)?,
            water_intake: parse_optional("water_intake", &self.water_intake)?,
            mood_score: parse_optional("mood_score", &self.mood_score)?,
            notes: non_empty(&self.notes),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FieldError> {
    value.trim().parse().map_err(|_| FieldError {
        field,
        value: value.to_string(),
    })
}

fn parse_optional<T: FromStr>(field: &'static str, value: &str) -> Result<Option<T>, FieldError> {
    match non_empty(value) {
        Some(value) => value.parse().map(Some).map_err(|_| FieldError { field, value }),
        None => Ok(None),
    }
}
