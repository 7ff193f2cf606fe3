use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use validator::Validate;

use crate::schema::review_schedules;

/// Self-assessed confidence for a problem. Stored as its variant name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum Stage {
    #[default]
    NotAbleToSolve,
    BuildConfidence,
    Confident,
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown stage '{0}'")]
pub struct UnknownStage(pub String);

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NotAbleToSolve => "NotAbleToSolve",
            Stage::BuildConfidence => "BuildConfidence",
            Stage::Confident => "Confident",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotAbleToSolve" => Ok(Stage::NotAbleToSolve),
            "BuildConfidence" => Ok(Stage::BuildConfidence),
            "Confident" => Ok(Stage::Confident),
            other => Err(UnknownStage(other.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Stage {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Stage {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(raw.parse()?)
    }
}

/// Full `review_schedules` row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = review_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewSchedule {
    pub id: i32,
    pub problem_url: String,
    pub current_stage: Stage,
    pub next_pick_date: NaiveDate,
    pub is_active: bool,
    pub record_last_updated: NaiveDateTime,
}

/// Projection returned by the daily-questions query.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = review_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DueQuestion {
    pub problem_url: String,
    pub current_stage: Stage,
    pub next_pick_date: NaiveDate,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = review_schedules)]
pub struct NewReviewSchedule<'a> {
    pub problem_url: &'a str,
    pub current_stage: Stage,
    pub next_pick_date: NaiveDate,
    pub is_active: bool,
    pub record_last_updated: NaiveDateTime,
}

/// The mutable columns. `id` and `problem_url` are deliberately absent.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = review_schedules)]
pub struct ReviewChanges {
    pub current_stage: Stage,
    pub next_pick_date: NaiveDate,
    pub is_active: bool,
    pub record_last_updated: NaiveDateTime,
}

/// Body of `POST /space-repetition/create`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(url(message = "url must be a well-formed absolute URL"))]
    pub url: String,
    #[serde(default)]
    pub current_stage: Stage,
    pub next_pick_day: i64,
    pub is_active: Option<bool>,
}

impl CreateReviewRequest {
    /// Canonical form of `url`: trimmed, scheme and host lowercased, dot
    /// segments resolved, `/` path on a bare host.
    pub fn normalized_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.url.trim())
    }
}

/// Body of `PUT /spaced-repetition/question-update/{id}`
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub current_stage: Stage,
    pub next_pick_day: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_round_trip_through_from_str() {
        for stage in [Stage::NotAbleToSolve, Stage::BuildConfidence, Stage::Confident] {
            assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn unknown_stage_is_rejected() {
        assert_eq!(
            "Mastered".parse::<Stage>(),
            Err(UnknownStage("Mastered".into()))
        );
        assert!(serde_json::from_str::<Stage>(r#""confident""#).is_err());
    }

    #[test]
    fn create_request_defaults() {
        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"url": "https://x.com/p1", "next_pick_day": 0}"#).unwrap();
        assert_eq!(req.current_stage, Stage::NotAbleToSolve);
        assert_eq!(req.is_active, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_request_requires_next_pick_day() {
        let res = serde_json::from_str::<CreateReviewRequest>(r#"{"url": "https://x.com/p1"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn relative_url_fails_validation() {
        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"url": "/problems/two-sum", "next_pick_day": 1}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url"));
    }

    #[test]
    fn url_is_normalized() {
        let req: CreateReviewRequest = serde_json::from_str(
            r#"{"url": "  HTTPS://X.COM/a/../b  ", "next_pick_day": 1}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_url().unwrap().as_str(), "https://x.com/b");

        let bare: CreateReviewRequest =
            serde_json::from_str(r#"{"url": "https://x.com", "next_pick_day": 1}"#).unwrap();
        assert_eq!(bare.normalized_url().unwrap().as_str(), "https://x.com/");
    }

    #[test]
    fn update_request_requires_stage() {
        let res = serde_json::from_str::<UpdateReviewRequest>(r#"{"next_pick_day": 3}"#);
        assert!(res.is_err());
    }

    #[test]
    fn due_question_serializes_plain_date() {
        let row = DueQuestion {
            problem_url: "https://x.com/p1".into(),
            current_stage: Stage::BuildConfidence,
            next_pick_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "problem_url": "https://x.com/p1",
                "current_stage": "BuildConfidence",
                "next_pick_date": "2024-05-02"
            })
        );
    }
}
