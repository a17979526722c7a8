use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// List projection: one row per TG (and per LE when several are assigned).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestGuidelineSummary {
    pub id: i32,
    pub reference: String,
    pub name: String,
    pub status: String,
    pub last_updated: Option<NaiveDateTime>,
    pub lead_expert: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestGuidelineDetail {
    pub id: i32,
    pub reference: String,
    pub name: String,
    pub language: Option<String>,
    pub status: String,
    pub last_updated: Option<NaiveDateTime>,

    // Phase windows
    pub le_draft_start: Option<NaiveDate>,
    pub le_draft_end: Option<NaiveDate>,
    pub ie_comments_start: Option<NaiveDate>,
    pub ie_comments_end: Option<NaiveDate>,
    pub le_checking_start: Option<NaiveDate>,
    pub le_checking_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUser {
    pub id: i32,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: i64,
    pub draft: i64,
    pub ie_comments: i64,
    pub le_checking: i64,
    pub adopted: i64,
}
