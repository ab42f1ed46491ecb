//! Feature data models and DTOs.
//!
//! A [`Feature`] is the showcased unit of work: rich text fields describing
//! what it is and how it was built, a lifecycle [`FeatureStatus`], a
//! [`FeaturePriority`], free-form tags, and zero or more file
//! [`Attachment`]s. Attachments live in their own table and are joined in by
//! the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::pagination::PaginationParams;

/// Lifecycle state of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "feature_status", rename_all = "kebab-case")]
pub enum FeatureStatus {
    Planned,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for FeatureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on-hold" => Ok(Self::OnHold),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "feature_priority", rename_all = "lowercase")]
pub enum FeaturePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl FeaturePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::str::FromStr for FeaturePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("Invalid priority: {}", other)),
        }
    }
}

/// A file attached to a feature. Deleting the feature cascades these rows.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub url: String,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A feature row as stored, without attachments.
#[derive(Debug, Clone, FromRow)]
pub struct FeatureRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub purpose: String,
    pub implementation: String,
    pub technical_details: String,
    pub status: FeatureStatus,
    pub priority: FeaturePriority,
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A feature with its attachments, as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub purpose: String,
    pub implementation: String,
    pub technical_details: String,
    pub status: FeatureStatus,
    pub priority: FeaturePriority,
    pub tags: Vec<String>,
    pub author: String,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feature {
    pub fn from_row(row: FeatureRow, attachments: Vec<Attachment>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            purpose: row.purpose,
            implementation: row.implementation,
            technical_details: row.technical_details,
            status: row.status,
            priority: row.priority,
            tags: row.tags,
            author: row.author,
            attachments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// At most 10 tags, each non-empty and at most 50 characters.
fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.len() > 10 {
        let mut err = ValidationError::new("tags");
        err.message = Some("A feature can have at most 10 tags".into());
        return Err(err);
    }
    for tag in tags {
        if tag.trim().is_empty() || tag.len() > 50 {
            let mut err = ValidationError::new("tags");
            err.message = Some("Each tag must be between 1 and 50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

/// DTO for creating a feature. Status, priority, tags, and author have
/// server-side defaults; author falls back to the acting user's name.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureDto {
    #[validate(length(min = 3, max = 200, message = "Name must be between 3 and 200 characters"))]
    pub name: String,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters"
    ))]
    pub description: String,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Purpose must be between 10 and 2000 characters"
    ))]
    pub purpose: String,
    #[validate(length(
        min = 10,
        max = 3000,
        message = "Implementation must be between 10 and 3000 characters"
    ))]
    pub implementation: String,
    #[validate(length(
        min = 10,
        max = 3000,
        message = "Technical details must be between 10 and 3000 characters"
    ))]
    pub technical_details: String,
    pub status: Option<FeatureStatus>,
    pub priority: Option<FeaturePriority>,
    #[validate(custom(function = validate_tags))]
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 2, max = 100, message = "Author must be between 2 and 100 characters"))]
    pub author: Option<String>,
}

/// DTO for a partial feature update. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeatureDto {
    #[validate(length(min = 3, max = 200, message = "Name must be between 3 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters"
    ))]
    pub description: Option<String>,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Purpose must be between 10 and 2000 characters"
    ))]
    pub purpose: Option<String>,
    #[validate(length(
        min = 10,
        max = 3000,
        message = "Implementation must be between 10 and 3000 characters"
    ))]
    pub implementation: Option<String>,
    #[validate(length(
        min = 10,
        max = 3000,
        message = "Technical details must be between 10 and 3000 characters"
    ))]
    pub technical_details: Option<String>,
    pub status: Option<FeatureStatus>,
    pub priority: Option<FeaturePriority>,
    #[validate(custom(function = validate_tags))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 2, max = 100, message = "Author must be between 2 and 100 characters"))]
    pub author: Option<String>,
}

/// Query parameters for the public feature list.
///
/// `status` and `priority` accept `all` (or any unrecognized value) as "no
/// filter", matching what the dashboard's select controls send.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Pagination envelope for the feature list. The per-status totals are
/// global counts so the dashboard tabs stay accurate while filtering.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_features: i64,
    pub total_planned: i64,
    pub total_in_progress: i64,
    pub total_completed: i64,
    pub total_on_hold: i64,
    pub total_cancelled: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeatureData {
    pub feature: Feature,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeatureListData {
    pub features: Vec<Feature>,
    pub pagination: FeaturePagination,
}

/// Status and priority breakdowns for the stats endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStatsData {
    pub total_features: i64,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub planned: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub on_hold: i64,
    pub cancelled: i64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCounts {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&FeatureStatus::InProgress).unwrap(),
            r#""in-progress""#
        );
        assert_eq!(
            serde_json::from_str::<FeatureStatus>(r#""on-hold""#).unwrap(),
            FeatureStatus::OnHold
        );
        assert_eq!(
            FeatureStatus::from_str("in-progress").unwrap(),
            FeatureStatus::InProgress
        );
        assert!(FeatureStatus::from_str("shipped").is_err());
    }

    #[test]
    fn test_create_dto_bounds() {
        let dto = CreateFeatureDto {
            name: "ab".to_string(),
            description: "short".to_string(),
            purpose: "long enough purpose".to_string(),
            implementation: "long enough implementation".to_string(),
            technical_details: "long enough details".to_string(),
            status: None,
            priority: None,
            tags: vec![],
            author: None,
        };

        let errs = dto.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("name"));
        assert!(errs.field_errors().contains_key("description"));
        assert!(!errs.field_errors().contains_key("purpose"));
    }

    #[test]
    fn test_tag_limits() {
        let base = CreateFeatureDto {
            name: "Realtime scoring".to_string(),
            description: "Push lane scores to the board in realtime".to_string(),
            purpose: "Keep spectators up to date without refreshes".to_string(),
            implementation: "WebSocket fanout from the scoring service".to_string(),
            technical_details: "Backpressure handled with bounded channels".to_string(),
            status: None,
            priority: None,
            tags: (0..11).map(|i| format!("tag{}", i)).collect(),
            author: None,
        };
        assert!(base.validate().is_err());

        let mut ok = base.clone();
        ok.tags = vec!["realtime".to_string(), "scoring".to_string()];
        assert!(ok.validate().is_ok());

        let mut empty_tag = base.clone();
        empty_tag.tags = vec!["  ".to_string()];
        assert!(empty_tag.validate().is_err());
    }

    #[test]
    fn test_attachment_hides_storage_key() {
        let attachment = Attachment {
            id: Uuid::new_v4(),
            feature_id: Uuid::new_v4(),
            file_name: "diagram.png".to_string(),
            file_type: "image/png".to_string(),
            file_size: 1234,
            url: "http://localhost:3000/files/features/x/diagram.png".to_string(),
            storage_key: "features/x/diagram.png".to_string(),
            uploaded_at: Utc::now(),
        };

        let value = serde_json::to_value(&attachment).unwrap();
        assert!(value.get("fileName").is_some());
        assert!(value.get("storageKey").is_none());
        assert!(value.get("storage_key").is_none());
    }
}
