use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::utils::errors::AppError;
use crate::utils::file_storage::FileStorage;
use crate::utils::pagination::total_pages;

use super::model::{
    Attachment, CreateFeatureDto, Feature, FeatureListParams, FeaturePagination, FeatureRow,
    FeatureStatsData, FeatureStatus, FeaturePriority, PriorityCounts, StatusCounts,
    UpdateFeatureDto,
};

const FEATURE_COLUMNS: &str = "id, name, description, purpose, implementation, \
     technical_details, status, priority, tags, author, created_at, updated_at";

/// Column whitelist for the public list's `sortBy` parameter. Anything else
/// falls back to `updated_at` rather than erroring, matching the dashboard's
/// tolerance for stale bookmarked URLs.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("createdAt") => "created_at",
        Some("name") => "name",
        Some("status") => "status",
        Some("priority") => "priority",
        _ => "updated_at",
    }
}

fn sort_direction(sort_order: Option<&str>) -> &'static str {
    match sort_order {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

pub struct FeatureService;

impl FeatureService {
    /// Public list with filtering, search, sorting, and pagination.
    ///
    /// `totalFeatures` counts the filtered set; the per-status totals are
    /// always global so the dashboard's status tabs keep their badges while
    /// a filter is active.
    #[instrument(skip(db, params))]
    pub async fn list(
        db: &PgPool,
        params: &FeatureListParams,
    ) -> Result<(Vec<Feature>, FeaturePagination), AppError> {
        // "all" and unrecognized values mean no filter.
        let status = params
            .status
            .as_deref()
            .and_then(|s| FeatureStatus::from_str(s).ok());
        let priority = params
            .priority
            .as_deref()
            .and_then(|p| FeaturePriority::from_str(p).ok());
        let search_pattern = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx = 0;
        if status.is_some() {
            bind_idx += 1;
            conditions.push(format!("status = ${}", bind_idx));
        }
        if priority.is_some() {
            bind_idx += 1;
            conditions.push(format!("priority = ${}", bind_idx));
        }
        if search_pattern.is_some() {
            bind_idx += 1;
            conditions.push(format!(
                "(name ILIKE ${i} OR description ILIKE ${i} \
                 OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ${i}))",
                i = bind_idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM features{}", where_clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        if let Some(s) = status {
            count_query = count_query.bind(s);
        }
        if let Some(p) = priority {
            count_query = count_query.bind(p);
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.bind(pattern.clone());
        }
        let (total_features,) = count_query.fetch_one(db).await?;

        let page = params.pagination.page();
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let rows_sql = format!(
            "SELECT {columns} FROM features{where_clause} \
             ORDER BY {column} {direction} LIMIT ${l} OFFSET ${o}",
            columns = FEATURE_COLUMNS,
            column = sort_column(params.sort_by.as_deref()),
            direction = sort_direction(params.sort_order.as_deref()),
            l = bind_idx + 1,
            o = bind_idx + 2,
        );
        let mut rows_query = sqlx::query_as::<_, FeatureRow>(&rows_sql);
        if let Some(s) = status {
            rows_query = rows_query.bind(s);
        }
        if let Some(p) = priority {
            rows_query = rows_query.bind(p);
        }
        if let Some(ref pattern) = search_pattern {
            rows_query = rows_query.bind(pattern.clone());
        }
        let rows = rows_query.bind(limit).bind(offset).fetch_all(db).await?;

        let features = Self::attach_all(db, rows).await?;
        let status_counts = Self::status_counts(db).await?;

        let pages = total_pages(total_features, limit);
        let pagination = FeaturePagination {
            current_page: page,
            total_pages: pages,
            total_features,
            total_planned: status_counts.planned,
            total_in_progress: status_counts.in_progress,
            total_completed: status_counts.completed,
            total_on_hold: status_counts.on_hold,
            total_cancelled: status_counts.cancelled,
            has_next_page: page < pages,
            has_prev_page: page > 1,
            limit,
        };

        Ok((features, pagination))
    }

    #[instrument(skip(db))]
    pub async fn get_feature(db: &PgPool, id: Uuid) -> Result<Feature, AppError> {
        let row = Self::get_row(db, id).await?;
        let attachments = Self::attachments_for(db, id).await?;
        Ok(Feature::from_row(row, attachments))
    }

    pub async fn get_row(db: &PgPool, id: Uuid) -> Result<FeatureRow, AppError> {
        let sql = format!("SELECT {} FROM features WHERE id = $1", FEATURE_COLUMNS);
        sqlx::query_as::<_, FeatureRow>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Feature not found"))
    }

    /// Insert a feature. Missing optional fields take their documented
    /// defaults; a missing author becomes the acting user's display name.
    #[instrument(skip(db, dto))]
    pub async fn create_feature(
        db: &PgPool,
        dto: CreateFeatureDto,
        acting_user_name: &str,
    ) -> Result<Feature, AppError> {
        let author = dto
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| acting_user_name.to_string());

        let sql = format!(
            "INSERT INTO features \
             (name, description, purpose, implementation, technical_details, \
              status, priority, tags, author) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            FEATURE_COLUMNS
        );
        let row = sqlx::query_as::<_, FeatureRow>(&sql)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.purpose)
            .bind(&dto.implementation)
            .bind(&dto.technical_details)
            .bind(dto.status.unwrap_or(FeatureStatus::Planned))
            .bind(dto.priority.unwrap_or(FeaturePriority::Medium))
            .bind(&dto.tags)
            .bind(&author)
            .fetch_one(db)
            .await?;

        Ok(Feature::from_row(row, Vec::new()))
    }

    /// Partial update; absent fields keep their stored values.
    #[instrument(skip(db, dto))]
    pub async fn update_feature(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFeatureDto,
    ) -> Result<Feature, AppError> {
        let existing = Self::get_row(db, id).await?;

        let sql = format!(
            "UPDATE features SET \
             name = $1, description = $2, purpose = $3, implementation = $4, \
             technical_details = $5, status = $6, priority = $7, tags = $8, \
             author = $9, updated_at = now() \
             WHERE id = $10 \
             RETURNING {}",
            FEATURE_COLUMNS
        );
        let row = sqlx::query_as::<_, FeatureRow>(&sql)
            .bind(dto.name.unwrap_or(existing.name))
            .bind(dto.description.unwrap_or(existing.description))
            .bind(dto.purpose.unwrap_or(existing.purpose))
            .bind(dto.implementation.unwrap_or(existing.implementation))
            .bind(dto.technical_details.unwrap_or(existing.technical_details))
            .bind(dto.status.unwrap_or(existing.status))
            .bind(dto.priority.unwrap_or(existing.priority))
            .bind(dto.tags.unwrap_or(existing.tags))
            .bind(dto.author.unwrap_or(existing.author))
            .bind(id)
            .fetch_one(db)
            .await?;

        let attachments = Self::attachments_for(db, id).await?;
        Ok(Feature::from_row(row, attachments))
    }

    /// Delete a feature. Attachment rows cascade in the database; stored
    /// blobs are removed best effort and failures only get logged.
    #[instrument(skip(db, storage))]
    pub async fn delete_feature(
        db: &PgPool,
        storage: &Arc<dyn FileStorage>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let attachments = Self::attachments_for(db, id).await?;

        let result = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Feature not found"));
        }

        for attachment in &attachments {
            if let Err(e) = storage.delete(&attachment.storage_key).await {
                warn!(
                    feature_id = %id,
                    storage_key = %attachment.storage_key,
                    error = %e,
                    "failed to delete attachment blob"
                );
            }
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<FeatureStatsData, AppError> {
        let (total_features,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM features")
            .fetch_one(db)
            .await?;

        let by_status = Self::status_counts(db).await?;

        let priority_rows = sqlx::query_as::<_, (FeaturePriority, i64)>(
            "SELECT priority, COUNT(*) FROM features GROUP BY priority",
        )
        .fetch_all(db)
        .await?;
        let mut by_priority = PriorityCounts::default();
        for (priority, count) in priority_rows {
            match priority {
                FeaturePriority::Low => by_priority.low = count,
                FeaturePriority::Medium => by_priority.medium = count,
                FeaturePriority::High => by_priority.high = count,
                FeaturePriority::Critical => by_priority.critical = count,
            }
        }

        Ok(FeatureStatsData {
            total_features,
            by_status,
            by_priority,
        })
    }

    pub async fn attachments_for(db: &PgPool, feature_id: Uuid) -> Result<Vec<Attachment>, AppError> {
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT id, feature_id, file_name, file_type, file_size, url, storage_key, uploaded_at \
             FROM feature_attachments WHERE feature_id = $1 ORDER BY uploaded_at",
        )
        .bind(feature_id)
        .fetch_all(db)
        .await?;
        Ok(attachments)
    }

    async fn status_counts(db: &PgPool) -> Result<StatusCounts, AppError> {
        let rows = sqlx::query_as::<_, (FeatureStatus, i64)>(
            "SELECT status, COUNT(*) FROM features GROUP BY status",
        )
        .fetch_all(db)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                FeatureStatus::Planned => counts.planned = count,
                FeatureStatus::InProgress => counts.in_progress = count,
                FeatureStatus::Completed => counts.completed = count,
                FeatureStatus::OnHold => counts.on_hold = count,
                FeatureStatus::Cancelled => counts.cancelled = count,
            }
        }
        Ok(counts)
    }

    /// Join attachments onto a page of feature rows in one query.
    async fn attach_all(db: &PgPool, rows: Vec<FeatureRow>) -> Result<Vec<Feature>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT id, feature_id, file_name, file_type, file_size, url, storage_key, uploaded_at \
             FROM feature_attachments WHERE feature_id = ANY($1) ORDER BY uploaded_at",
        )
        .bind(&ids)
        .fetch_all(db)
        .await?;

        let mut by_feature: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
        for attachment in attachments {
            by_feature
                .entry(attachment.feature_id)
                .or_default()
                .push(attachment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let attachments = by_feature.remove(&row.id).unwrap_or_default();
                Feature::from_row(row, attachments)
            })
            .collect())
    }
}
