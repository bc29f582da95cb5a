//! Persistence and named lookups for recommendation records.
//!
//! Every lookup is a single-predicate filter returning matches in id order;
//! an empty result is not an error. Each write commits immediately as a
//! single-row statement.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::{AppResult, ValidationError};
use crate::models::{Recommendation, RecommendationType};

/// Returns every stored recommendation.
pub async fn all(pool: &PgPool) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>("SELECT * FROM recommendations ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(recs)
}

/// Finds a recommendation by its id.
pub async fn find(pool: &PgPool, id: i32) -> AppResult<Option<Recommendation>> {
    tracing::debug!(id, "looking up recommendation");
    let rec = sqlx::query_as::<_, Recommendation>("SELECT * FROM recommendations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(rec)
}

/// Returns all recommendations for the given product id.
pub async fn find_by_product_id(pool: &PgPool, product_id: i32) -> AppResult<Vec<Recommendation>> {
    tracing::debug!(product_id, "looking up recommendations by product id");
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations for the given user id.
pub async fn find_by_user_id(pool: &PgPool, user_id: i32) -> AppResult<Vec<Recommendation>> {
    tracing::debug!(user_id, "looking up recommendations by user id");
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE user_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations for the given user segment.
pub async fn find_by_user_segment(pool: &PgPool, segment: &str) -> AppResult<Vec<Recommendation>> {
    tracing::debug!(segment, "looking up recommendations by user segment");
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE user_segment = $1 ORDER BY id",
    )
    .bind(segment)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations with the given `viewed_in_last7d` value.
pub async fn find_by_viewed_in_last7d(pool: &PgPool, viewed: bool) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE viewed_in_last7d = $1 ORDER BY id",
    )
    .bind(viewed)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations with the given `bought_in_last30d` value.
pub async fn find_by_bought_in_last30d(pool: &PgPool, bought: bool) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE bought_in_last30d = $1 ORDER BY id",
    )
    .bind(bought)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations last judged relevant on exactly the given date.
pub async fn find_by_last_relevance_date(
    pool: &PgPool,
    date: NaiveDate,
) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE last_relevance_date = $1 ORDER BY id",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations last judged relevant on or after the given date.
pub async fn find_since_relevance_date(
    pool: &PgPool,
    date: NaiveDate,
) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE last_relevance_date >= $1 ORDER BY id",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Returns all recommendations of the given type.
pub async fn find_by_recommendation_type(
    pool: &PgPool,
    recommendation_type: RecommendationType,
) -> AppResult<Vec<Recommendation>> {
    let recs = sqlx::query_as::<_, Recommendation>(
        "SELECT * FROM recommendations WHERE recommendation_type = $1 ORDER BY id",
    )
    .bind(recommendation_type)
    .fetch_all(pool)
    .await?;
    Ok(recs)
}

/// Inserts a new recommendation and returns the id the store assigned.
///
/// Any id already set on the record is ignored; the store always hands out
/// a fresh one, and the record is updated in place to carry it.
pub async fn create(pool: &PgPool, rec: &mut Recommendation) -> AppResult<i32> {
    tracing::info!(
        product_id = rec.product_id,
        user_id = rec.user_id,
        "creating recommendation"
    );
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO recommendations \
         (product_id, user_id, user_segment, viewed_in_last7d, bought_in_last30d, \
          last_relevance_date, recommendation_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(rec.product_id)
    .bind(rec.user_id)
    .bind(&rec.user_segment)
    .bind(rec.viewed_in_last7d)
    .bind(rec.bought_in_last30d)
    .bind(rec.last_relevance_date)
    .bind(rec.recommendation_type)
    .fetch_one(pool)
    .await?;

    rec.id = Some(id);
    Ok(id)
}

/// Writes every non-id column of an already-persisted recommendation.
///
/// Fails with the missing-id validation error when the record was never
/// persisted.
pub async fn update(pool: &PgPool, rec: &Recommendation) -> AppResult<()> {
    let id = rec.id.ok_or(ValidationError::MissingId)?;
    tracing::info!(id, "updating recommendation");
    sqlx::query(
        "UPDATE recommendations SET \
         product_id = $1, user_id = $2, user_segment = $3, viewed_in_last7d = $4, \
         bought_in_last30d = $5, last_relevance_date = $6, recommendation_type = $7 \
         WHERE id = $8",
    )
    .bind(rec.product_id)
    .bind(rec.user_id)
    .bind(&rec.user_segment)
    .bind(rec.viewed_in_last7d)
    .bind(rec.bought_in_last30d)
    .bind(rec.last_relevance_date)
    .bind(rec.recommendation_type)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Removes a recommendation. Deleting an absent id is a silent no-op.
pub async fn delete(pool: &PgPool, id: i32) -> AppResult<()> {
    tracing::info!(id, "deleting recommendation");
    sqlx::query("DELETE FROM recommendations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
