//! Shared helpers for the integration test suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use sqlx::PgPool;

use recommendations_api::db;
use recommendations_api::models::{Recommendation, RecommendationType};

pub const ALL_TYPES: [RecommendationType; 9] = [
    RecommendationType::SimilarProduct,
    RecommendationType::RecommendedForYou,
    RecommendationType::Upgrade,
    RecommendationType::FreqBoughtTogether,
    RecommendationType::AddOn,
    RecommendationType::Trending,
    RecommendationType::TopRated,
    RecommendationType::NewArrival,
    RecommendationType::Unknown,
];

/// Connects to the database named by `DATABASE_URL` (or `DATABASE_URI`) and
/// applies migrations.
///
/// Returns `None` when neither variable is set so database-backed tests can
/// skip on machines without a local Postgres.
pub async fn try_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL").or_else(|_| std::env::var("DATABASE_URI")) else {
        eprintln!("skipping: set DATABASE_URL to run database-backed tests");
        return None;
    };
    let pool = db::connect(&url)
        .await
        .expect("failed to connect to the test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to apply migrations");
    Some(pool)
}

static BASE: OnceLock<i32> = OnceLock::new();
static NEXT: AtomicI32 = AtomicI32::new(0);

/// Produces integers unique within the run and unlikely to collide with
/// rows left behind by earlier runs, so tests never truncate the table.
pub fn unique_id() -> i32 {
    let base = *BASE.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .subsec_nanos() as i32;
        (nanos & 0x0FFF_FFFF) | 0x1000_0000
    });
    base.wrapping_add(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Builds an unsaved recommendation with fields varied by `n`.
pub fn recommendation(n: usize) -> Recommendation {
    Recommendation {
        id: None,
        product_id: unique_id(),
        user_id: unique_id(),
        user_segment: format!("segment-{}", unique_id()),
        viewed_in_last7d: n % 2 == 0,
        bought_in_last30d: n % 3 == 0,
        last_relevance_date: NaiveDate::from_ymd_opt(2022, 6, (n % 28 + 1) as u32)
            .expect("valid date"),
        recommendation_type: ALL_TYPES[n % ALL_TYPES.len()],
    }
}
