use sqlx::PgPool;

/// Shared application state handed to every handler.
///
/// The pool is the only shared resource; there is no in-process cache or
/// mutable state across requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    /// Creates application state around an open connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
