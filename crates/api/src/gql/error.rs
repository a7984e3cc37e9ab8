use async_graphql::ErrorExtensions;

use crate::services::reservations::ReservationError;

/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`. Database errors go
/// through this enum so the detail is logged and clients only see a generic message.
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Custom(String),
}

impl GqlError {
    pub fn new(msg: impl Into<String>) -> Self {
        GqlError::Custom(msg.into())
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) => {
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `ReservationStatus::from_str(s).gql_err("Invalid status")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

fn reservation_error_code(e: &ReservationError) -> &'static str {
    match e {
        ReservationError::Db(_) => "INTERNAL",
        ReservationError::NotFound(_) => "NOT_FOUND",
        ReservationError::InvalidInput(_) => "BAD_USER_INPUT",
        ReservationError::Availability(_) => "INVALID_TIMEZONE",
        ReservationError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
        ReservationError::InvalidTransition { .. } => "INVALID_TRANSITION",
        ReservationError::Conflict => "CONFLICT",
    }
}

/// Reservation failures carry a machine-readable `code` extension so clients
/// can tell a full restaurant apart from bad input.
impl ErrorExtensions for ReservationError {
    fn extend(&self) -> async_graphql::Error {
        let message = match self {
            ReservationError::Db(e) => {
                tracing::error!("Database error: {e}");
                "Internal database error".to_string()
            }
            other => other.to_string(),
        };

        async_graphql::Error::new(message).extend_with(|_, ext| {
            ext.set("code", reservation_error_code(self));
            if let ReservationError::CapacityExceeded {
                used,
                requested,
                capacity,
            } = self
            {
                ext.set("used", *used);
                ext.set("requested", *requested);
                ext.set("capacity", *capacity);
            }
        })
    }
}
