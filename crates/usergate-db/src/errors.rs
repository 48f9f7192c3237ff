//! Classification of store errors for callers that only see `anyhow::Error`.

fn sqlx_errors(err: &anyhow::Error) -> impl Iterator<Item = &sqlx::Error> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
}

/// True when the error chain contains a unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    sqlx_errors(err).any(|e| {
        e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
    })
}

/// True when the database could not be reached (pool exhausted or closed,
/// network or TLS failure).
pub fn is_unavailable(err: &anyhow::Error) -> bool {
    sqlx_errors(err).any(|e| {
        matches!(
            e,
            sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::WorkerCrashed
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err: anyhow::Result<()> = Err(sqlx::Error::PoolTimedOut).context("Failed to get user");
        let err = err.unwrap_err();
        assert!(is_unavailable(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_row_not_found_is_not_unavailable() {
        let err = anyhow::Error::from(sqlx::Error::RowNotFound);
        assert!(!is_unavailable(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_plain_error_is_neither() {
        let err = anyhow::anyhow!("something else");
        assert!(!is_unavailable(&err));
        assert!(!is_unique_violation(&err));
    }
}
