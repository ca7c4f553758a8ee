use sea_orm::DbErr;

/// Failures the booking services report as typed errors inside a
/// `color_eyre::Report`, so the HTTP layer can downcast them.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Failed to {action}: {source}")]
    Persistence {
        action: String,
        #[source]
        source: DbErr,
    },
}

impl BookingError {
    pub fn not_found(entity: &'static str, id: i64) -> color_eyre::Report {
        color_eyre::Report::new(Self::NotFound { entity, id })
    }

    pub fn persistence(action: impl Into<String>, source: DbErr) -> color_eyre::Report {
        color_eyre::Report::new(Self::Persistence {
            action: action.into(),
            source,
        })
    }
}

/// Whether the report carries a [`BookingError::NotFound`].
pub fn is_not_found(report: &color_eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<BookingError>(),
        Some(BookingError::NotFound { .. })
    )
}

/// Whether the report carries a [`BookingError::Persistence`].
pub fn is_persistence(report: &color_eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<BookingError>(),
        Some(BookingError::Persistence { .. })
    )
}
