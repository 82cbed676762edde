//! # Framework Errors
//!
//! Common error types used throughout the actor framework. Entity-specific failures travel
//! boxed inside [`FrameworkError::EntityError`] and can be recovered with
//! [`FrameworkError::into_entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the typed entity error carried by `EntityError`.
    ///
    /// Returns `Err(self)` when this is a transport-level error, or when the boxed
    /// error is of a different type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("widget rejected: {0}")]
    struct WidgetError(String);

    #[test]
    fn test_into_entity_error_recovers_typed_error() {
        let err = FrameworkError::EntityError(Box::new(WidgetError("too big".into())));
        assert_eq!(
            err.into_entity_error::<WidgetError>().unwrap(),
            WidgetError("too big".into())
        );
    }

    #[test]
    fn test_into_entity_error_keeps_transport_errors() {
        let err = FrameworkError::ActorClosed;
        assert!(matches!(
            err.into_entity_error::<WidgetError>(),
            Err(FrameworkError::ActorClosed)
        ));

        let foreign = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        assert!(matches!(
            foreign.into_entity_error::<WidgetError>(),
            Err(FrameworkError::EntityError(_))
        ));
    }
}
