//! Error types and result definitions for pipeline operations.
//!
//! Provides an error system with classification and captured diagnostic metadata for
//! pipeline operations. Most failure modes in this crate are prevented structurally
//! (single-owner conduit closure, registration-before-spawn), so [`ConfluxError`]
//! covers the small set of conditions that remain reportable at runtime.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use conflux_config::ValidationError;

/// Convenient result type for pipeline operations using [`ConfluxError`] as the error type.
pub type ConfluxResult<T> = Result<T, ConfluxError>;

/// Specific categories of errors that can occur during pipeline operations.
///
/// Error kinds are deliberately few: deadlocks and double-closes are designed out
/// rather than reported (see the crate-level docs), leaving configuration problems
/// and lifecycle misuse as the reportable surface.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Pipeline configuration failed validation.
    ConfigError,
    /// The pipeline was started more than once.
    PipelineAlreadyStarted,
    /// A completion task finished without producing its result.
    CompletionDropped,
}

/// Main error type for pipeline operations.
///
/// [`ConfluxError`] pairs an [`ErrorKind`] with a static description, optional
/// dynamic detail, an optional source error, and the callsite location where the
/// error was created.
#[derive(Debug, Clone)]
pub struct ConfluxError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

impl ConfluxError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    ///
    /// The stored source is preserved across clones and exposed via [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`ConfluxError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        ConfluxError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
        }
    }
}

impl PartialEq for ConfluxError {
    fn eq(&self, other: &ConfluxError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for ConfluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = self.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for ConfluxError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`ConfluxError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for ConfluxError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> ConfluxError {
        ConfluxError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`ConfluxError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for ConfluxError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> ConfluxError {
        ConfluxError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`ValidationError`] to [`ConfluxError`] with [`ErrorKind::ConfigError`].
impl From<ValidationError> for ConfluxError {
    #[track_caller]
    fn from(err: ValidationError) -> ConfluxError {
        let detail = err.to_string();
        ConfluxError::from_components(
            ErrorKind::ConfigError,
            Cow::Borrowed("invalid pipeline configuration"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}
