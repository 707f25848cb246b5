use thiserror::Error;

/// Terminal compilation failures.
///
/// Every variant aborts the whole pass immediately; rules accumulated so far
/// are discarded, never salvaged. There is no degraded mode.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The declared type falls outside the supported category set, or a
    /// union has more than one non-null member.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A nullable field without an explicit default. Optionality must be
    /// intentional and defaulted, not inferred.
    #[error(
        "field `{0}` is nullable but declares no default value; \
         set an explicit default of null if this is intentional"
    )]
    MissingDefault(String),

    /// The requested grammar dialect identifier is not registered.
    #[error("unsupported grammar format `{requested}` (known formats: {known})")]
    UnsupportedFormat { requested: String, known: String },

    /// Record compilation was requested for a type that does not expose a
    /// composite record's field contract.
    #[error("`{0}` is not a composite record type")]
    NotAComposite(String),
}
