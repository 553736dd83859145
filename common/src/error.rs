use thiserror::Error;

/// Failure taxonomy of the pipeline.
///
/// Classification and extraction never fail; everything here comes from
/// target resolution, contract decoding or command construction.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unknown selector/policy, or the selector's source data is missing.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A contract identifier that does not follow the grammar.
    #[error("malformed contract id '{id}': {reason}")]
    Format { id: String, reason: String },
    /// Input that is structurally fine but unusable (empty targets, missing field).
    #[error("validation error: {0}")]
    Validation(String),
    /// Unknown protocol, option or module.
    #[error("unknown {kind} '{name}'")]
    Lookup { kind: &'static str, name: String },
    /// The asset pagination collaborator failed.
    #[error("inventory lookup failed")]
    Inventory(#[source] anyhow::Error),
}

impl PipelineError {
    pub fn lookup(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
        }
    }

    pub fn format(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
