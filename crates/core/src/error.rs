#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read safety policy file: {0}")]
    SafetyPolicyRead(std::io::Error),
    #[error("failed to parse safety policy YAML: {0}")]
    SafetyPolicyParse(serde_yaml::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
