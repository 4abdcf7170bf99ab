use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pipeline: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] tabflow_core::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
