use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Number of randomisations must be at least 1")]
    NoRandomisations,

    #[error("Number of threads must be at least 1")]
    NoThreads,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum FdrError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("The null distribution is empty, no FDR can be computed")]
    EmptyNullDistribution,

    #[error("Failed to build thread pool: {0}")]
    ThreadPoolError(String),
}
