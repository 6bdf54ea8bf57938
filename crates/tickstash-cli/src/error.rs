use thiserror::Error;
use tickstash_core::{PipelineError, ValidationError};
use tickstash_store::StoreError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Pipeline(PipelineError::Provider(_)) => 3,
            Self::Pipeline(PipelineError::StoreWrite(_)) | Self::Store(_) => 4,
            Self::Pipeline(
                PipelineError::LocalIo { .. }
                | PipelineError::MalformedHistory { .. }
                | PipelineError::ChartRender { .. },
            ) => 5,
            Self::Pipeline(PipelineError::Upload { .. }) => 6,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_failure_stages() {
        let upload = CliError::Pipeline(PipelineError::Upload {
            key: String::from("stocks/MSFT_stock_data.csv"),
            reason: String::from("403"),
        });
        assert_eq!(upload.exit_code(), 6);

        let validation = CliError::Validation(ValidationError::EmptySymbol);
        assert_eq!(validation.exit_code(), 2);

        let io = CliError::Io(std::io::Error::other("disk full"));
        assert_eq!(io.exit_code(), 10);
    }
}
