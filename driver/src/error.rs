use error_stack::Report;

use kernel::prelude::entity::InvalidLoanStatus;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(sqlx::Error),
    #[error(transparent)]
    Migration(sqlx::migrate::MigrateError),
    #[error(transparent)]
    Env(dotenvy::Error),
    #[error(transparent)]
    Conversion(anyhow::Error),
}

impl From<sqlx::Error> for DriverError {
    fn from(value: sqlx::Error) -> Self {
        Self::SqlX(value)
    }
}

impl From<sqlx::migrate::MigrateError> for DriverError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(value)
    }
}

impl From<dotenvy::Error> for DriverError {
    fn from(value: dotenvy::Error) -> Self {
        Self::Env(value)
    }
}

impl From<InvalidLoanStatus> for DriverError {
    fn from(value: InvalidLoanStatus) -> Self {
        Self::Conversion(anyhow::Error::new(value))
    }
}

impl From<DriverError> for Report<KernelError> {
    fn from(value: DriverError) -> Self {
        let context = match &value {
            DriverError::SqlX(sqlx::Error::PoolTimedOut) => KernelError::Timeout,
            _ => KernelError::Internal,
        };
        Report::new(value).change_context(context)
    }
}

pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
