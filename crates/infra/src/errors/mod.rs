//! Infrastructure error conversions

mod conversions;

pub(crate) use conversions::is_timeout;
pub use conversions::InfraError;
