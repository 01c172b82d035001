use derive_more::Display;


/// Returned by the checked accessors of a disengaged `Optional`.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display(fmt = "Bad optional access")]
pub struct BadOptionalAccess;

#[cfg(feature = "std")]
impl std::error::Error for BadOptionalAccess {}


pub type OptionalResult<T> = Result<T, BadOptionalAccess>;
