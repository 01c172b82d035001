#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod error;
pub mod optional;

pub use error::*;
pub use optional::*;

