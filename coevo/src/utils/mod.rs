//! This module contains helper functionality.

mod comparison;
pub use self::comparison::*;

mod error;
pub use self::error::*;

mod parallel;
pub use self::parallel::*;

mod random;
pub use self::random::*;

mod runtime;
pub use self::runtime::*;

mod timing;
pub use self::timing::*;

/// Alias to a scalar floating type.
pub type Float = f64;
