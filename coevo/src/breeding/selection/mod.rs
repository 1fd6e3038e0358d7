//! Selection operators: pipeline sources which pick individuals from the source population.

mod elitism;
pub use self::elitism::*;

mod proportional;
pub use self::proportional::*;

mod random;
pub use self::random::*;

mod tournament;
pub use self::tournament::*;

use super::*;
