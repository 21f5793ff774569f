//! Rule helpers shared by the supplier strategies.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{format_amount, parse_amount};
pub use dates::{parse_dmy, parse_long_date};
pub use patterns::*;
