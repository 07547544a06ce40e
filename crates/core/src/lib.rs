pub mod amount;
pub mod category;
pub mod interval;
pub mod record;
pub mod statistic;

pub use amount::{format_locale_number, parse_locale_number, AmountError};
pub use category::{Category, FALLBACK_CATEGORY};
pub use interval::{Interval, IntervalError};
pub use record::{inflows, ClassifiedRecord, Field, TransactionRecord};
pub use statistic::{aggregate, Breakdown, Categorisation, CategorySlice, Statistic};
