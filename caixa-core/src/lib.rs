//! caixa-core: transaction records, categories and the description classifier

pub mod amount;
pub mod categorizer;
pub mod category;
pub mod record;
pub mod rules;
pub mod time;

pub use amount::{add_amounts, sum_amounts};
pub use categorizer::{classify, classify_builtin};
pub use category::{ALL_CATEGORIES, OTHER, TAXONOMY, default_categories};
pub use record::{Kind, NO_DESCRIPTION, NewTransaction, Origin, TransactionRecord};
pub use rules::{CategoryRule, CategoryRules};
pub use time::{Clock, FixedClock, SystemClock, month_start};
