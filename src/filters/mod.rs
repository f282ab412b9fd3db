pub mod apply;
pub mod ast;
pub mod order;
pub mod parser;
pub mod sql;

pub use apply::{Predicate, apply_filters, compile};
pub use ast::{BooleanQuery, Condition, FilterField, OrGroup};
pub use order::order;
pub use parser::{ParseError, parse_or_fallback, parse_query};
pub use sql::SqlFilter;
