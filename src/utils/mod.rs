pub mod dates;
pub mod money;
pub mod password;

pub use dates::{format_report_date, parse_input_date, parse_iso_date};
pub use money::{bounded_money, checked_money, format_amount, round_money};
