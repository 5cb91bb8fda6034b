mod eligibility;
mod errors;
mod lending_service;

pub use eligibility::{MAX_OUTSTANDING_LENDINGS, check_eligibility};
pub use errors::{LendingApplicationError, Result};
pub use lending_service::{
    ServiceDependencies, create_lending, find_by_lending_number, get_average_duration,
    get_avg_lending_duration_by_isbn, get_overdue, list_by_reader_number_and_isbn,
    list_by_username_and_isbn, search_lendings, set_returned,
};
