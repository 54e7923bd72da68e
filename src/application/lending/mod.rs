mod catalog;
mod errors;
mod fee_service;
mod lending_service;
mod settlement;
mod status_report;

#[allow(unused_imports)]
pub use catalog::{add_book_to_catalog, list_catalog, search_catalog};
#[allow(unused_imports)]
pub use errors::{CatalogError, LendingError, SettlementError};
#[allow(unused_imports)]
pub use fee_service::calculate_late_fee;
#[allow(unused_imports)]
pub use lending_service::{
    BorrowReceipt, LOAN_PERIOD_DAYS, MAX_ACTIVE_BORROWS, ReturnReceipt, ServiceDependencies,
    borrow_book, return_book,
};
#[allow(unused_imports)]
pub use settlement::{SettlementReceipt, pay_late_fees, refund_late_fee_payment};
#[allow(unused_imports)]
pub use status_report::{PatronStatusReport, get_patron_status};
