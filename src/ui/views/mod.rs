mod transaction_detail;
mod transactions;

pub use transaction_detail::TransactionDetailView;
pub use transactions::TransactionsView;
