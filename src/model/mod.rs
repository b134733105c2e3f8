pub mod filter;
pub mod import;
pub mod link;
pub mod node;
pub mod transaction;

pub use filter::DateRange;
pub use filter::GraphFilter;
pub use import::ColumnMapping;
pub use link::FlowLink;
pub use node::AddressNode;
pub use node::NodeKind;
pub use transaction::Transaction;
pub use transaction::TxKind;
pub use transaction::TxStatus;
