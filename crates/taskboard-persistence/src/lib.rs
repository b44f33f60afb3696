pub mod ledger_store;
pub mod preference_store;
pub mod store;
pub mod traits;
pub mod writer;

pub use ledger_store::LedgerStore;
pub use preference_store::PreferenceStore;
pub use store::*;
pub use traits::*;
pub use writer::spawn_ledger_writer;
