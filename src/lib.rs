pub mod amount;
pub mod catalog;
pub mod csv;
pub mod engine;
pub mod model;
pub mod shell;

pub use amount::{Amount, AmountParseError};
pub use catalog::{Catalog, CatalogError, CatalogStore};
pub use engine::{ChangePolicy, Engine};
pub use model::{Denomination, Product, TransactionResult, UserId};
pub use shell::Shell;
