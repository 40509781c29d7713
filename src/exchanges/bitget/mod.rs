pub mod builder;
pub mod connector;
pub mod conversions;
pub mod rest;
pub mod signer;
pub mod types;

pub use builder::{build_connector, BitgetBuilder};
pub use connector::BitgetConnector;
pub use signer::BitgetSigner;
pub use types::{BitgetCustomer, BitgetResponse, BitgetTradeVolume};
