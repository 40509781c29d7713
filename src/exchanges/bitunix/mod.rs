pub mod builder;
pub mod connector;
pub mod conversions;
pub mod rest;
pub mod signer;
pub mod types;

pub use builder::build_connector;
pub use connector::BitunixConnector;
pub use signer::BitunixSigner;
pub use types::{BitunixResponse, BitunixTrade, BitunixUser};
