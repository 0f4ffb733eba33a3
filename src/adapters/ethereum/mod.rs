//! Contract reader adapters for the Liquid token

pub mod rpc_reader;
pub mod static_reader;

pub use rpc_reader::{RpcContractReader, Selectors};
pub use static_reader::StaticContractReader;
