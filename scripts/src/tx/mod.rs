//! Chain access: client, ABI bindings, reads and writes

/// Solidity bindings of the deployed contracts
pub mod abi;
/// Signing RPC client
pub mod client;
/// View calls
pub mod reader;
/// State changing transactions
pub mod sender;
