pub mod adapter;
pub mod gateway;
pub mod host;
pub mod interface;
pub mod range;
pub mod subnet;
