//! Domain layer for relay entries

pub mod parameters;
pub mod relay;
pub mod request;

pub use parameters::RelayParameters;
pub use relay::Relay;
pub use request::RelayRequest;
