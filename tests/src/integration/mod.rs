//! Full protocol flows driven through `RandomBeaconService` with real
//! BLS group keys and secp256k1 operator keys.

mod dkg_flow;
mod properties;
mod relay_flow;
