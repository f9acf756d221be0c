//! Domain logic for eligibility and slashing

pub mod slashing;
pub mod window;
