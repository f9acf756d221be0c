//! Ports module for relay entries

pub mod outbound;

pub use outbound::EntryVerifier;
