//! # rb-03-dkg
//!
//! Group creation: validating distributed key generation results and driving
//! the on-chain DKG round.
//!
//! ## Overview
//!
//! Members of a freshly sampled group run DKG off-chain. One member submits
//! the result; anyone may challenge it during the challenge period by proving
//! it invalid. Unchallenged results are approved and the group becomes active.
//!
//! ```text
//!  Sortition Pool ──select_group(seed)──→ roster ──┐
//!                                                   ▼
//!  submitter ──DkgResult──→ validate_fields ──→ CHALLENGE ──approve──→ GroupRegistry
//!                                                   │
//!  challenger ──────────────────────────────────────┴──validate() fails──→ discard + slash
//! ```
//!
//! ## Ports
//!
//! | Port | Direction | Purpose |
//! |------|-----------|---------|
//! | `SortitionPool` | outbound | roster sampling, operator lookup, pool locking |
//! | `SignerRecovery` | outbound | secp256k1 address recovery |

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::EcdsaSignerRecovery;
pub use domain::{
    signing_digest, DkgResult, DkgResultValidator, DkgRound, DkgState, DkgTimeParameters,
    GroupParameters, SubmittedResult,
};
pub use error::{DkgError, DkgRoundResult, ValidationError};
pub use ports::{PoolError, SignerRecovery, SortitionPool};
