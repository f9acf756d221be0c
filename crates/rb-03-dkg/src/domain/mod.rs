//! Domain layer for group creation
//!
//! - `parameters`: group shape and DKG timing
//! - `result`: the submitted DKG result and the digest its signers sign
//! - `validator`: structural, roster and signature validation
//! - `round`: the IDLE → KEY_GENERATION → AWAITING_RESULT → CHALLENGE machine

pub mod parameters;
pub mod result;
pub mod round;
pub mod validator;

pub use parameters::{DkgTimeParameters, GroupParameters};
pub use result::{signing_digest, DkgResult};
pub use round::{DkgRound, DkgState, SubmittedResult};
pub use validator::DkgResultValidator;
