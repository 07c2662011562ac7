pub use crate::codec::{TokenCodec, MIN_SECRET_LEN};
pub use crate::errors::AuthError;
pub use crate::model::{Claims, GateOutcome, TokenPair};
pub use crate::quota::{
    fixed_window::{FixedWindowLimiter, MethodRateLimiter},
    RateGate,
};
pub use crate::sweep::SweeperHandle;
