//! Rule-based advisory scoring: explicit weighted sums over enumerated
//! factors. No hidden state, no randomness; every function is deterministic
//! given the same history and reference date. Advisory output never blocks
//! or forces a transition.

pub mod burnout;
pub mod parse;
pub mod suggest;
pub mod timing;
