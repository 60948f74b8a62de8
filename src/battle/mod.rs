//! Turn-based battle simulation narrated by an LLM
//!
//! Each round both combatants draw one of their four moves at random, the
//! exchange is sent to the narration service with the prior round's summary
//! as context, and the structured reply's damage is applied cross-wise to
//! the receivers. Unparsable replies are retried under a hard attempt cap.

pub mod character;
pub mod engine;
pub mod prompt;
pub mod recovery;
pub mod round;

pub use character::{Character, Move};
pub use engine::{BattleEngine, BattleOutcome, BattleReport, BattleState, RoundReport};
pub use recovery::{recover_reply, RecoveryOutcome};
pub use round::{parse_round_reply, strip_code_fences, RoundReply};
