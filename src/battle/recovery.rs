//! Bounded retry policy for unparsable narration replies
//!
//! Parse failures are transient: the identical request is reissued until a
//! structured reply comes back or the attempt budget runs out. Transport and
//! auth failures are NOT retried here - they propagate to the caller
//! unchanged, and any backoff for them belongs to the HTTP client.

use crate::battle::round::{parse_round_reply, RoundReply};
use crate::core::config::MAX_RECOVERY_ATTEMPTS;
use crate::core::error::Result;
use crate::llm::Narrator;

/// What a bounded recovery run produced.
///
/// `Exhausted` is a distinguished outcome rather than a panic so the caller
/// decides whether it aborts the whole run (the battle engine does).
#[derive(Debug)]
pub enum RecoveryOutcome {
    Parsed(RoundReply),
    Exhausted { attempts: u32 },
}

/// Issue the request until the reply parses, up to [`MAX_RECOVERY_ATTEMPTS`].
///
/// The request payload is identical on every attempt. Returns `Err` only for
/// transport-level failures from the narrator itself.
pub async fn recover_reply(
    narrator: &dyn Narrator,
    system: &str,
    user: &str,
) -> Result<RecoveryOutcome> {
    for attempt in 1..=MAX_RECOVERY_ATTEMPTS {
        let raw = narrator.generate(system, user).await?;

        match parse_round_reply(&raw) {
            Ok(reply) => return Ok(RecoveryOutcome::Parsed(reply)),
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max = MAX_RECOVERY_ATTEMPTS,
                    error = %e,
                    "narration reply was not valid JSON, reissuing"
                );
            }
        }
    }

    Ok(RecoveryOutcome::Exhausted {
        attempts: MAX_RECOVERY_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ArenaError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Always answers with prose that can never parse
    struct BabblingNarrator {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Narrator for BabblingNarrator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("What an incredible exchange of blows!".into())
        }
    }

    /// Fails at the transport layer on the first call
    struct DeadNarrator;

    #[async_trait]
    impl Narrator for DeadNarrator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            Err(ArenaError::Llm("connection refused".into()))
        }
    }

    /// Babbles a fixed number of times, then produces a valid reply
    struct EventualNarrator {
        calls: AtomicU32,
        garbage_rounds: u32,
    }

    #[async_trait]
    impl Narrator for EventualNarrator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.garbage_rounds {
                Ok("not json".into())
            } else {
                Ok(r#"{"effectiveness_1": 100, "damage_1": 10, "narrative_1": "a",
                       "effectiveness_2": 100, "damage_2": 20, "narrative_2": "b",
                       "summary": "s"}"#
                    .into())
            }
        }
    }

    #[tokio::test]
    async fn test_exhausts_after_exactly_the_attempt_cap() {
        let narrator = BabblingNarrator {
            calls: AtomicU32::new(0),
        };
        let outcome = recover_reply(&narrator, "sys", "user").await.unwrap();

        assert!(matches!(
            outcome,
            RecoveryOutcome::Exhausted {
                attempts: MAX_RECOVERY_ATTEMPTS
            }
        ));
        assert_eq!(narrator.calls.load(Ordering::SeqCst), MAX_RECOVERY_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_without_retry() {
        let result = recover_reply(&DeadNarrator, "sys", "user").await;
        assert!(matches!(result, Err(ArenaError::Llm(_))));
    }

    #[tokio::test]
    async fn test_recovers_once_reply_parses() {
        let narrator = EventualNarrator {
            calls: AtomicU32::new(0),
            garbage_rounds: 3,
        };
        let outcome = recover_reply(&narrator, "sys", "user").await.unwrap();

        match outcome {
            RecoveryOutcome::Parsed(reply) => assert_eq!(reply.damage_2, 20),
            RecoveryOutcome::Exhausted { .. } => panic!("expected a parsed reply"),
        }
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 4);
    }
}
