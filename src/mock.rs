//! Offline responder used when mock mode is enabled

use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Canned acknowledgements served in mock mode
pub const CANNED_RESPONSES: [&str; 5] = [
    "Thanks for your message! I'll process your request.",
    "Got it, working on it. Could you share a few more details?",
    "Great question! Let's figure it out together.",
    "Noted. Is there anything else you'd like to know?",
    "Thanks for reaching out! I'll pass this on to an administrator.",
];

pub const MIN_DELAY: Duration = Duration::from_millis(1000);
pub const MAX_DELAY: Duration = Duration::from_millis(2000);

/// How mock mode picks its reply and how long it pretends to think
pub trait ReplyStrategy: Send + Sync {
    /// Delay in `[MIN_DELAY, MAX_DELAY)`
    fn choose_delay(&self) -> Duration;

    fn choose_response(&self) -> String;
}

/// Uniform random delay and uniform random canned response
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomReplies;

impl ReplyStrategy for RandomReplies {
    fn choose_delay(&self) -> Duration {
        let range = MIN_DELAY.as_millis() as u64..MAX_DELAY.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(range))
    }

    fn choose_response(&self) -> String {
        CANNED_RESPONSES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(CANNED_RESPONSES[0])
            .to_string()
    }
}

/// Deterministic stand-in: always the same delay and the same canned entry
#[derive(Debug, Clone, Copy)]
pub struct FixedReplies {
    pub delay: Duration,
    pub index: usize,
}

impl ReplyStrategy for FixedReplies {
    fn choose_delay(&self) -> Duration {
        self.delay
    }

    fn choose_response(&self) -> String {
        CANNED_RESPONSES[self.index % CANNED_RESPONSES.len()].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_delay_stays_in_range() {
        let strategy = RandomReplies;
        for _ in 0..200 {
            let delay = strategy.choose_delay();
            assert!(delay >= MIN_DELAY, "{:?} below range", delay);
            assert!(delay < MAX_DELAY, "{:?} above range", delay);
        }
    }

    #[test]
    fn random_response_is_canned() {
        let strategy = RandomReplies;
        for _ in 0..50 {
            let text = strategy.choose_response();
            assert!(CANNED_RESPONSES.contains(&text.as_str()));
        }
    }

    #[test]
    fn fixed_index_wraps() {
        let strategy = FixedReplies {
            delay: MIN_DELAY,
            index: CANNED_RESPONSES.len() + 2,
        };
        assert_eq!(strategy.choose_response(), CANNED_RESPONSES[2]);
    }
}
