//! End-of-operation report sent to the player and written to the log.

use std::time::Duration;

use crate::math::BoundingBox;

/// Final counters of a draw operation
#[derive(Clone, Debug, PartialEq)]
pub struct DrawSummary {
    pub player: String,
    pub description: String,
    pub world: String,
    pub bounds: Option<BoundingBox>,
    pub processed: u64,
    pub updated: u64,
    pub skipped: u64,
    pub denied: u64,
    pub percent_done: u8,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl DrawSummary {
    /// Chat message for the player who issued the operation
    pub fn message(&self) -> String {
        let desc = &self.description;
        let secs = self.elapsed.as_secs_f64();
        match (self.cancelled, self.updated > 0, self.denied > 0) {
            (false, true, false) => {
                format!("{desc}: drew {} blocks in {secs:.2} seconds.", self.updated)
            }
            (false, true, true) => format!(
                "{desc}: drew {} blocks in {secs:.2} seconds, {} blocks skipped due to permission issues.",
                self.updated, self.denied
            ),
            (false, false, false) => format!("{desc}: no blocks needed to be changed."),
            (false, false, true) => format!("{desc}: you are not allowed to affect this area."),
            (true, true, false) => format!(
                "{desc}: cancelled at {}% after changing {} blocks.",
                self.percent_done, self.updated
            ),
            (true, true, true) => format!(
                "{desc}: cancelled at {}% after changing {} blocks, {} blocks were denied.",
                self.percent_done, self.updated, self.denied
            ),
            (true, false, false) => format!("{desc}: cancelled before any blocks were changed."),
            (true, false, true) => {
                format!("{desc}: cancelled, you were not allowed to change any blocks so far.")
            }
        }
    }

    /// Structured line for the server log
    pub fn log_line(&self) -> String {
        let verb = if self.cancelled { "cancelled" } else { "drew" };
        let area = match self.bounds {
            Some(b) if !b.is_empty() => format!("{} to {}", b.min, b.max),
            _ => "no bounds".to_string(),
        };
        format!(
            "{} {} {} in world {} ({}): processed={} updated={} skipped={} denied={} elapsed={:.3}s",
            self.player,
            verb,
            self.description,
            self.world,
            area,
            self.processed,
            self.updated,
            self.skipped,
            self.denied,
            self.elapsed.as_secs_f64(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;

    fn summary(updated: u64, denied: u64, cancelled: bool) -> DrawSummary {
        DrawSummary {
            player: "alice".to_string(),
            description: "Cuboid(Normal(stone))".to_string(),
            world: "main".to_string(),
            bounds: Some(BoundingBox::new(IVec3::ZERO, IVec3::new(2, 2, 2))),
            processed: 27,
            updated,
            skipped: 27 - updated - denied,
            denied,
            percent_done: 40,
            elapsed: Duration::from_millis(1500),
            cancelled,
        }
    }

    #[test]
    fn test_eight_distinct_templates() {
        let mut messages = Vec::new();
        for cancelled in [false, true] {
            for updated in [0, 5] {
                for denied in [0, 3] {
                    messages.push(summary(updated, denied, cancelled).message());
                }
            }
        }
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_message_content() {
        assert_eq!(
            summary(5, 0, false).message(),
            "Cuboid(Normal(stone)): drew 5 blocks in 1.50 seconds."
        );
        assert!(summary(5, 0, true).message().contains("cancelled at 40%"));
        assert!(summary(0, 3, false).message().contains("not allowed"));
    }

    #[test]
    fn test_log_line() {
        let line = summary(5, 3, false).log_line();
        assert!(line.starts_with("alice drew Cuboid(Normal(stone)) in world main"));
        assert!(line.contains("processed=27 updated=5 skipped=19 denied=3"));
        assert!(summary(5, 3, true).log_line().contains("alice cancelled"));
    }
}
