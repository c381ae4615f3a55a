use std::time::{Duration, Instant};

/// Window after a "previous" press that rewound the track. A second press
/// inside it goes to the previous track instead.
///
/// At most one deadline is pending; arming again replaces it.
#[derive(Debug)]
pub struct RewindWindow {
    length: Duration,
    deadline: Option<Instant>,
}

impl RewindWindow {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.length);
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Drop an expired deadline. Returns true when one just lapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
