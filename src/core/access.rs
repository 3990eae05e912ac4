/// Single shared-secret gate in front of the hosted backend.
///
/// This is a convenience lock, not a security boundary: the comparison is an
/// exact string match with no hashing, rate limiting, or lockout.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: Option<String>,
    unlocked: bool,
}

impl AccessGate {
    /// An empty secret counts as "no gate configured".
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret.filter(|secret| !secret.is_empty());
        let unlocked = secret.is_none();
        Self { secret, unlocked }
    }

    pub fn is_required(&self) -> bool {
        self.secret.is_some()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Check a supplied code; a match unlocks the gate for the rest of the run.
    pub fn try_unlock(&mut self, supplied: &str) -> bool {
        if self.unlocked {
            return true;
        }
        if self.secret.as_deref() == Some(supplied) {
            self.unlocked = true;
        }
        self.unlocked
    }
}
