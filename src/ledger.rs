/// Monetary balance for one feedback-bearing stage attempt, with a per-trial
/// accumulation log. Re-initialized on stage entry; never persists across
/// stages.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    balance: i64,
    delta: i64,
    log: Vec<i64>,
}

impl BalanceLedger {
    pub fn new(starting_balance: i64, delta: i64) -> Self {
        Self {
            balance: starting_balance,
            delta,
            log: Vec::new(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// One entry per trial of the stage, in trial order.
    pub fn log(&self) -> &[i64] {
        &self.log
    }

    pub fn reward(&mut self) -> i64 {
        self.balance += self.delta;
        self.log.push(self.balance);
        self.balance
    }

    pub fn penalize(&mut self) -> i64 {
        self.balance -= self.delta;
        self.log.push(self.balance);
        self.balance
    }

    /// Appends the unchanged balance, keeping the log length-aligned with the
    /// other per-trial columns for trials that hit neither branch.
    pub fn snapshot(&mut self) {
        self.log.push(self.balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_and_penalty_log_new_balances() {
        let mut ledger = BalanceLedger::new(200, 10);
        assert_eq!(ledger.reward(), 210);
        assert_eq!(ledger.penalize(), 200);
        assert_eq!(ledger.penalize(), 190);
        assert_eq!(ledger.log(), &[210, 200, 190]);
    }

    #[test]
    fn snapshot_keeps_log_per_trial() {
        let mut ledger = BalanceLedger::new(200, 10);
        ledger.snapshot();
        ledger.reward();
        ledger.snapshot();
        assert_eq!(ledger.log(), &[200, 210, 210]);
        assert_eq!(ledger.balance(), 210);
    }
}
