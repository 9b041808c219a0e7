use crate::Amount;

/// Money a user has put into the machine and not yet spent.
#[derive(Debug, Default)]
pub struct UserBalance {
    deposited: Amount,
}

impl UserBalance {
    pub fn deposited(&self) -> Amount {
        self.deposited
    }

    /// Add to the balance, `None` on overflow (balance unchanged).
    pub fn credit(&mut self, amount: Amount) -> Option<Amount> {
        self.deposited = self.deposited.checked_add(amount)?;
        Some(self.deposited)
    }
}
