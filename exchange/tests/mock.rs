use std::collections::HashMap;

use rust_decimal::Decimal;

use exchange::types::{Oracle, TokenCustody};

/// Fixed-price oracle; unknown denoms have no quote.
#[derive(Default)]
pub struct MockOracle {
    prices: HashMap<String, Decimal>,
}

impl MockOracle {
    pub fn with_price(mut self, denom: &str, price: Decimal) -> Self {
        self.prices.insert(denom.to_string(), price);
        self
    }
}

impl Oracle for MockOracle {
    fn current_price(&self, denom: &str) -> Option<Decimal> {
        self.prices.get(denom).copied()
    }
}

/// In-memory custody ledger keyed by (account, denom). Mint and burn act
/// on the configured pool account, as the engine's custody contract
/// expects.
pub struct MockCustody {
    pool_account: String,
    balances: HashMap<(String, String), u128>,
}

impl MockCustody {
    pub fn new(pool_account: &str) -> Self {
        Self {
            pool_account: pool_account.to_string(),
            balances: HashMap::new(),
        }
    }

    pub fn credit(&mut self, account: &str, denom: &str, amount: u128) {
        *self
            .balances
            .entry((account.to_string(), denom.to_string()))
            .or_default() += amount;
    }

    pub fn balance(&self, account: &str, denom: &str) -> u128 {
        self.balances
            .get(&(account.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl TokenCustody for MockCustody {
    fn has_balance(&self, account: &str, denom: &str, amount: u128) -> bool {
        self.balance(account, denom) >= amount
    }

    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        denom: &str,
        amount: u128,
    ) -> anyhow::Result<()> {
        let have = self.balance(from, denom);
        anyhow::ensure!(have >= amount, "{from} holds {have} {denom}, needs {amount}");
        self.balances
            .insert((from.to_string(), denom.to_string()), have - amount);
        self.credit(to, denom, amount);
        Ok(())
    }

    fn mint(&mut self, denom: &str, amount: u128) -> anyhow::Result<()> {
        let pool = self.pool_account.clone();
        self.credit(&pool, denom, amount);
        Ok(())
    }

    fn burn(&mut self, denom: &str, amount: u128) -> anyhow::Result<()> {
        let pool = self.pool_account.clone();
        let have = self.balance(&pool, denom);
        anyhow::ensure!(have >= amount, "pool holds {have} {denom}, cannot burn {amount}");
        self.balances.insert((pool, denom.to_string()), have - amount);
        Ok(())
    }
}
