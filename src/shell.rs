//! Text menu front end.
//!
//! The shell turns lines of user input into engine calls and writes the
//! replies to any [`Write`]. It holds the only per-session state the engine
//! does not: which question it is waiting on an answer for.

use std::io::{self, Write};
use std::ops::ControlFlow;

use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::catalog::{Catalog, CatalogStore};
use crate::engine::{DepositError, Engine, PriceError};
use crate::model::UserId;
use crate::Amount;

const MENU: &str = "\
Please make a selection from the following options:
1: Show Soda Price
2: List Soda Options
3: Show Amount Deposited
4: Deposit Money
5: Cancel Transaction
6: Request Soda
9: Close Machine";

/// The line the shell expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Prompt {
    #[default]
    Menu,
    Deposit,
    Selection,
}

/// Console session for a single user.
pub struct Shell<W: Write, C: CatalogStore = Catalog> {
    engine: Engine<C>,
    user: UserId,
    out: W,
    prompt: Prompt,
}

impl<W: Write, C: CatalogStore> Shell<W, C> {
    pub fn new(engine: Engine<C>, user: impl Into<UserId>, out: W) -> Self {
        Self {
            engine,
            user: user.into(),
            out,
            prompt: Prompt::Menu,
        }
    }

    pub fn engine(&self) -> &Engine<C> {
        &self.engine
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Greet, then answer `lines` until the user closes the machine or input ends.
    pub async fn run(&mut self, mut lines: impl Stream<Item = String> + Unpin) -> io::Result<()> {
        writeln!(self.out, "Welcome to our Soda Machine")?;
        writeln!(self.out, "What product would you like today:")?;
        writeln!(self.out, "{MENU}")?;

        while let Some(line) = lines.next().await {
            if self.handle(&line)?.is_break() {
                break;
            }
        }
        self.out.flush()
    }

    /// Answer one line of input.
    pub fn handle(&mut self, line: &str) -> io::Result<ControlFlow<()>> {
        let input = line.trim();

        match std::mem::take(&mut self.prompt) {
            Prompt::Menu => match input {
                "1" => self.show_price()?,
                "2" => self.list_options()?,
                "3" => self.show_deposited()?,
                "4" => {
                    writeln!(self.out, "How much would you like to add to the machine?")?;
                    self.prompt = Prompt::Deposit;
                    return Ok(ControlFlow::Continue(()));
                }
                "5" => self.cancel()?,
                "6" => {
                    self.list_numbered_options()?;
                    self.prompt = Prompt::Selection;
                    return Ok(ControlFlow::Continue(()));
                }
                "9" => {
                    writeln!(self.out, "Thanks have a nice day")?;
                    return Ok(ControlFlow::Break(()));
                }
                other => debug!(input = other, "unrecognised menu option"),
            },
            Prompt::Deposit => self.deposit(input)?,
            Prompt::Selection => self.request(input)?,
        }

        writeln!(self.out)?;
        writeln!(self.out, "{MENU}")?;
        Ok(ControlFlow::Continue(()))
    }

    fn show_price(&mut self) -> io::Result<()> {
        match self.engine.soda_price() {
            Ok(price) => writeln!(self.out, "The price of the soda is ${price:.2}"),
            Err(PriceError::AmbiguousPrice) => {
                for product in self.engine.list_types_of_soda() {
                    writeln!(self.out, "{}: ${:.2}", product.name, product.price)?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.out, "{e}"),
        }
    }

    fn list_options(&mut self) -> io::Result<()> {
        writeln!(self.out, "The soda options are")?;
        for product in self.engine.list_types_of_soda() {
            writeln!(self.out, "{}", product.name)?;
        }
        Ok(())
    }

    fn list_numbered_options(&mut self) -> io::Result<()> {
        writeln!(self.out, "The soda options are")?;
        for (idx, product) in self.engine.list_types_of_soda().iter().enumerate() {
            writeln!(self.out, "{} - {}", idx + 1, product.name)?;
        }
        Ok(())
    }

    fn show_deposited(&mut self) -> io::Result<()> {
        let deposited = self.engine.money_inserted_total(&self.user);
        writeln!(self.out, "You have deposited ${deposited:.2} thus far")
    }

    fn deposit(&mut self, input: &str) -> io::Result<()> {
        let amount = match input.parse::<Amount>() {
            Ok(amount) => amount,
            Err(e) => return writeln!(self.out, "{e}"),
        };

        match self.engine.money_inserted(&self.user, amount) {
            Ok(total) => writeln!(self.out, "You have deposited ${total:.2} thus far"),
            Err(DepositError::InvalidAmount(_)) => {
                writeln!(self.out, "'{input}' is not a valid amount")
            }
            Err(e) => writeln!(self.out, "{e}"),
        }
    }

    fn cancel(&mut self) -> io::Result<()> {
        let refunded = self.engine.money_inserted_total(&self.user);
        self.engine.issue_full_refund(&self.user);
        writeln!(self.out, "You have been refunded ${refunded:.2}")
    }

    fn request(&mut self, input: &str) -> io::Result<()> {
        let soda = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.engine.list_types_of_soda().get(idx))
            .cloned();

        let Some(soda) = soda else {
            return writeln!(self.out, "That was not a correct response");
        };

        let result = self.engine.request_soda(Some(&soda), &self.user);
        if !result.is_success() {
            return writeln!(self.out, "{}", result.error_message());
        }

        if let Some(soda) = &result.soda {
            writeln!(self.out, "Here is your {}", soda.name)?;
        }
        if result.change.is_empty() {
            writeln!(self.out, "There is no change")
        } else {
            writeln!(self.out, "Here is your change:")?;
            for coin in &result.change {
                writeln!(self.out, "{}", coin.name)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChangePolicy;
    use crate::model::{Denomination, Product};

    const USER: &str = "00000000-0000-0000-0000-000000000000";

    fn catalog(products: Vec<Product>) -> Catalog {
        Catalog::new(
            products,
            vec![
                Denomination::new("Dollar", Amount::from_cents(100)),
                Denomination::new("Quarter", Amount::from_cents(25)),
                Denomination::new("Dime", Amount::from_cents(10)),
                Denomination::new("Nickel", Amount::from_cents(5)),
            ],
        )
        .unwrap()
    }

    fn colas() -> Vec<Product> {
        vec![
            Product::new("Cola", Amount::from_cents(125)),
            Product::new("Diet Cola", Amount::from_cents(125)),
        ]
    }

    async fn session(products: Vec<Product>, input: &[&str]) -> (String, Shell<Vec<u8>>) {
        let engine = Engine::with_policy(catalog(products), ChangePolicy::Exact);
        let mut shell = Shell::new(engine, USER, Vec::new());
        let lines: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        shell.run(tokio_stream::iter(lines)).await.unwrap();
        let out = String::from_utf8(shell.out.clone()).unwrap();
        (out, shell)
    }

    #[tokio::test]
    async fn greets_and_closes() {
        let (out, _) = session(colas(), &["9"]).await;
        assert!(out.starts_with("Welcome to our Soda Machine\n"));
        assert!(out.contains("6: Request Soda"));
        assert!(out.ends_with("Thanks have a nice day\n"));
    }

    #[tokio::test]
    async fn shows_uniform_price() {
        let (out, _) = session(colas(), &["1", "9"]).await;
        assert!(out.contains("The price of the soda is $1.25\n"));
    }

    #[tokio::test]
    async fn shows_each_price_when_they_differ() {
        let products = vec![
            Product::new("Cola", Amount::from_cents(125)),
            Product::new("Water", Amount::from_cents(100)),
        ];
        let (out, _) = session(products, &["1", "9"]).await;
        assert!(out.contains("Cola: $1.25\nWater: $1.00\n"));
    }

    #[tokio::test]
    async fn lists_options() {
        let (out, _) = session(colas(), &["2", "9"]).await;
        assert!(out.contains("The soda options are\nCola\nDiet Cola\n"));
    }

    #[tokio::test]
    async fn deposit_and_show_balance() {
        let (out, shell) = session(colas(), &["4", "1.50", "4", "$0.25", "3", "9"]).await;
        assert!(out.contains("How much would you like to add to the machine?\n"));
        assert!(out.contains("You have deposited $1.50 thus far\n"));
        assert!(out.contains("You have deposited $1.75 thus far\n"));
        assert_eq!(
            shell.engine().money_inserted_total(USER),
            Amount::from_cents(175)
        );
    }

    #[tokio::test]
    async fn invalid_deposit_is_reported() {
        let (out, shell) = session(colas(), &["4", "lots", "4", "-2", "9"]).await;
        assert!(out.contains("'lots' is not a valid amount\n"));
        assert!(out.contains("'-2' is not a valid amount\n"));
        assert_eq!(shell.engine().money_inserted_total(USER), Amount::ZERO);
    }

    #[tokio::test]
    async fn deposit_must_be_whole_cents() {
        let (out, shell) =
            session(colas(), &["4", "1.251", "4", "1e2", "4", "0.10", "3", "9"]).await;
        assert!(out.contains("'1.251' is not a valid amount\n"));
        assert!(out.contains("'1e2' is not a valid amount\n"));
        assert!(out.contains("You have deposited $0.10 thus far\n"));
        assert_eq!(
            shell.engine().money_inserted_total(USER),
            Amount::from_cents(10)
        );
    }

    #[tokio::test]
    async fn cancel_refunds_everything() {
        let (out, shell) = session(colas(), &["4", "0.50", "5", "5", "9"]).await;
        assert!(out.contains("You have been refunded $0.50\n"));
        assert!(out.contains("You have been refunded $0.00\n"));
        assert_eq!(shell.engine().money_inserted_total(USER), Amount::ZERO);
    }

    #[tokio::test]
    async fn request_soda_with_change() {
        let (out, shell) = session(colas(), &["4", "2", "6", "1", "9"]).await;
        assert!(out.contains("1 - Cola\n2 - Diet Cola\n"));
        assert!(out.contains("Here is your Cola\nHere is your change:\nQuarter\nQuarter\nQuarter\n"));
        assert_eq!(shell.engine().money_inserted_total(USER), Amount::ZERO);
    }

    #[tokio::test]
    async fn request_soda_exact_money() {
        let (out, _) = session(colas(), &["4", "1.25", "6", "2", "9"]).await;
        assert!(out.contains("Here is your Diet Cola\nThere is no change\n"));
    }

    #[tokio::test]
    async fn request_soda_insufficient_funds() {
        let (out, shell) = session(colas(), &["4", "1", "6", "1", "9"]).await;
        assert!(out.contains("You have not deposited enough money"));
        assert_eq!(
            shell.engine().money_inserted_total(USER),
            Amount::from_cents(100)
        );
    }

    #[tokio::test]
    async fn request_soda_bad_selection() {
        let (out, _) = session(colas(), &["6", "7", "6", "zero", "6", "0", "9"]).await;
        assert_eq!(out.matches("That was not a correct response").count(), 3);
    }

    #[tokio::test]
    async fn unknown_option_shows_menu_again() {
        let (out, _) = session(colas(), &["hello", "9"]).await;
        assert_eq!(out.matches("1: Show Soda Price").count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_stops_quietly() {
        let (out, _) = session(colas(), &["4"]).await;
        assert!(out.ends_with("How much would you like to add to the machine?\n"));
        assert!(!out.contains("Thanks have a nice day"));
    }

    #[test]
    fn handle_reports_exit() {
        let engine = Engine::new(catalog(colas()));
        let mut shell = Shell::new(engine, USER, Vec::new());
        assert!(shell.handle("2").unwrap().is_continue());
        assert!(shell.handle(" 9 ").unwrap().is_break());
        let out = String::from_utf8(shell.into_output()).unwrap();
        assert!(out.contains("Diet Cola"));
    }
}
