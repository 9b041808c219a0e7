use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;

fn machine(denominations: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("soda-machine"));
    cmd.arg("--products")
        .arg("tests/fixtures/products.csv")
        .arg("--denominations")
        .arg(format!("tests/fixtures/{denominations}"))
        .env("RUST_LOG", "warn")
        .env_remove("SODA_CHANGE_POLICY")
        .env_remove("SODA_USER");
    cmd
}

#[test]
fn purchase_returns_change() {
    machine("denominations.csv")
        .write_stdin("4\n2\n6\n1\n3\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Welcome to our Soda Machine"))
        .stdout(predicate::str::contains("1 - Cola\n2 - Root Beer\n"))
        .stdout(predicate::str::contains(
            "Here is your Cola\nHere is your change:\nQuarter\nQuarter\nQuarter\n",
        ))
        .stdout(predicate::str::contains("You have deposited $0.00 thus far"))
        .stdout(predicate::str::ends_with("Thanks have a nice day\n"));
}

#[test]
fn mixed_prices_are_listed_per_product() {
    machine("denominations.csv")
        .write_stdin("1\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cola: $1.25\nRoot Beer: $1.50\n"));
}

#[test]
fn invalid_deposit_is_reported_not_swallowed() {
    machine("denominations.csv")
        .write_stdin("4\nabc\n4\n1.251\n4\n1e2\n3\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'abc' is not a valid amount"))
        .stdout(predicate::str::contains("'1.251' is not a valid amount"))
        .stdout(predicate::str::contains("'1e2' is not a valid amount"))
        .stdout(predicate::str::contains("You have deposited $0.00 thus far"));
}

#[test]
fn insufficient_funds_keeps_balance() {
    machine("denominations.csv")
        .write_stdin("4\n1\n6\n1\n5\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have not deposited enough money"))
        .stdout(predicate::str::contains("You have been refunded $1.00"));
}

#[test]
fn exact_policy_refuses_unmakeable_change() {
    machine("quarters.csv")
        .write_stdin("4\n1.40\n6\n1\n5\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exact change of $0.15 cannot be made"))
        .stdout(predicate::str::contains("Here is your").not())
        .stdout(predicate::str::contains("You have been refunded $1.40"));
}

#[test]
fn best_effort_policy_dispenses_anyway() {
    machine("quarters.csv")
        .env("SODA_CHANGE_POLICY", "best-effort")
        .write_stdin("4\n1.65\n6\n1\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Here is your Cola\nHere is your change:\nQuarter\n",
        ));
}

#[test]
fn end_of_input_exits_cleanly() {
    machine("denominations.csv")
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Root Beer"))
        .stdout(predicate::str::contains("Thanks have a nice day").not());
}

#[test]
fn bad_catalog_fails_to_start() {
    let mut cmd = Command::new(cargo_bin!("soda-machine"));
    cmd.arg("--products")
        .arg("tests/fixtures/bad_products.csv")
        .arg("--denominations")
        .arg("tests/fixtures/denominations.csv")
        .env("RUST_LOG", "warn")
        .write_stdin("9\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'one dollar' is not a valid amount"));
}

#[test]
fn missing_catalog_fails_to_start() {
    let mut cmd = Command::new(cargo_bin!("soda-machine"));
    cmd.arg("--products")
        .arg("tests/fixtures/nope.csv")
        .env("RUST_LOG", "warn")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load catalog"));
}
