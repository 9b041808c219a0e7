use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::model::{Denomination, Product};
use crate::{Amount, AmountParseError};

/// Errors that can occur when loading catalog csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("{}: failed to open: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },

    #[error("{}: line {line}: failed to parse row: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: csv::Error,
    },

    #[error("{}: line {line}: {source}", path.display())]
    InvalidAmount {
        path: PathBuf,
        line: usize,
        source: AmountParseError,
    },
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    name: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct DenominationRow {
    name: String,
    value: String,
}

/// Read `(name, amount)` rows, mapping each into `T`
fn read_rows<R, T>(
    path: &Path,
    split: impl Fn(R) -> (String, String),
    build: impl Fn(String, Amount) -> T,
) -> Result<Vec<T>, CsvError>
where
    R: DeserializeOwned,
{
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .into_deserialize::<R>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse {
                path: path.to_path_buf(),
                line,
                source,
            })?;
            let (name, amount) = split(row);
            let amount = amount
                .parse::<Amount>()
                .map_err(|source| CsvError::InvalidAmount {
                    path: path.to_path_buf(),
                    line,
                    source,
                })?;
            Ok(build(name, amount))
        })
        .collect()
}

/// Read products from a `name,price` csv file
pub fn read_products(path: impl AsRef<Path>) -> Result<Vec<Product>, CsvError> {
    read_rows(
        path.as_ref(),
        |row: ProductRow| (row.name, row.price),
        |name, price| Product::new(name, price),
    )
}

/// Read denominations from a `name,value` csv file
pub fn read_denominations(path: impl AsRef<Path>) -> Result<Vec<Denomination>, CsvError> {
    read_rows(
        path.as_ref(),
        |row: DenominationRow| (row.name, row.value),
        |name, value| Denomination::new(name, value),
    )
}

/// Load and validate a full catalog from its two csv files
pub fn read_catalog(
    products: impl AsRef<Path>,
    denominations: impl AsRef<Path>,
) -> Result<Catalog, CatalogError> {
    let products = read_products(products)?;
    let denominations = read_denominations(denominations)?;
    Catalog::new(products, denominations)
}
