//! Stock capability consumed by the engine, plus an in-memory service.
//!
//! The engine only ever sees the traits. `InMemoryStock` stands in for the
//! remote stock service in the CLI and in tests; its decrement runs under a
//! single lock so two sessions racing for the last unit cannot both win.

use crate::error::{EngineError, Result, StockError};
use crate::product::Product;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard};

/// Read access to stock records.
pub trait StockReader {
    /// Returns `true` if a record exists for `product_num`.
    fn exists(&self, product_num: &str) -> std::result::Result<bool, StockError>;

    /// Returns a copy of the stock record.
    fn get_details(&self, product_num: &str) -> std::result::Result<Product, StockError>;
}

/// Read/write access to stock records.
pub trait StockReadWriter: StockReader {
    /// Atomically removes `quantity` units if enough are on hand.
    ///
    /// `Ok(false)` means insufficient stock, which is not an error.
    fn buy_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<bool, StockError>;

    /// Adds `quantity` units to an existing record.
    ///
    /// Fails with [`StockError::StockLimit`] rather than overflowing the level.
    fn add_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<(), StockError>;

    /// Inserts or replaces a whole record.
    ///
    /// Records whose price fails [`Product::validate`] are rejected.
    fn modify_stock(&self, product: &Product) -> std::result::Result<(), StockError>;
}

impl<T: StockReader + ?Sized> StockReader for Arc<T> {
    fn exists(&self, product_num: &str) -> std::result::Result<bool, StockError> {
        (**self).exists(product_num)
    }

    fn get_details(&self, product_num: &str) -> std::result::Result<Product, StockError> {
        (**self).get_details(product_num)
    }
}

impl<T: StockReadWriter + ?Sized> StockReadWriter for Arc<T> {
    fn buy_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<bool, StockError> {
        (**self).buy_stock(product_num, quantity)
    }

    fn add_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<(), StockError> {
        (**self).add_stock(product_num, quantity)
    }

    fn modify_stock(&self, product: &Product) -> std::result::Result<(), StockError> {
        (**self).modify_stock(product)
    }
}

/// Stock service backed by a locked hash map.
#[derive(Debug, Default)]
pub struct InMemoryStock {
    products: Mutex<HashMap<String, Product>>,
}

impl InMemoryStock {
    /// Creates an empty stock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stock service holding the given records.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| (p.product_num.clone(), p))
            .collect();
        InMemoryStock {
            products: Mutex::new(products),
        }
    }

    /// Loads stock records from CSV with header `product,description,price,stock`.
    ///
    /// Unparseable rows and rows with a negative or out-of-range price are
    /// logged at warn level and skipped. A product number appearing twice is
    /// rejected.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut products = HashMap::new();
        for (row_idx, result) in csv_reader.deserialize::<Product>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(product) => {
                    if let Err(e) = product.validate() {
                        warn!("Row {}: {}", row_num, e);
                        continue;
                    }
                    if products.contains_key(&product.product_num) {
                        return Err(EngineError::InvalidRecord {
                            row: row_num,
                            message: format!("duplicate product number {}", product.product_num),
                        });
                    }
                    debug!("Row {}: Loaded stock record {}", row_num, product.product_num);
                    products.insert(product.product_num.clone(), product);
                }
                Err(e) => {
                    warn!("Row {}: Stock CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(InMemoryStock {
            products: Mutex::new(products),
        })
    }

    /// Returns all records sorted by product number.
    pub fn snapshot(&self) -> std::result::Result<Vec<Product>, StockError> {
        let mut products: Vec<_> = self.lock()?.values().cloned().collect();
        products.sort_by(|a, b| a.product_num.cmp(&b.product_num));
        Ok(products)
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, HashMap<String, Product>>, StockError> {
        self.products
            .lock()
            .map_err(|_| StockError::Unavailable("stock store lock poisoned".to_string()))
    }
}

impl StockReader for InMemoryStock {
    fn exists(&self, product_num: &str) -> std::result::Result<bool, StockError> {
        Ok(self.lock()?.contains_key(product_num))
    }

    fn get_details(&self, product_num: &str) -> std::result::Result<Product, StockError> {
        self.lock()?
            .get(product_num)
            .cloned()
            .ok_or_else(|| StockError::UnknownProduct(product_num.to_string()))
    }
}

impl StockReadWriter for InMemoryStock {
    fn buy_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<bool, StockError> {
        let mut products = self.lock()?;
        let Some(product) = products.get_mut(product_num) else {
            return Ok(false);
        };

        if !product.has_stock_for(quantity) {
            debug!(
                "Insufficient stock for {}: wanted {}, have {}",
                product_num, quantity, product.stock_level
            );
            return Ok(false);
        }

        product.stock_level -= quantity;
        Ok(true)
    }

    fn add_stock(&self, product_num: &str, quantity: u32) -> std::result::Result<(), StockError> {
        let mut products = self.lock()?;
        let product = products
            .get_mut(product_num)
            .ok_or_else(|| StockError::UnknownProduct(product_num.to_string()))?;

        product.stock_level = product.stock_level.checked_add(quantity).ok_or_else(|| {
            StockError::StockLimit {
                product_num: product_num.to_string(),
                max: u32::MAX,
            }
        })?;
        Ok(())
    }

    fn modify_stock(&self, product: &Product) -> std::result::Result<(), StockError> {
        product.validate()?;
        self.lock()?
            .insert(product.product_num.clone(), product.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use std::io::Cursor;

    fn stock() -> InMemoryStock {
        InMemoryStock::with_products([
            Product::new("0001", "Toaster", Money::from_cents(300), 5),
            Product::new("0002", "Kettle", Money::from_cents(1250), 0),
        ])
    }

    #[test]
    fn test_exists_and_details() {
        let stock = stock();
        assert!(stock.exists("0001").unwrap());
        assert!(!stock.exists("9999").unwrap());
        assert_eq!(stock.get_details("0001").unwrap().description, "Toaster");
        assert_eq!(
            stock.get_details("9999"),
            Err(StockError::UnknownProduct("9999".to_string()))
        );
    }

    #[test]
    fn test_buy_stock_decrements() {
        let stock = stock();
        assert!(stock.buy_stock("0001", 1).unwrap());
        assert_eq!(stock.get_details("0001").unwrap().stock_level, 4);
    }

    #[test]
    fn test_buy_stock_insufficient_is_not_an_error() {
        let stock = stock();
        assert!(!stock.buy_stock("0002", 1).unwrap());
        assert!(!stock.buy_stock("0001", 6).unwrap());
        assert_eq!(stock.get_details("0001").unwrap().stock_level, 5);
    }

    #[test]
    fn test_last_unit_sold_once_across_threads() {
        let stock = Arc::new(InMemoryStock::with_products([Product::new(
            "0001",
            "Toaster",
            Money::from_cents(300),
            1,
        )]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stock = Arc::clone(&stock);
                std::thread::spawn(move || stock.buy_stock("0001", 1).unwrap())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_add_and_modify_stock() {
        let stock = stock();
        stock.add_stock("0002", 3).unwrap();
        assert_eq!(stock.get_details("0002").unwrap().stock_level, 3);
        assert!(stock.add_stock("9999", 1).is_err());

        stock
            .modify_stock(&Product::new("0003", "Radio", Money::from_cents(2000), 2))
            .unwrap();
        assert!(stock.exists("0003").unwrap());
    }

    #[test]
    fn test_add_stock_overflow_leaves_level_unchanged() {
        let stock = stock();
        assert_eq!(
            stock.add_stock("0001", u32::MAX),
            Err(StockError::StockLimit {
                product_num: "0001".to_string(),
                max: u32::MAX,
            })
        );
        assert_eq!(stock.get_details("0001").unwrap().stock_level, 5);
    }

    #[test]
    fn test_modify_stock_rejects_negative_price() {
        let stock = stock();
        let err = stock
            .modify_stock(&Product::new("0001", "Toaster", Money::from_cents(-300), 5))
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidPrice { .. }));
        assert_eq!(stock.get_details("0001").unwrap().price, Money::from_cents(300));
    }

    #[test]
    fn test_from_csv_skips_out_of_range_prices() {
        let csv = "product,description,price,stock
                   0001, Toaster, 3.00, 5
                   0002, Refund, -5.00, 1
                   0003, Gold, 79228162514264337593543950335, 1
                   0004, Radio, 1000000000.00, 2
";

        let stock = InMemoryStock::from_csv(Cursor::new(csv)).unwrap();
        let numbers: Vec<_> = stock
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|p| p.product_num)
            .collect();
        assert_eq!(numbers, vec!["0001", "0004"]);
    }

    #[test]
    fn test_from_csv_skips_bad_rows() {
        let csv = "product,description,price,stock\n\
                   0001, Toaster, 3.00, 5\n\
                   0002, Kettle, not-a-price, 1\n\
                   0003, Radio, 20, 2\n";

        let stock = InMemoryStock::from_csv(Cursor::new(csv)).unwrap();
        let products = stock.snapshot().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.to_string(), "3.00");
        assert_eq!(products[1].product_num, "0003");
    }

    #[test]
    fn test_from_csv_rejects_duplicate_product() {
        let csv = "product,description,price,stock\n0001,Toaster,3,5\n0001,Toaster,3,5\n";
        let err = InMemoryStock::from_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { row: 3, .. }));
    }
}
