use crate::domain::order::OrderFormInput;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of an order batch: the form values plus the card number to type
/// into the card input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "pickup-date", default)]
    pub pickup_date: String,
    #[serde(rename = "pickup-time", default)]
    pub pickup_time: String,
    #[serde(rename = "order-description", default)]
    pub description: String,
    #[serde(default)]
    pub card: String,
}

impl OrderRequest {
    pub fn into_parts(self) -> (OrderFormInput, String) {
        let form = OrderFormInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            pickup_date: self.pickup_date,
            pickup_time: self.pickup_time,
            description: self.description,
        };
        (form, self.card)
    }
}

/// Reads order requests from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace around every field.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and deserializes the rows; a malformed row yields an error
    /// without ending the stream.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,email,phone,pickup-date,pickup-time,order-description,card";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\n\
             Jane, jane@x.com, (555) 123-4567, 2099-01-01, 10:00, Two dozen cookies, 4111111111111111\n\
             Sam,sam@x.com,5559876543,2099-01-02,11:30,One birthday cake please,4000000000000002"
        );
        let reader = OrderReader::new(data.as_bytes());
        let results: Vec<Result<OrderRequest>> = reader.orders().collect();

        assert_eq!(results.len(), 2);
        let (form, card) = results[0].as_ref().unwrap().clone().into_parts();
        assert_eq!(form.name, "Jane");
        assert_eq!(form.phone, "(555) 123-4567");
        assert_eq!(form.description, "Two dozen cookies");
        assert_eq!(card, "4111111111111111");
    }

    #[test]
    fn test_empty_cells_stay_empty() {
        let data = format!("{HEADER}\n,jane@x.com,5551234567,2099-01-01,10:00,Two dozen cookies,");
        let reader = OrderReader::new(data.as_bytes());
        let request = reader.orders().next().unwrap().unwrap();

        assert_eq!(request.name, "");
        assert_eq!(request.card, "");
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\nJane,jane@x.com\nSam,sam@x.com,5559876543,2099-01-02,11:30,Cake for ten,4111111111111111");
        let reader = OrderReader::new(data.as_bytes());
        let results: Vec<Result<OrderRequest>> = reader.orders().collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
