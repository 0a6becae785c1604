use order_checkout::domain::order::OrderFormInput;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const HEADER: [&str; 7] = [
    "name",
    "email",
    "phone",
    "pickup-date",
    "pickup-time",
    "order-description",
    "card",
];

pub const GOOD_CARD: &str = "4111 1111 1111 1111";
pub const DECLINED_CARD: &str = "4000 0000 0000 0002";

pub fn valid_form() -> OrderFormInput {
    OrderFormInput {
        name: "Jane".into(),
        email: "jane@x.com".into(),
        phone: "5551234567".into(),
        pickup_date: chrono::Local::now()
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
        pickup_time: "10:00".into(),
        description: "Two dozen assorted cookies".into(),
    }
}

/// Writes `rows` (each one full record, card last) to a temporary orders CSV.
pub fn orders_csv(rows: &[[&str; 7]]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    {
        let mut wtr = csv::WriterBuilder::new().from_writer(file.as_file_mut());
        wtr.write_record(HEADER)?;
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
    }
    file.flush()?;
    Ok(file)
}
