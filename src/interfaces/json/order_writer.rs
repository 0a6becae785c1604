use crate::domain::order::OrderPayload;
use crate::domain::ports::OrderRelay;
use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Relays orders by writing each payload as one line of JSON.
pub struct JsonLinesRelay<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesRelay<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> OrderRelay for JsonLinesRelay<W> {
    async fn submit(&self, payload: OrderPayload) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, &payload)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
