use crate::domain::payment::PaymentToken;
use serde::{Deserialize, Serialize};

/// The named inputs of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Name,
    Email,
    Phone,
    PickupDate,
    PickupTime,
    Description,
}

impl OrderField {
    pub const ALL: [OrderField; 6] = [
        OrderField::Name,
        OrderField::Email,
        OrderField::Phone,
        OrderField::PickupDate,
        OrderField::PickupTime,
        OrderField::Description,
    ];

    /// Element id of the input on the page.
    pub fn id(self) -> &'static str {
        match self {
            OrderField::Name => "name",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
            OrderField::PickupDate => "pickup-date",
            OrderField::PickupTime => "pickup-time",
            OrderField::Description => "order-description",
        }
    }
}

/// Raw values of the order form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "pickup-date")]
    pub pickup_date: String,
    #[serde(rename = "pickup-time")]
    pub pickup_time: String,
    #[serde(rename = "order-description")]
    pub description: String,
}

impl OrderFormInput {
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Name => &self.name,
            OrderField::Email => &self.email,
            OrderField::Phone => &self.phone,
            OrderField::PickupDate => &self.pickup_date,
            OrderField::PickupTime => &self.pickup_time,
            OrderField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let value = value.into();
        match field {
            OrderField::Name => self.name = value,
            OrderField::Email => self.email = value,
            OrderField::Phone => self.phone = value,
            OrderField::PickupDate => self.pickup_date = value,
            OrderField::PickupTime => self.pickup_time = value,
            OrderField::Description => self.description = value,
        }
    }
}

/// The bundle handed to the order relay: every form field plus the payment token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderPayload {
    #[serde(flatten)]
    pub form: OrderFormInput,
    #[serde(rename = "paymentToken")]
    pub payment_token: PaymentToken,
}

impl OrderPayload {
    pub fn new(form: OrderFormInput, payment_token: PaymentToken) -> Self {
        Self {
            form,
            payment_token,
        }
    }
}
