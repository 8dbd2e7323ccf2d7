use chrono::NaiveDate;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// Store-assigned customer identity.
pub type CustomerId = i32;

/// Domain customer; identical to the stored row.
pub type Customer = models::customer::Model;

/// Creation input. `email` is required by the business rules; everything
/// else is optional and the store fills `date_joined`/`status` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_joined: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

impl NewCustomer {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self { email: Some(email.into()), ..Default::default() }
    }
}

/// Partial update.
///
/// Outer `None` leaves a column untouched; for nullable columns
/// `Some(None)` clears it. A `customer_id` key is accepted and dropped: it
/// only counts towards the patch not being empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub dob: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    #[serde(default)]
    pub date_joined: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "customer_id", deserialize_with = "present")]
    pub carries_customer_id: bool,
}

impl CustomerPatch {
    /// True when at least one updatable column is set.
    pub fn has_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.dob.is_some()
            || self.address.is_some()
            || self.email.is_some()
            || self.phone_number.is_some()
            || self.date_joined.is_some()
            || self.status.is_some()
    }

    /// True when the request carried nothing at all.
    pub fn is_empty(&self) -> bool {
        !self.has_changes() && !self.carries_customer_id
    }
}

fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn present<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(de).map(|_| true)
}

/// Trimmed email, or `None` when absent or blank.
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_string)
}
