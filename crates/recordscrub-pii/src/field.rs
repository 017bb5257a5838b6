//! Field catalogue
//!
//! Records are classified key by key. A key is either exempt (always copied
//! verbatim), a direct-PII key with its own masker, or an unknown key that
//! passes through untouched. Key matching is exact and case-sensitive.

use serde::{Deserialize, Serialize};

/// Keys that are never treated as PII, even if their content looks sensitive
pub const EXEMPT_KEYS: &[&str] = &[
    "first_name",
    "last_name",
    "city",
    "state",
    "pin_code",
    "transaction_id",
    "order_id",
    "product_description",
    "product_name",
];

/// Check whether a key is on the exempt list
pub fn is_exempt(key: &str) -> bool {
    EXEMPT_KEYS.contains(&key)
}

/// Keys whose presence alone marks a record as containing PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PIIField {
    /// Phone number
    Phone,

    /// Aadhaar number (12 digits)
    Aadhar,

    /// Passport number (one letter followed by 7 digits)
    Passport,

    /// UPI payment handle
    UpiId,

    /// Email address
    Email,

    /// IP address
    IpAddress,

    /// Device identifier
    DeviceId,

    /// Person name
    Name,

    /// Postal address
    Address,
}

impl PIIField {
    /// Every direct-PII field, in catalogue order
    pub const ALL: [PIIField; 9] = [
        PIIField::Phone,
        PIIField::Aadhar,
        PIIField::Passport,
        PIIField::UpiId,
        PIIField::Email,
        PIIField::IpAddress,
        PIIField::DeviceId,
        PIIField::Name,
        PIIField::Address,
    ];

    /// Look up the field for a record key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "phone" => Some(PIIField::Phone),
            "aadhar" => Some(PIIField::Aadhar),
            "passport" => Some(PIIField::Passport),
            "upi_id" => Some(PIIField::UpiId),
            "email" => Some(PIIField::Email),
            "ip_address" => Some(PIIField::IpAddress),
            "device_id" => Some(PIIField::DeviceId),
            "name" => Some(PIIField::Name),
            "address" => Some(PIIField::Address),
            _ => None,
        }
    }

    /// The record key this field is stored under
    pub fn key(self) -> &'static str {
        match self {
            PIIField::Phone => "phone",
            PIIField::Aadhar => "aadhar",
            PIIField::Passport => "passport",
            PIIField::UpiId => "upi_id",
            PIIField::Email => "email",
            PIIField::IpAddress => "ip_address",
            PIIField::DeviceId => "device_id",
            PIIField::Name => "name",
            PIIField::Address => "address",
        }
    }

    /// Quasi-identifiers: escalated to full redaction when enough of them
    /// appear in the same record
    pub fn is_combinatorial(self) -> bool {
        matches!(
            self,
            PIIField::Name
                | PIIField::Email
                | PIIField::Address
                | PIIField::IpAddress
                | PIIField::DeviceId
        )
    }
}

/// How the engine treats a single record key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Copied verbatim and never counted as PII
    Exempt,

    /// Masked by the field's own masker
    DirectPII(PIIField),

    /// Unknown key, copied verbatim
    PassThrough,
}

impl FieldClass {
    /// Classify a record key
    pub fn of(key: &str) -> Self {
        if is_exempt(key) {
            return FieldClass::Exempt;
        }

        match PIIField::from_key(key) {
            Some(field) => FieldClass::DirectPII(field),
            None => FieldClass::PassThrough,
        }
    }
}
