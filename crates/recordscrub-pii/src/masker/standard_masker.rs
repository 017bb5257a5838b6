//! Standard masker implementation

use crate::error::Result;
use crate::field::PIIField;
use crate::masker::{FieldMasker, MaskerConfig, value_text};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// Digits kept visible at each end of a phone number
const PHONE_KEEP_START: usize = 2;
const PHONE_KEEP_END: usize = 2;

/// Aadhaar numbers are always 12 digits; the middle 4 are hidden
const AADHAR_DIGITS: usize = 12;
const AADHAR_KEEP: usize = 4;

/// Standard implementation of the per-field masking table
pub struct StandardMasker {
    config: MaskerConfig,
    passport_regex: Arc<Regex>,
    masked_phone_regex: Arc<Regex>,
    masked_aadhar_regex: Arc<Regex>,
    masked_passport_regex: Arc<Regex>,
}

impl StandardMasker {
    /// Create a new masker with the given configuration
    pub fn new(config: MaskerConfig) -> Result<Self> {
        config.validate()?;

        let passport_regex = Arc::new(Regex::new(r"^[A-Z][0-9]{7}$")?);

        // Shapes produced by the maskers themselves, so a second pass
        // leaves them alone instead of degrading them to the token
        let m = regex::escape(&config.mask_char.to_string());
        let masked_phone_regex = Arc::new(Regex::new(&format!(
            r"^(?:[0-9]{{{PHONE_KEEP_START}}}(?:{m})+[0-9]{{{PHONE_KEEP_END}}}|(?:{m}){{1,4}})$"
        ))?);
        let masked_aadhar_regex = Arc::new(Regex::new(&format!(
            r"^[0-9]{{{AADHAR_KEEP}}}(?:{m}){{4}}[0-9]{{{AADHAR_KEEP}}}$"
        ))?);
        let masked_passport_regex = Arc::new(Regex::new(&format!(r"^[A-Z](?:{m}){{7}}$"))?);

        Ok(Self {
            config,
            passport_regex,
            masked_phone_regex,
            masked_aadhar_regex,
            masked_passport_regex,
        })
    }

    /// Get the masker configuration
    pub fn config(&self) -> &MaskerConfig {
        &self.config
    }

    fn token(&self) -> String {
        self.config.redaction_token.clone()
    }

    fn mask_run(&self, len: usize) -> String {
        std::iter::repeat_n(self.config.mask_char, len).collect()
    }

    /// Keep the first and last two digits; separators are dropped
    fn mask_phone(&self, text: &str) -> String {
        if self.masked_phone_regex.is_match(text) {
            return text.to_string();
        }

        let digits = digits_of(text);
        if digits.is_empty() {
            return self.token();
        }

        let keep = PHONE_KEEP_START + PHONE_KEEP_END;
        if digits.len() <= keep {
            return self.mask_run(digits.len());
        }

        let hidden = digits.len() - keep;
        format!(
            "{}{}{}",
            &digits[..PHONE_KEEP_START],
            self.mask_run(hidden),
            &digits[digits.len() - PHONE_KEEP_END..]
        )
    }

    /// Keep the first and last four of exactly twelve digits
    fn mask_aadhar(&self, text: &str) -> String {
        if self.masked_aadhar_regex.is_match(text) {
            return text.to_string();
        }

        let digits = digits_of(text);
        if digits.len() != AADHAR_DIGITS {
            return self.token();
        }

        format!(
            "{}{}{}",
            &digits[..AADHAR_KEEP],
            self.mask_run(AADHAR_DIGITS - 2 * AADHAR_KEEP),
            &digits[AADHAR_DIGITS - AADHAR_KEEP..]
        )
    }

    /// Keep the leading letter of a well-formed passport number
    fn mask_passport(&self, text: &str) -> String {
        if self.masked_passport_regex.is_match(text) {
            return text.to_string();
        }

        if !self.passport_regex.is_match(text) {
            return self.token();
        }

        // Pattern guarantees a leading ASCII letter
        match text.chars().next() {
            Some(letter) => format!("{}{}", letter, self.mask_run(7)),
            None => self.token(),
        }
    }

    /// Mask the local part, leaving the domain readable
    fn mask_email(&self, text: &str) -> String {
        let Some((local, domain)) = text.split_once('@') else {
            return self.token();
        };

        let mut chars = local.chars();
        let Some(first) = chars.next() else {
            return self.token();
        };

        let len = local.chars().count();
        let masked_local = if len <= 2 {
            format!("{}{}", first, self.mask_run(len - 1))
        } else {
            let last = chars.next_back().unwrap_or(first);
            format!("{}{}{}", first, self.mask_run(len - 2), last)
        };

        format!("{}@{}", masked_local, domain)
    }
}

/// ASCII digits of a string, in order
fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

impl FieldMasker for StandardMasker {
    fn mask(&self, field: PIIField, value: &Value) -> String {
        let text = value_text(value);
        if text == self.config.redaction_token {
            return self.token();
        }

        match field {
            PIIField::Phone => self.mask_phone(&text),
            PIIField::Aadhar => self.mask_aadhar(&text),
            PIIField::Passport => self.mask_passport(&text),
            PIIField::Email => self.mask_email(&text),
            // UPI handles never survive, well-formed or not
            PIIField::UpiId
            | PIIField::IpAddress
            | PIIField::DeviceId
            | PIIField::Name
            | PIIField::Address => self.token(),
        }
    }

    fn full_redaction(&self) -> String {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masker::REDACTION_TOKEN;
    use serde_json::json;

    fn masker() -> StandardMasker {
        StandardMasker::new(MaskerConfig::default()).unwrap()
    }

    fn mask(field: PIIField, value: &str) -> String {
        masker().mask(field, &json!(value))
    }

    #[test]
    fn test_phone_keeps_two_each_end() {
        assert_eq!(mask(PIIField::Phone, "9876543210"), "98XXXXXX10");
    }

    #[test]
    fn test_phone_strips_separators() {
        assert_eq!(mask(PIIField::Phone, "+91 98765-43210"), "91XXXXXXXX10");
        assert_eq!(mask(PIIField::Phone, "(98) 7654"), "98XX54");
    }

    #[test]
    fn test_phone_short_is_fully_masked() {
        assert_eq!(mask(PIIField::Phone, "1234"), "XXXX");
        assert_eq!(mask(PIIField::Phone, "ext 7"), "X");
    }

    #[test]
    fn test_phone_without_digits() {
        assert_eq!(mask(PIIField::Phone, "call me"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Phone, ""), REDACTION_TOKEN);
    }

    #[test]
    fn test_phone_numeric_value() {
        let masked = masker().mask(PIIField::Phone, &json!(9876543210u64));
        assert_eq!(masked, "98XXXXXX10");
    }

    #[test]
    fn test_aadhar_masks_middle_four() {
        assert_eq!(mask(PIIField::Aadhar, "123456789012"), "1234XXXX9012");
        assert_eq!(mask(PIIField::Aadhar, "1234 5678 9012"), "1234XXXX9012");
        assert_eq!(mask(PIIField::Aadhar, "1234-5678-9012"), "1234XXXX9012");
    }

    #[test]
    fn test_aadhar_wrong_length() {
        assert_eq!(mask(PIIField::Aadhar, "12345678901"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Aadhar, "1234567890123"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Aadhar, "unknown"), REDACTION_TOKEN);
    }

    #[test]
    fn test_passport() {
        assert_eq!(mask(PIIField::Passport, "A1234567"), "AXXXXXXX");
        assert_eq!(mask(PIIField::Passport, "a1234567"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Passport, "A123456"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Passport, " A1234567"), REDACTION_TOKEN);
    }

    #[test]
    fn test_upi_never_survives() {
        assert_eq!(mask(PIIField::UpiId, "user@upi"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::UpiId, "no-separator"), REDACTION_TOKEN);
    }

    #[test]
    fn test_email() {
        assert_eq!(mask(PIIField::Email, "john.doe@example.com"), "jXXXXXXe@example.com");
        assert_eq!(mask(PIIField::Email, "abc@x.com"), "aXc@x.com");
        assert_eq!(mask(PIIField::Email, "ab@x.com"), "aX@x.com");
        assert_eq!(mask(PIIField::Email, "a@x.com"), "a@x.com");
    }

    #[test]
    fn test_email_splits_on_first_at() {
        assert_eq!(mask(PIIField::Email, "abcd@x@y"), "aXXd@x@y");
    }

    #[test]
    fn test_email_malformed() {
        assert_eq!(mask(PIIField::Email, "not-an-email"), REDACTION_TOKEN);
        assert_eq!(mask(PIIField::Email, "@example.com"), REDACTION_TOKEN);
    }

    #[test]
    fn test_email_multibyte_local_part() {
        assert_eq!(mask(PIIField::Email, "ñandú@example.com"), "ñXXXú@example.com");
    }

    #[test]
    fn test_full_redaction_fields() {
        for field in [
            PIIField::IpAddress,
            PIIField::DeviceId,
            PIIField::Name,
            PIIField::Address,
        ] {
            assert_eq!(mask(field, "anything"), REDACTION_TOKEN);
        }
    }

    #[test]
    fn test_non_string_values_are_total() {
        let m = masker();
        for field in PIIField::ALL {
            for value in [json!(null), json!(true), json!([1, 2]), json!({"k": "v"})] {
                assert!(!m.mask(field, &value).is_empty());
            }
        }
        assert_eq!(m.mask(PIIField::Aadhar, &json!({"k": "v"})), REDACTION_TOKEN);
    }

    #[test]
    fn test_masking_is_idempotent() {
        let m = masker();
        let samples = [
            (PIIField::Phone, "9876543210"),
            (PIIField::Phone, "12"),
            (PIIField::Aadhar, "1234 5678 9012"),
            (PIIField::Passport, "K7654321"),
            (PIIField::Email, "asha@example.in"),
            (PIIField::Email, "ab@x.com"),
            (PIIField::UpiId, "asha@okbank"),
            (PIIField::Name, "Asha"),
        ];

        for (field, value) in samples {
            let once = m.mask(field, &json!(value));
            let twice = m.mask(field, &json!(once.clone()));
            assert_eq!(once, twice, "{:?} changed on second pass", field);
        }
    }

    #[test]
    fn test_custom_mask_char_and_token() {
        let m = StandardMasker::new(MaskerConfig {
            mask_char: '*',
            redaction_token: "<PII>".to_string(),
        })
        .unwrap();

        assert_eq!(m.mask(PIIField::Phone, &json!("9876543210")), "98******10");
        assert_eq!(m.mask(PIIField::Passport, &json!("A1234567")), "A*******");
        assert_eq!(m.mask(PIIField::Name, &json!("Asha")), "<PII>");
        assert_eq!(m.mask(PIIField::Phone, &json!("98******10")), "98******10");
        assert_eq!(m.full_redaction(), "<PII>");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = StandardMasker::new(MaskerConfig {
            mask_char: '0',
            ..MaskerConfig::default()
        });

        assert!(result.is_err());
    }
}
