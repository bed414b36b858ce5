//! Payment step form. Input is reformatted as the traveller types; nothing
//! beyond presence is validated.

use serde::{Deserialize, Serialize};

use ceylon_booking::PaymentDetails;
use ceylon_shared::Masked;

const CARD_DIGITS: usize = 16;
const EXPIRY_DIGITS: usize = 4;
const CVV_DIGITS: usize = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub cardholder_name: String,
    card_number: Masked<String>,
    expiry: Masked<String>,
    cvv: Masked<String>,
}

impl PaymentForm {
    pub fn card_number(&self) -> &str {
        self.card_number.expose()
    }

    pub fn expiry(&self) -> &str {
        self.expiry.expose()
    }

    pub fn cvv(&self) -> &str {
        self.cvv.expose()
    }

    pub fn set_card_number(&mut self, input: &str) {
        self.card_number = Masked(format_card_number(input));
    }

    pub fn set_expiry(&mut self, input: &str) {
        self.expiry = Masked(format_expiry(input));
    }

    pub fn set_cvv(&mut self, input: &str) {
        self.cvv = Masked(digits(input, CVV_DIGITS));
    }

    /// Every contact and card field is filled in.
    pub fn is_complete(&self) -> bool {
        [
            self.customer_name.as_str(),
            self.customer_email.as_str(),
            self.customer_phone.as_str(),
            self.cardholder_name.as_str(),
            self.card_number(),
            self.expiry(),
            self.cvv(),
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    pub fn details(&self) -> PaymentDetails {
        PaymentDetails {
            cardholder_name: self.cardholder_name.trim().to_string(),
            card_number: self.card_number.clone(),
            expiry: self.expiry.clone(),
            cvv: self.cvv.clone(),
        }
    }
}

fn digits(input: &str, max: usize) -> String {
    input.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// `4111111111111111` becomes `4111 1111 1111 1111`.
pub fn format_card_number(input: &str) -> String {
    let digits = digits(input, CARD_DIGITS);
    let mut out = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// `1228` becomes `12/28`; partial input keeps what was typed.
pub fn format_expiry(input: &str) -> String {
    let digits = digits(input, EXPIRY_DIGITS);
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}
