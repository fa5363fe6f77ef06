// Checksum signing for Bayarcash requests and callbacks
//
// Outbound payment intents are signed over `order_number|amount|payer_email`
// in that fixed order. Inbound callbacks are verified over their fields
// sorted by key and joined as `key=value|key=value`. The two canonical forms
// share only the HMAC-SHA256 primitive and the secret key.
//
// Field values are not escaped: an order number or email containing `|`
// produces an ambiguous canonical string. Upstream expects the raw join.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Number, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised by checksum computation.
///
/// A checksum that simply does not match is not an error; see
/// [`ChecksumSigner::verify_callback`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("API secret key is not configured")]
    MissingSecretKey,

    #[error("callback field `{0}` must be a string, number or boolean")]
    UnsupportedValue(String),
}

/// A scalar value carried by an inbound callback.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackValue {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl fmt::Display for CallbackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackValue::Text(s) => f.write_str(s),
            CallbackValue::Bool(b) => write!(f, "{}", b),
            CallbackValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{}", i)
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{}", u)
                } else {
                    match n.as_f64() {
                        Some(x) => f.write_str(&format_amount(x)),
                        None => write!(f, "{}", n),
                    }
                }
            }
        }
    }
}

impl From<&str> for CallbackValue {
    fn from(value: &str) -> Self {
        CallbackValue::Text(value.to_string())
    }
}

impl From<String> for CallbackValue {
    fn from(value: String) -> Self {
        CallbackValue::Text(value)
    }
}

impl From<bool> for CallbackValue {
    fn from(value: bool) -> Self {
        CallbackValue::Bool(value)
    }
}

impl From<i64> for CallbackValue {
    fn from(value: i64) -> Self {
        CallbackValue::Number(Number::from(value))
    }
}

/// Callback fields keyed by name. `BTreeMap` keeps keys in byte order,
/// which is the order the verifier joins them in.
pub type CallbackPayload = BTreeMap<String, CallbackValue>;

/// Convert a JSON object received from a webhook into a [`CallbackPayload`].
///
/// Nulls, arrays and nested objects are rejected.
pub fn callback_payload_from_json(
    fields: &Map<String, Value>,
) -> Result<CallbackPayload, ChecksumError> {
    fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => CallbackValue::Text(s.clone()),
                Value::Number(n) => CallbackValue::Number(n.clone()),
                Value::Bool(b) => CallbackValue::Bool(*b),
                _ => return Err(ChecksumError::UnsupportedValue(key.clone())),
            };
            Ok((key.clone(), value))
        })
        .collect()
}

/// Natural decimal form of an amount: `100.5` stays `100.5`, `250.0`
/// becomes `250`. No fixed-point padding.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// Canonical string for an outbound payment intent. Positional, not sorted.
pub fn payment_intent_canonical(order_number: &str, amount: f64, payer_email: &str) -> String {
    format!("{}|{}|{}", order_number, format_amount(amount), payer_email)
}

/// Canonical string for an inbound callback: sorted `key=value` pairs.
pub fn callback_canonical(payload: &CallbackPayload) -> String {
    payload
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("|")
}

fn hmac_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

fn require_key(secret_key: &str) -> Result<&[u8], ChecksumError> {
    if secret_key.is_empty() {
        return Err(ChecksumError::MissingSecretKey);
    }
    Ok(secret_key.as_bytes())
}

/// Sign a payment intent. Returns 64 lowercase hex characters.
pub fn sign(
    order_number: &str,
    amount: f64,
    payer_email: &str,
    secret_key: &str,
) -> Result<String, ChecksumError> {
    let key = require_key(secret_key)?;
    let canonical = payment_intent_canonical(order_number, amount, payer_email);
    Ok(hmac_hex(key, canonical.as_bytes()))
}

/// Verify a callback checksum.
///
/// The payload must not contain the checksum itself; a `checksum` field left
/// in the map is signed like any other field and the result will not match.
/// Comparison is constant-time and case-sensitive.
pub fn verify(
    payload: &CallbackPayload,
    received_checksum: &str,
    secret_key: &str,
) -> Result<bool, ChecksumError> {
    let key = require_key(secret_key)?;
    let expected = hmac_hex(key, callback_canonical(payload).as_bytes());
    Ok(constant_time_compare(
        expected.as_bytes(),
        received_checksum.as_bytes(),
    ))
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Holds the API secret key and signs or verifies on its behalf.
pub struct ChecksumSigner {
    secret_key: SecretString,
}

impl ChecksumSigner {
    pub fn new(secret_key: SecretString) -> Self {
        Self { secret_key }
    }

    pub fn sign_payment_intent(
        &self,
        order_number: &str,
        amount: f64,
        payer_email: &str,
    ) -> Result<String, ChecksumError> {
        sign(
            order_number,
            amount,
            payer_email,
            self.secret_key.expose_secret(),
        )
    }

    /// `Ok(false)` on mismatch; `Err` only when no secret key is configured.
    pub fn verify_callback(
        &self,
        payload: &CallbackPayload,
        received_checksum: &str,
    ) -> Result<bool, ChecksumError> {
        verify(payload, received_checksum, self.secret_key.expose_secret())
    }
}

impl fmt::Debug for ChecksumSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumSigner")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
