// Tool argument validation
//
// Turns the loosely typed `arguments` object of an MCP tool call into the
// typed requests the client sends upstream. Every problem is collected and
// reported together as `field: message, field: message`.

use serde_json::{Map, Value};

use crate::channels::channel_id_for_code;
use crate::checksum::{callback_payload_from_json, format_amount, CallbackPayload};
use crate::client::{
    FpxDirectDebitEnrollment, FpxDirectDebitMaintenance, PaymentIntentRequest,
    TransactionFilters,
};
use crate::error::{Error, Result};

const MAX_PER_PAGE: u64 = 100;

/// Loose email shape check: one `@`, non-empty local part, dotted domain,
/// no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

/// Malaysian mobile number as an integer, e.g. `60123456789`.
pub fn is_valid_phone(number: u64) -> bool {
    let digits = number.to_string();
    digits.starts_with("60") && (11..=12).contains(&digits.len())
}

/// Positive, finite, and at most two decimal places in natural form.
pub fn is_valid_amount(amount: f64) -> bool {
    if !amount.is_finite() || amount <= 0.0 {
        return false;
    }
    let formatted = format_amount(amount);
    let decimals = formatted.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
    decimals <= 2
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Collects field errors while reading values out of an arguments object.
struct Fields<'a> {
    args: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> Fields<'a> {
    fn new(args: &'a Value) -> Result<Self> {
        let args = args
            .as_object()
            .ok_or_else(|| Error::Validation("arguments: Expected an object".to_string()))?;
        Ok(Self {
            args,
            errors: Vec::new(),
        })
    }

    fn fail(&mut self, key: &str, message: &str) {
        self.errors.push(format!("{}: {}", key, message));
    }

    /// Present and not null.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.args.get(key).filter(|v| !v.is_null())
    }

    fn required_str(&mut self, key: &str, empty_message: &str) -> String {
        match self.get(key) {
            None => {
                self.fail(key, "Required");
                String::new()
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.fail(key, empty_message);
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.fail(key, "Expected string");
                String::new()
            }
        }
    }

    fn optional_str(&mut self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(key, "Expected string");
                None
            }
        }
    }

    fn required_email(&mut self, key: &str) -> String {
        let email = self.required_str(key, "Invalid email format");
        if !email.is_empty() && !is_valid_email(&email) {
            self.fail(key, "Invalid email format");
        }
        email
    }

    fn optional_email(&mut self, key: &str) -> Option<String> {
        let email = self.optional_str(key)?;
        if !is_valid_email(&email) {
            self.fail(key, "Invalid email format");
        }
        Some(email)
    }

    fn amount_value(&mut self, key: &str, value: &Value) -> f64 {
        match value.as_f64() {
            Some(amount) if amount <= 0.0 => {
                self.fail(key, "Amount must be positive");
                amount
            }
            Some(amount) if !is_valid_amount(amount) => {
                self.fail(key, "Amount can have maximum 2 decimal places");
                amount
            }
            Some(amount) => amount,
            None => {
                self.fail(key, "Expected number");
                0.0
            }
        }
    }

    fn required_amount(&mut self, key: &str) -> f64 {
        match self.get(key) {
            Some(value) => self.amount_value(key, value),
            None => {
                self.fail(key, "Required");
                0.0
            }
        }
    }

    fn optional_amount(&mut self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        Some(self.amount_value(key, value))
    }

    /// Channel id 1-10, given as a number, a numeric string or a channel code.
    fn optional_channel(&mut self, key: &str) -> Option<u8> {
        let value = self.get(key)?;
        let id = match value {
            Value::String(s) if s.trim().is_empty() => return None,
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => match channel_id_for_code(s) {
                    Some(id) => return Some(id),
                    None => {
                        self.fail(key, "Unknown payment channel code");
                        return None;
                    }
                },
            },
            other => as_integer(other),
        };
        match id {
            Some(n) if (1..=10).contains(&n) => Some(n as u8),
            Some(_) => {
                self.fail(key, "Payment channel must be between 1 and 10");
                None
            }
            None => {
                self.fail(key, "Payment channel must be an integer");
                None
            }
        }
    }

    fn optional_phone(&mut self, key: &str) -> Option<u64> {
        let value = self.get(key)?;
        match as_integer(value) {
            Some(n) if n > 0 && is_valid_phone(n as u64) => Some(n as u64),
            Some(n) if n <= 0 => {
                self.fail(key, "Phone number must be positive");
                None
            }
            Some(_) => {
                self.fail(key, "Invalid Malaysian phone number. Format: 60123456789");
                None
            }
            None => {
                self.fail(key, "Phone number must be an integer");
                None
            }
        }
    }

    fn optional_bool(&mut self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.fail(key, "Expected boolean");
                None
            }
        }
    }

    fn optional_positive_int(&mut self, key: &str, max: Option<u64>) -> Option<u32> {
        let value = self.get(key)?;
        match as_integer(value) {
            Some(n) if n <= 0 => {
                self.fail(key, "Number must be greater than 0");
                None
            }
            Some(n) if max.is_some_and(|m| n as u64 > m) => {
                self.fail(
                    key,
                    &format!("Number must be less than or equal to {}", max.unwrap_or_default()),
                );
                None
            }
            Some(n) => match u32::try_from(n) {
                Ok(n) => Some(n),
                Err(_) => {
                    self.fail(key, "Number is too large");
                    None
                }
            },
            None => {
                self.fail(key, "Expected integer");
                None
            }
        }
    }

    /// Status code 0-4 or a status name such as `success`.
    fn optional_status(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        match value {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.trim().to_string()),
            other => match as_integer(other) {
                Some(n) if (0..=4).contains(&n) => Some(n.to_string()),
                Some(_) => {
                    self.fail(key, "Status must be between 0 and 4");
                    None
                }
                None => {
                    self.fail(key, "Status must be an integer");
                    None
                }
            },
        }
    }

    fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors.join(", ")))
        }
    }
}

pub fn parse_create_payment_intent(args: &Value) -> Result<PaymentIntentRequest> {
    let mut f = Fields::new(args)?;
    let request = PaymentIntentRequest {
        order_number: f.required_str("order_number", "Order number is required"),
        amount: f.required_amount("amount"),
        payer_email: f.required_email("payer_email"),
        payer_name: f.required_str("payer_name", "Payer name is required"),
        description: f.required_str("description", "Description is required"),
        portal_key: f.required_str("portal_key", "Portal key is required"),
        payment_channel: f.optional_channel("payment_channel"),
        payer_telephone_number: f.optional_phone("payer_telephone_number"),
        payment_optional: f.optional_bool("payment_optional"),
        checksum: f.optional_str("checksum"),
    };
    f.finish()?;
    Ok(request)
}

pub fn parse_payment_intent_id(args: &Value) -> Result<String> {
    let mut f = Fields::new(args)?;
    let id = f.required_str("payment_intent_id", "Payment intent ID is required");
    if !id.is_empty() && !(id.starts_with("pi_") || id.starts_with("trx_")) {
        f.fail(
            "payment_intent_id",
            "Payment intent ID must start with pi_ or trx_",
        );
    }
    f.finish()?;
    Ok(id)
}

pub fn parse_transaction_id(args: &Value) -> Result<String> {
    let mut f = Fields::new(args)?;
    let id = f.required_str("transaction_id", "Transaction ID is required");
    f.finish()?;
    Ok(id)
}

pub fn parse_order_number(args: &Value) -> Result<String> {
    let mut f = Fields::new(args)?;
    let order_number = f.required_str("order_number", "Order number is required");
    f.finish()?;
    Ok(order_number)
}

pub fn parse_reference_number(args: &Value) -> Result<String> {
    let mut f = Fields::new(args)?;
    let reference = f.required_str("reference_number", "Reference number is required");
    f.finish()?;
    Ok(reference)
}

pub fn parse_transaction_filters(args: &Value) -> Result<TransactionFilters> {
    let mut f = Fields::new(args)?;
    let filters = TransactionFilters {
        status: f.optional_status("status"),
        payment_channel: f.optional_channel("payment_channel"),
        payer_email: f.optional_email("payer_email"),
        order_number: f.optional_str("order_number"),
        exchange_reference_number: f.optional_str("reference_number"),
        page: f.optional_positive_int("page", None),
        per_page: f.optional_positive_int("per_page", Some(MAX_PER_PAGE)),
    };
    f.finish()?;
    Ok(filters)
}

pub fn parse_portal_key(args: &Value) -> Result<Option<String>> {
    let mut f = Fields::new(args)?;
    let portal_key = f.optional_str("portal_key");
    f.finish()?;
    Ok(portal_key)
}

/// `callback_data` object plus the `checksum` that arrived with it.
pub fn parse_callback(args: &Value) -> Result<(CallbackPayload, String)> {
    let mut f = Fields::new(args)?;
    let checksum = f.required_str("checksum", "Checksum is required");
    let payload = match f.get("callback_data") {
        Some(Value::Object(fields)) => match callback_payload_from_json(fields) {
            Ok(payload) => payload,
            Err(e) => {
                f.fail("callback_data", &e.to_string());
                CallbackPayload::new()
            }
        },
        Some(_) => {
            f.fail("callback_data", "Expected object");
            CallbackPayload::new()
        }
        None => {
            f.fail("callback_data", "Required");
            CallbackPayload::new()
        }
    };
    f.finish()?;
    Ok((payload, checksum))
}

pub fn parse_fpx_enrollment(args: &Value) -> Result<FpxDirectDebitEnrollment> {
    let mut f = Fields::new(args)?;
    let enrollment = FpxDirectDebitEnrollment {
        order_number: f.required_str("order_number", "Order number is required"),
        payer_email: f.required_email("payer_email"),
        payer_name: f.required_str("payer_name", "Payer name is required"),
        bank_code: f.required_str("bank_code", "Bank code is required"),
        frequency: f.required_str("frequency", "Frequency is required"),
        max_amount: f.required_amount("max_amount"),
    };
    f.finish()?;
    Ok(enrollment)
}

pub fn parse_mandate_id(args: &Value) -> Result<String> {
    let mut f = Fields::new(args)?;
    let id = f.required_str("mandate_id", "Mandate ID is required");
    f.finish()?;
    Ok(id)
}

pub fn parse_fpx_maintenance(args: &Value) -> Result<(String, FpxDirectDebitMaintenance)> {
    let mut f = Fields::new(args)?;
    let mandate_id = f.required_str("mandate_id", "Mandate ID is required");
    let update = FpxDirectDebitMaintenance {
        payer_email: f.optional_email("payer_email"),
        payer_name: f.optional_str("payer_name"),
        frequency: f.optional_str("frequency"),
        max_amount: f.optional_amount("max_amount"),
    };
    if update.is_empty() {
        f.fail(
            "arguments",
            "At least one of payer_email, payer_name, frequency or max_amount is required",
        );
    }
    f.finish()?;
    Ok((mandate_id, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intent_args() -> Value {
        json!({
            "order_number": "ORD-001",
            "amount": 100.5,
            "payer_email": "test@example.com",
            "payer_name": "Ali",
            "description": "Order 1",
            "portal_key": "portal-123"
        })
    }

    fn validation_message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(Error::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.my"));
        assert!(!is_valid_email("test@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("te st@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("a@.example.com"));
    }

    #[test]
    fn test_phone_and_amount_rules() {
        assert!(is_valid_phone(60123456789));
        assert!(is_valid_phone(601234567890));
        assert!(!is_valid_phone(6012345678));
        assert!(!is_valid_phone(12345678901));

        assert!(is_valid_amount(100.5));
        assert!(is_valid_amount(100.55));
        assert!(is_valid_amount(1.0));
        assert!(!is_valid_amount(100.555));
        assert!(!is_valid_amount(0.0));
        assert!(!is_valid_amount(-5.0));
        assert!(!is_valid_amount(f64::NAN));
    }

    #[test]
    fn test_parse_payment_intent_minimal() {
        let request = parse_create_payment_intent(&intent_args()).unwrap();
        assert_eq!(request.order_number, "ORD-001");
        assert_eq!(request.amount, 100.5);
        assert_eq!(request.payment_channel, None);
        assert_eq!(request.checksum, None);
    }

    #[test]
    fn test_parse_payment_intent_channel_code_and_phone() {
        let mut args = intent_args();
        args["payment_channel"] = json!("duitnow");
        args["payer_telephone_number"] = json!(60123456789u64);
        args["payment_optional"] = json!(true);
        args["checksum"] = json!("precomputed");
        let request = parse_create_payment_intent(&args).unwrap();
        assert_eq!(request.payment_channel, Some(2));
        assert_eq!(request.payer_telephone_number, Some(60123456789));
        assert_eq!(request.payment_optional, Some(true));
        assert_eq!(request.checksum.as_deref(), Some("precomputed"));
    }

    #[test]
    fn test_parse_payment_intent_reports_every_problem() {
        let args = json!({
            "order_number": "",
            "amount": 10.123,
            "payer_email": "nope",
            "payer_name": "Ali",
            "description": "d",
            "payment_channel": 11
        });
        let message = validation_message(parse_create_payment_intent(&args));
        assert_eq!(
            message,
            "order_number: Order number is required, \
             amount: Amount can have maximum 2 decimal places, \
             payer_email: Invalid email format, \
             portal_key: Required, \
             payment_channel: Payment channel must be between 1 and 10"
        );
    }

    #[test]
    fn test_parse_payment_intent_rejects_non_object() {
        let message = validation_message(parse_create_payment_intent(&json!([1, 2])));
        assert!(message.starts_with("arguments:"));
    }

    #[test]
    fn test_payment_intent_id_prefix() {
        assert_eq!(
            parse_payment_intent_id(&json!({"payment_intent_id": "pi_pGwAaq"})).unwrap(),
            "pi_pGwAaq"
        );
        assert!(parse_payment_intent_id(&json!({"payment_intent_id": "trx_z88ymJ"})).is_ok());
        let message =
            validation_message(parse_payment_intent_id(&json!({"payment_intent_id": "ORD-1"})));
        assert!(message.contains("must start with pi_ or trx_"));
    }

    #[test]
    fn test_transaction_filters() {
        let filters = parse_transaction_filters(&json!({
            "status": 3,
            "payment_channel": "fpx",
            "reference_number": "REF-9",
            "page": 2,
            "per_page": 50
        }))
        .unwrap();
        assert_eq!(filters.status.as_deref(), Some("3"));
        assert_eq!(filters.payment_channel, Some(1));
        assert_eq!(filters.exchange_reference_number.as_deref(), Some("REF-9"));
        assert_eq!(filters.page, Some(2));
        assert_eq!(filters.per_page, Some(50));

        let named = parse_transaction_filters(&json!({"status": "success"})).unwrap();
        assert_eq!(named.status.as_deref(), Some("success"));

        let empty = parse_transaction_filters(&json!({})).unwrap();
        assert_eq!(empty, TransactionFilters::default());
    }

    #[test]
    fn test_transaction_filter_bounds() {
        let message = validation_message(parse_transaction_filters(&json!({
            "status": 7,
            "page": 0,
            "per_page": 101,
            "payer_email": "bad"
        })));
        assert_eq!(
            message,
            "status: Status must be between 0 and 4, \
             payer_email: Invalid email format, \
             page: Number must be greater than 0, \
             per_page: Number must be less than or equal to 100"
        );
    }

    #[test]
    fn test_parse_callback() {
        let (payload, checksum) = parse_callback(&json!({
            "callback_data": {"status": "success", "order_number": "ORD-001"},
            "checksum": "abc"
        }))
        .unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(checksum, "abc");

        let message = validation_message(parse_callback(&json!({
            "callback_data": {"items": [1, 2]},
            "checksum": "abc"
        })));
        assert!(message.starts_with("callback_data:"));

        let message = validation_message(parse_callback(&json!({})));
        assert_eq!(message, "checksum: Required, callback_data: Required");
    }

    #[test]
    fn test_parse_fpx_enrollment() {
        let enrollment = parse_fpx_enrollment(&json!({
            "order_number": "DD-1",
            "payer_email": "payer@example.com",
            "payer_name": "Siti",
            "bank_code": "MB2U0227",
            "frequency": "monthly",
            "max_amount": 500
        }))
        .unwrap();
        assert_eq!(enrollment.max_amount, 500.0);
        assert_eq!(enrollment.bank_code, "MB2U0227");

        let message = validation_message(parse_fpx_enrollment(&json!({"order_number": "DD-1"})));
        assert!(message.contains("bank_code: Required"));
        assert!(message.contains("max_amount: Required"));
    }

    #[test]
    fn test_parse_fpx_maintenance_needs_a_change() {
        let (id, update) = parse_fpx_maintenance(&json!({
            "mandate_id": "mdt_1",
            "max_amount": 750.25
        }))
        .unwrap();
        assert_eq!(id, "mdt_1");
        assert_eq!(update.max_amount, Some(750.25));

        let message = validation_message(parse_fpx_maintenance(&json!({"mandate_id": "mdt_1"})));
        assert!(message.starts_with("arguments: At least one of"));
    }
}
