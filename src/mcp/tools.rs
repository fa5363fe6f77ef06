// MCP tool and resource catalog
//
// Static descriptions served by `tools/list` and `resources/list`.

use serde_json::{json, Value};

pub const RESOURCE_PORTALS: &str = "bayarcash://portals";
pub const RESOURCE_CHANNELS: &str = "bayarcash://channels";
pub const RESOURCE_FPX_BANKS: &str = "bayarcash://fpx-banks";

/// Names accepted by `tools/call`.
pub const TOOL_NAMES: [&str; 13] = [
    "create_payment_intent",
    "get_payment_intent",
    "get_transaction",
    "get_transaction_by_order",
    "get_transaction_by_reference",
    "list_transactions",
    "get_portals",
    "get_payment_channels",
    "get_fpx_banks",
    "verify_callback",
    "create_fpx_direct_debit_enrollment",
    "update_fpx_direct_debit_mandate",
    "terminate_fpx_direct_debit_mandate",
];

fn tool(name: &str, description: &str, input_schema: Value) -> Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": input_schema
    })
}

pub fn tool_definitions() -> Value {
    Value::Array(vec![
        tool(
            "create_payment_intent",
            "Create a new payment intent for processing payments through Bayarcash. The request checksum is computed automatically unless one is supplied.",
            json!({
                "type": "object",
                "properties": {
                    "order_number": {"type": "string", "description": "Unique order number for this payment"},
                    "amount": {"type": "number", "description": "Payment amount in MYR (e.g., 100.50)"},
                    "payer_email": {"type": "string", "description": "Email address of the payer"},
                    "payer_name": {"type": "string", "description": "Name of the payer"},
                    "description": {"type": "string", "description": "Description of the payment"},
                    "portal_key": {"type": "string", "description": "Portal key for the payment gateway"},
                    "payment_channel": {"type": ["integer", "string"], "description": "Payment channel id 1-10 or code (e.g., fpx, duitnow, boost, grabpay). HIGHLY RECOMMENDED. If not provided, ask the user to choose using get_payment_channels."},
                    "payer_telephone_number": {"type": "integer", "description": "Malaysian phone number, e.g. 60123456789"},
                    "payment_optional": {"type": "boolean", "description": "Whether payment is optional"},
                    "checksum": {"type": "string", "description": "Precomputed checksum; computed from order_number, amount and payer_email when omitted"}
                },
                "required": ["order_number", "amount", "payer_email", "payer_name", "description", "portal_key"]
            }),
        ),
        tool(
            "get_payment_intent",
            "Get payment intent details by payment intent ID (returned when the intent was created, e.g. pi_pGwAaq or trx_z88ymJ)",
            json!({
                "type": "object",
                "properties": {
                    "payment_intent_id": {"type": "string", "description": "Payment intent ID starting with pi_ or trx_"}
                },
                "required": ["payment_intent_id"]
            }),
        ),
        tool(
            "get_transaction",
            "Get transaction details by transaction ID",
            json!({
                "type": "object",
                "properties": {
                    "transaction_id": {"type": "string", "description": "Transaction ID to retrieve"}
                },
                "required": ["transaction_id"]
            }),
        ),
        tool(
            "get_transaction_by_order",
            "Get transaction details by order number",
            json!({
                "type": "object",
                "properties": {
                    "order_number": {"type": "string", "description": "Order number to retrieve"}
                },
                "required": ["order_number"]
            }),
        ),
        tool(
            "get_transaction_by_reference",
            "Get transaction details by exchange reference number",
            json!({
                "type": "object",
                "properties": {
                    "reference_number": {"type": "string", "description": "Exchange reference number to retrieve"}
                },
                "required": ["reference_number"]
            }),
        ),
        tool(
            "list_transactions",
            "List transactions with optional filters and pagination",
            json!({
                "type": "object",
                "properties": {
                    "status": {"type": ["integer", "string"], "description": "Filter by status code 0-4 or status name (e.g., success, pending, failed)"},
                    "payment_channel": {"type": ["integer", "string"], "description": "Filter by payment channel id or code"},
                    "payer_email": {"type": "string", "description": "Filter by payer email"},
                    "order_number": {"type": "string", "description": "Filter by order number"},
                    "reference_number": {"type": "string", "description": "Filter by exchange reference number"},
                    "page": {"type": "integer", "description": "Page number for pagination"},
                    "per_page": {"type": "integer", "description": "Number of items per page (max 100)"}
                }
            }),
        ),
        tool(
            "get_portals",
            "Get list of available payment portals",
            json!({"type": "object", "properties": {}}),
        ),
        tool(
            "get_payment_channels",
            "Get list of available payment channels",
            json!({
                "type": "object",
                "properties": {
                    "portal_key": {"type": "string", "description": "Optional portal key"}
                }
            }),
        ),
        tool(
            "get_fpx_banks",
            "Get list of FPX banks for online banking payments",
            json!({"type": "object", "properties": {}}),
        ),
        tool(
            "verify_callback",
            "Verify callback data from a Bayarcash webhook against its checksum",
            json!({
                "type": "object",
                "properties": {
                    "callback_data": {"type": "object", "description": "Callback fields received from Bayarcash, without the checksum field"},
                    "checksum": {"type": "string", "description": "Checksum received with the callback"}
                },
                "required": ["callback_data", "checksum"]
            }),
        ),
        tool(
            "create_fpx_direct_debit_enrollment",
            "Create FPX Direct Debit enrollment intent",
            json!({
                "type": "object",
                "properties": {
                    "order_number": {"type": "string", "description": "Unique order number"},
                    "payer_email": {"type": "string", "description": "Payer email address"},
                    "payer_name": {"type": "string", "description": "Payer name"},
                    "bank_code": {"type": "string", "description": "FPX bank code"},
                    "frequency": {"type": "string", "description": "Payment frequency (e.g., monthly, weekly)"},
                    "max_amount": {"type": "number", "description": "Maximum amount per transaction"}
                },
                "required": ["order_number", "payer_email", "payer_name", "bank_code", "frequency", "max_amount"]
            }),
        ),
        tool(
            "update_fpx_direct_debit_mandate",
            "Update an existing FPX Direct Debit mandate",
            json!({
                "type": "object",
                "properties": {
                    "mandate_id": {"type": "string", "description": "Mandate ID returned at enrollment"},
                    "payer_email": {"type": "string", "description": "New payer email address"},
                    "payer_name": {"type": "string", "description": "New payer name"},
                    "frequency": {"type": "string", "description": "New payment frequency"},
                    "max_amount": {"type": "number", "description": "New maximum amount per transaction"}
                },
                "required": ["mandate_id"]
            }),
        ),
        tool(
            "terminate_fpx_direct_debit_mandate",
            "Terminate an FPX Direct Debit mandate",
            json!({
                "type": "object",
                "properties": {
                    "mandate_id": {"type": "string", "description": "Mandate ID to terminate"}
                },
                "required": ["mandate_id"]
            }),
        ),
    ])
}

pub fn resource_definitions() -> Value {
    json!([
        {
            "uri": RESOURCE_PORTALS,
            "mimeType": "application/json",
            "name": "Available Payment Portals",
            "description": "List of all available payment portals and their configurations"
        },
        {
            "uri": RESOURCE_CHANNELS,
            "mimeType": "application/json",
            "name": "Payment Channels",
            "description": "List of all available payment channels across all portals"
        },
        {
            "uri": RESOURCE_FPX_BANKS,
            "mimeType": "application/json",
            "name": "FPX Banks",
            "description": "List of FPX banks available for online banking payments"
        }
    ])
}
