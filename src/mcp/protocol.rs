// MCP Protocol Implementation
//
// JSON-RPC 2.0 message helpers and the handlers behind each MCP method.
// Tool calls are validated, forwarded to the Bayarcash client, and the
// upstream JSON is relayed as pretty-printed text content.

use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::checksum::ChecksumError;
use crate::client::BayarcashClient;
use crate::error::Error;
use crate::mcp::tools::{
    resource_definitions, tool_definitions, RESOURCE_CHANNELS, RESOURCE_FPX_BANKS,
    RESOURCE_PORTALS, TOOL_NAMES,
};
use crate::validation;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "bayarcash-mcp-server";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

pub fn success_response(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn error_response(id: &Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into()
        }
    })
}

/// Handle MCP initialization request
pub fn handle_initialize(request: &Value) -> Value {
    success_response(
        &request["id"],
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "Bayarcash payment gateway: create payment intents, look up transactions, list portals, channels and FPX banks, verify webhook callbacks and manage FPX Direct Debit mandates."
        }),
    )
}

pub fn handle_tools_list(request: &Value) -> Value {
    success_response(&request["id"], json!({ "tools": tool_definitions() }))
}

pub fn handle_resources_list(request: &Value) -> Value {
    success_response(&request["id"], json!({ "resources": resource_definitions() }))
}

fn text_content(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Run one tool against the client and return the JSON it produced.
async fn call_tool(client: &BayarcashClient, name: &str, args: &Value) -> Result<Value, Error> {
    match name {
        "create_payment_intent" => {
            let request = validation::parse_create_payment_intent(args)?;
            client.create_payment_intent(request).await
        }
        "get_payment_intent" => {
            let id = validation::parse_payment_intent_id(args)?;
            client.get_payment_intent(&id).await
        }
        "get_transaction" => {
            let id = validation::parse_transaction_id(args)?;
            client.get_transaction(&id).await
        }
        "get_transaction_by_order" => {
            let order_number = validation::parse_order_number(args)?;
            client.get_transaction_by_order_number(&order_number).await
        }
        "get_transaction_by_reference" => {
            let reference = validation::parse_reference_number(args)?;
            client.get_transaction_by_reference_number(&reference).await
        }
        "list_transactions" => {
            let filters = validation::parse_transaction_filters(args)?;
            client.list_transactions(&filters).await
        }
        "get_portals" => client.get_portals().await,
        "get_payment_channels" => {
            let portal_key = validation::parse_portal_key(args)?;
            Ok(serde_json::to_value(client.get_channels(portal_key.as_deref()))?)
        }
        "get_fpx_banks" => client.get_fpx_banks().await,
        "verify_callback" => {
            let (payload, checksum) = validation::parse_callback(args)?;
            let valid = client.verify_callback(&payload, &checksum)?;
            Ok(json!({ "valid": valid }))
        }
        "create_fpx_direct_debit_enrollment" => {
            let enrollment = validation::parse_fpx_enrollment(args)?;
            client.create_fpx_direct_debit_enrollment(&enrollment).await
        }
        "update_fpx_direct_debit_mandate" => {
            let (mandate_id, update) = validation::parse_fpx_maintenance(args)?;
            client.update_fpx_direct_debit_mandate(&mandate_id, &update).await
        }
        "terminate_fpx_direct_debit_mandate" => {
            let mandate_id = validation::parse_mandate_id(args)?;
            client.terminate_fpx_direct_debit_mandate(&mandate_id).await
        }
        other => Err(Error::Validation(format!("Unknown tool: {}", other))),
    }
}

/// Handle MCP tools/call request
pub async fn handle_tools_call(client: &BayarcashClient, request: &Value) -> Value {
    let id = &request["id"];
    let params = &request["params"];
    let tool_name = params["name"].as_str().unwrap_or("");

    if !TOOL_NAMES.contains(&tool_name) {
        warn!("Unknown tool requested: {}", tool_name);
        return error_response(id, METHOD_NOT_FOUND, format!("Unknown tool: {}", tool_name));
    }

    // Hosts omit `arguments` for tools without parameters
    let empty = json!({});
    let arguments = match &params["arguments"] {
        Value::Null => &empty,
        args => args,
    };

    info!("🔧 MCP tool call: {}", tool_name);

    match call_tool(client, tool_name, arguments).await {
        Ok(result) => success_response(
            id,
            json!({
                "content": [
                    {
                        "type": "text",
                        "text": text_content(&result)
                    }
                ],
                "isError": false
            }),
        ),
        Err(Error::Validation(message)) => {
            warn!("Invalid arguments for {}: {}", tool_name, message);
            error_response(id, INVALID_PARAMS, message)
        }
        Err(e @ (Error::Config(_) | Error::Checksum(ChecksumError::MissingSecretKey))) => {
            error!("Configuration error in {}: {}", tool_name, e);
            error_response(id, INTERNAL_ERROR, format!("Error executing tool: {}", e))
        }
        Err(e) => {
            error!("Tool {} failed: {}", tool_name, e);
            success_response(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": format!("Error executing tool: {}", e)
                        }
                    ],
                    "isError": true
                }),
            )
        }
    }
}

/// Handle MCP resources/read request
pub async fn handle_resources_read(client: &BayarcashClient, request: &Value) -> Value {
    let id = &request["id"];
    let uri = request["params"]["uri"].as_str().unwrap_or("");

    let result = match uri {
        RESOURCE_PORTALS => client.get_portals().await,
        RESOURCE_CHANNELS => serde_json::to_value(client.get_channels(None)).map_err(Error::from),
        RESOURCE_FPX_BANKS => client.get_fpx_banks().await,
        _ => {
            warn!("Unknown resource requested: {}", uri);
            return error_response(id, INVALID_PARAMS, format!("Unknown resource: {}", uri));
        }
    };

    match result {
        Ok(value) => success_response(
            id,
            json!({
                "contents": [
                    {
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": text_content(&value)
                    }
                ]
            }),
        ),
        Err(e) => {
            error!("Failed to read resource {}: {}", uri, e);
            error_response(id, INTERNAL_ERROR, format!("Error reading resource: {}", e))
        }
    }
}

/// Route one decoded JSON-RPC message. Notifications yield `None`.
pub async fn dispatch(client: &BayarcashClient, request: &Value) -> Option<Value> {
    let method = request["method"].as_str().unwrap_or("");
    let id = &request["id"];
    let is_notification = request.get("id").is_none();

    if is_notification {
        info!("Received notification: {}", method);
        return None;
    }

    let response = match method {
        "initialize" => handle_initialize(request),
        "ping" => success_response(id, json!({})),
        "tools/list" => handle_tools_list(request),
        "tools/call" => handle_tools_call(client, request).await,
        "resources/list" => handle_resources_list(request),
        "resources/read" => handle_resources_read(client, request).await,
        "" => error_response(id, INVALID_REQUEST, "Invalid Request"),
        _ => {
            error!("Unknown method: {}", method);
            error_response(id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    Some(response)
}
