// HTTP client for the Bayarcash REST API
//
// Every call is a single bearer-authenticated JSON round-trip. Responses are
// relayed as raw JSON; non-success statuses become `Error::Api` carrying the
// status code and the upstream body.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::channels::{PaymentChannel, PAYMENT_CHANNELS};
use crate::checksum::{CallbackPayload, ChecksumSigner};
use crate::config::BayarcashConfig;
use crate::error::{Error, Result};

/// Body of `POST /payment-intents`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntentRequest {
    pub order_number: String,
    pub amount: f64,
    pub payer_email: String,
    pub payer_name: String,
    pub description: String,
    pub portal_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_channel: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_telephone_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_optional: Option<bool>,
    /// Filled in by the client when the caller leaves it empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Query filters for `GET /transactions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    pub status: Option<String>,
    pub payment_channel: Option<u8>,
    pub payer_email: Option<String>,
    pub order_number: Option<String>,
    pub exchange_reference_number: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl TransactionFilters {
    /// Present filters as query pairs, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.status {
            pairs.push(("status", v.clone()));
        }
        if let Some(v) = self.payment_channel {
            pairs.push(("payment_channel", v.to_string()));
        }
        if let Some(v) = &self.payer_email {
            pairs.push(("payer_email", v.clone()));
        }
        if let Some(v) = &self.order_number {
            pairs.push(("order_number", v.clone()));
        }
        if let Some(v) = &self.exchange_reference_number {
            pairs.push(("exchange_reference_number", v.clone()));
        }
        if let Some(v) = self.page {
            pairs.push(("page", v.to_string()));
        }
        if let Some(v) = self.per_page {
            pairs.push(("per_page", v.to_string()));
        }
        pairs
    }
}

/// Body of `POST /mandates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FpxDirectDebitEnrollment {
    pub order_number: String,
    pub payer_email: String,
    pub payer_name: String,
    pub bank_code: String,
    pub frequency: String,
    pub max_amount: f64,
}

/// Body of `PUT /mandates/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FpxDirectDebitMaintenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
}

impl FpxDirectDebitMaintenance {
    pub fn is_empty(&self) -> bool {
        self.payer_email.is_none()
            && self.payer_name.is_none()
            && self.frequency.is_none()
            && self.max_amount.is_none()
    }
}

/// Some endpoints wrap their payload as `{"data": ...}`. Take the inner
/// value when it is present and truthy, otherwise keep the whole body.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            let truthy = match map.get("data") {
                None | Some(Value::Null) | Some(Value::Bool(false)) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
                Some(_) => true,
            };
            if truthy {
                map.remove("data").unwrap_or(Value::Null)
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

/// Client for the Bayarcash payment gateway
pub struct BayarcashClient {
    client: Client,
    base_url: String,
    api_token: SecretString,
    signer: ChecksumSigner,
}

impl BayarcashClient {
    pub fn new(config: BayarcashConfig) -> Result<Self> {
        let base_url = config.base_url();
        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid base URL `{}`: {}", base_url, e)))?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token,
            signer: ChecksumSigner::new(config.api_secret_key),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn signer(&self) -> &ChecksumSigner {
        &self.signer
    }

    /// Base URL with each segment appended and percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL `{}`: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL `{}` cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_portals(&self) -> Result<Value> {
        let url = self.endpoint(&["portals"])?;
        self.make_request(Method::GET, url, None).await.map(unwrap_data)
    }

    /// Static catalog. The portal key is accepted but does not narrow it.
    pub fn get_channels(&self, portal_key: Option<&str>) -> Vec<PaymentChannel> {
        if let Some(portal_key) = portal_key {
            debug!("Channel list requested for portal {}", portal_key);
        }
        PAYMENT_CHANNELS.to_vec()
    }

    pub async fn get_fpx_banks(&self) -> Result<Value> {
        let url = self.endpoint(&["fpx", "banks"])?;
        self.make_request(Method::GET, url, None).await.map(unwrap_data)
    }

    /// Create a payment intent, signing it unless the caller brought a
    /// checksum of their own.
    pub async fn create_payment_intent(&self, mut request: PaymentIntentRequest) -> Result<Value> {
        if request.checksum.is_none() {
            let checksum = self.signer.sign_payment_intent(
                &request.order_number,
                request.amount,
                &request.payer_email,
            )?;
            request.checksum = Some(checksum);
        } else {
            debug!("Using caller-supplied checksum for {}", request.order_number);
        }

        let url = self.endpoint(&["payment-intents"])?;
        let body = serde_json::to_value(&request)?;
        self.make_request(Method::POST, url, Some(body)).await
    }

    /// Look up a payment intent by its `pi_`/`trx_` id.
    pub async fn get_payment_intent(&self, payment_intent_id: &str) -> Result<Value> {
        let url = self.endpoint(&["payment-intents", payment_intent_id])?;
        self.make_request(Method::GET, url, None).await
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Value> {
        let url = self.endpoint(&["transactions", transaction_id])?;
        self.make_request(Method::GET, url, None).await.map(unwrap_data)
    }

    /// One page of transactions. Pagination metadata is relayed untouched.
    pub async fn list_transactions(&self, filters: &TransactionFilters) -> Result<Value> {
        let mut url = self.endpoint(&["transactions"])?;
        let pairs = filters.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self.make_request(Method::GET, url, None).await
    }

    pub async fn get_transaction_by_order_number(&self, order_number: &str) -> Result<Value> {
        let url = self.endpoint(&["transactions", "order", order_number])?;
        self.make_request(Method::GET, url, None).await.map(unwrap_data)
    }

    pub async fn get_transaction_by_reference_number(&self, reference_number: &str) -> Result<Value> {
        let url = self.endpoint(&["transactions", "reference", reference_number])?;
        self.make_request(Method::GET, url, None).await.map(unwrap_data)
    }

    pub async fn create_fpx_direct_debit_enrollment(
        &self,
        enrollment: &FpxDirectDebitEnrollment,
    ) -> Result<Value> {
        let url = self.endpoint(&["mandates"])?;
        let body = serde_json::to_value(enrollment)?;
        self.make_request(Method::POST, url, Some(body)).await
    }

    pub async fn update_fpx_direct_debit_mandate(
        &self,
        mandate_id: &str,
        update: &FpxDirectDebitMaintenance,
    ) -> Result<Value> {
        let url = self.endpoint(&["mandates", mandate_id])?;
        let body = serde_json::to_value(update)?;
        self.make_request(Method::PUT, url, Some(body)).await
    }

    pub async fn terminate_fpx_direct_debit_mandate(&self, mandate_id: &str) -> Result<Value> {
        let url = self.endpoint(&["mandates", mandate_id])?;
        self.make_request(Method::DELETE, url, None).await
    }

    /// Check a webhook callback against its checksum. No network involved.
    pub fn verify_callback(&self, payload: &CallbackPayload, checksum: &str) -> Result<bool> {
        let valid = self.signer.verify_callback(payload, checksum)?;
        if !valid {
            info!("Callback checksum did not match");
        }
        Ok(valid)
    }

    async fn make_request(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        info!("🌐 Making {} request to: {}", method, url.path());

        let mut request_builder = self
            .client
            .request(method, url)
            .bearer_auth(self.api_token.expose_secret())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request_builder = request_builder.json(&body);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            error!("❌ Bayarcash request failed with status {}: {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        // DELETE and friends may answer with an empty body
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let json = serde_json::from_str(&text)
            .map_err(|e| Error::Decode(format!("{} (status {})", e, status)))?;
        debug!("✅ Bayarcash request successful");
        Ok(json)
    }
}
