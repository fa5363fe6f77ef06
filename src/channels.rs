// Payment channel catalog
//
// Bayarcash exposes no channel listing endpoint; the ids below are the ones
// the gateway accepts in `payment_channel`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentChannel {
    pub id: &'static str,
    pub name: &'static str,
    pub code: &'static str,
}

pub const PAYMENT_CHANNELS: [PaymentChannel; 10] = [
    PaymentChannel { id: "1", name: "FPX", code: "fpx" },
    PaymentChannel { id: "2", name: "DuitNow", code: "duitnow" },
    PaymentChannel { id: "3", name: "Boost", code: "boost" },
    PaymentChannel { id: "4", name: "GrabPay", code: "grabpay" },
    PaymentChannel { id: "5", name: "Touch n Go", code: "tng" },
    PaymentChannel { id: "6", name: "ShopeePay", code: "shopeepay" },
    PaymentChannel { id: "7", name: "SPayLater", code: "spaylater" },
    PaymentChannel { id: "8", name: "Boost PayFlex", code: "boostpayflex" },
    PaymentChannel { id: "9", name: "QRIS", code: "qris" },
    PaymentChannel { id: "10", name: "NETS", code: "nets" },
];

/// Numeric channel id for a code such as `duitnow`. Case-insensitive.
pub fn channel_id_for_code(code: &str) -> Option<u8> {
    PAYMENT_CHANNELS
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
        .and_then(|c| c.id.parse().ok())
}
