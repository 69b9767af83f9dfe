use crate::protocol::envelope::Envelope;
use crate::protocol::klv::TxData;
use authex_primitives::GatewayError;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Positional parameter schemas, one per method family. Every schema ends
/// with the checksum slot, so the canonical checksum input is always the
/// method name followed by all parameters but the last, in wire order.
///
/// The archival JSON stored on the ledger row is derived from the same
/// parse; the terminal id and the checksum are credentials and are dropped
/// before serialization.

fn expect_arity<'a>(envelope: &'a Envelope, arity: usize) -> Result<&'a [String], GatewayError> {
    if envelope.params.len() != arity {
        return Err(GatewayError::Protocol(format!(
            "method {} expects {} parameters, got {}",
            envelope.method_name,
            arity,
            envelope.params.len()
        )));
    }
    Ok(&envelope.params)
}

/// Schema for Deduct and LoadAuth:
/// terminal, reference, amount, narrative, tx-type, tx-data, tx-id,
/// tx-date, checksum.
#[derive(Debug, Clone)]
pub struct StandardRequest {
    pub method_name: String,
    pub terminal_id: String,
    pub reference: String,
    pub amount_raw: String,
    pub narrative: String,
    pub tx_type: String,
    pub tx_data_raw: String,
    pub tx_id: String,
    pub tx_date: String,
    pub checksum: String,
}

impl StandardRequest {
    pub const ARITY: usize = 9;

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, GatewayError> {
        let p = expect_arity(envelope, Self::ARITY)?;
        Ok(Self {
            method_name: envelope.method_name.clone(),
            terminal_id: p[0].clone(),
            reference: p[1].clone(),
            amount_raw: p[2].clone(),
            narrative: p[3].clone(),
            tx_type: p[4].clone(),
            tx_data_raw: p[5].clone(),
            tx_id: p[6].clone(),
            tx_date: p[7].clone(),
            checksum: p[8].clone(),
        })
    }

    pub fn canonical(&self) -> String {
        [
            self.method_name.as_str(),
            &self.terminal_id,
            &self.reference,
            &self.amount_raw,
            &self.narrative,
            &self.tx_type,
            &self.tx_data_raw,
            &self.tx_id,
            &self.tx_date,
        ]
        .concat()
    }

    pub fn archival_record(&self, amount: Decimal, tx_data: &TxData) -> Result<Value, GatewayError> {
        serde_json::to_value(StandardRecord {
            method_name: &self.method_name,
            terminal_id: None,
            reference: &self.reference,
            request_amount: amount,
            narrative: &self.narrative,
            tx_type: &self.tx_type,
            tx_data,
            tx_id: &self.tx_id,
            tx_date: &self.tx_date,
            checksum: None,
        })
        .map_err(GatewayError::from)
    }
}

#[derive(Serialize)]
struct StandardRecord<'a> {
    #[serde(rename = "method-name")]
    method_name: &'a str,
    #[serde(rename = "terminal-id", skip_serializing_if = "Option::is_none")]
    terminal_id: Option<&'a str>,
    reference: &'a str,
    #[serde(rename = "request-amount")]
    request_amount: Decimal,
    narrative: &'a str,
    #[serde(rename = "tx-type")]
    tx_type: &'a str,
    #[serde(rename = "tx-data")]
    tx_data: &'a TxData,
    #[serde(rename = "tx-id")]
    tx_id: &'a str,
    #[serde(rename = "tx-date")]
    tx_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<&'a str>,
}

/// Schema for the advice family (DeductReversal, DeductAdjustment,
/// LoadAdjustment, LoadReversal, LoadAuthReversal):
/// terminal, reference, amount, narrative, tx-data, reference-id,
/// reference-date, tx-id, tx-date, checksum.
#[derive(Debug, Clone)]
pub struct ReferencedRequest {
    pub method_name: String,
    pub terminal_id: String,
    pub reference: String,
    pub amount_raw: String,
    pub narrative: String,
    pub tx_data_raw: String,
    pub reference_id: String,
    pub reference_date: String,
    pub tx_id: String,
    pub tx_date: String,
    pub checksum: String,
}

impl ReferencedRequest {
    pub const ARITY: usize = 10;

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, GatewayError> {
        let p = expect_arity(envelope, Self::ARITY)?;
        Ok(Self {
            method_name: envelope.method_name.clone(),
            terminal_id: p[0].clone(),
            reference: p[1].clone(),
            amount_raw: p[2].clone(),
            narrative: p[3].clone(),
            tx_data_raw: p[4].clone(),
            reference_id: p[5].clone(),
            reference_date: p[6].clone(),
            tx_id: p[7].clone(),
            tx_date: p[8].clone(),
            checksum: p[9].clone(),
        })
    }

    pub fn canonical(&self) -> String {
        [
            self.method_name.as_str(),
            &self.terminal_id,
            &self.reference,
            &self.amount_raw,
            &self.narrative,
            &self.tx_data_raw,
            &self.reference_id,
            &self.reference_date,
            &self.tx_id,
            &self.tx_date,
        ]
        .concat()
    }

    pub fn archival_record(&self, amount: Decimal, tx_data: &TxData) -> Result<Value, GatewayError> {
        serde_json::to_value(ReferencedRecord {
            method_name: &self.method_name,
            terminal_id: None,
            reference: &self.reference,
            request_amount: amount,
            narrative: &self.narrative,
            tx_data,
            reference_id: &self.reference_id,
            reference_date: &self.reference_date,
            tx_id: &self.tx_id,
            tx_date: &self.tx_date,
            checksum: None,
        })
        .map_err(GatewayError::from)
    }
}

#[derive(Serialize)]
struct ReferencedRecord<'a> {
    #[serde(rename = "method-name")]
    method_name: &'a str,
    #[serde(rename = "terminal-id", skip_serializing_if = "Option::is_none")]
    terminal_id: Option<&'a str>,
    reference: &'a str,
    #[serde(rename = "request-amount")]
    request_amount: Decimal,
    narrative: &'a str,
    #[serde(rename = "tx-data")]
    tx_data: &'a TxData,
    #[serde(rename = "reference-id")]
    reference_id: &'a str,
    #[serde(rename = "reference-date")]
    reference_date: &'a str,
    #[serde(rename = "tx-id")]
    tx_id: &'a str,
    #[serde(rename = "tx-date")]
    tx_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<&'a str>,
}

/// Schema for Stop:
/// terminal, reference, voucher-number, stop-reason, tx-data, tx-id,
/// tx-date, checksum.
#[derive(Debug, Clone)]
pub struct StopRequest {
    pub method_name: String,
    pub terminal_id: String,
    pub reference: String,
    pub voucher_number: String,
    pub stop_reason: String,
    pub tx_data_raw: String,
    pub tx_id: String,
    pub tx_date: String,
    pub checksum: String,
}

impl StopRequest {
    pub const ARITY: usize = 8;

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, GatewayError> {
        let p = expect_arity(envelope, Self::ARITY)?;
        Ok(Self {
            method_name: envelope.method_name.clone(),
            terminal_id: p[0].clone(),
            reference: p[1].clone(),
            voucher_number: p[2].clone(),
            stop_reason: p[3].clone(),
            tx_data_raw: p[4].clone(),
            tx_id: p[5].clone(),
            tx_date: p[6].clone(),
            checksum: p[7].clone(),
        })
    }

    pub fn canonical(&self) -> String {
        [
            self.method_name.as_str(),
            &self.terminal_id,
            &self.reference,
            &self.voucher_number,
            &self.stop_reason,
            &self.tx_data_raw,
            &self.tx_id,
            &self.tx_date,
        ]
        .concat()
    }

    pub fn archival_record(&self, tx_data: &TxData) -> Result<Value, GatewayError> {
        serde_json::to_value(StopRecord {
            method_name: &self.method_name,
            terminal_id: None,
            reference: &self.reference,
            voucher_number: &self.voucher_number,
            stop_reason: &self.stop_reason,
            tx_data,
            tx_id: &self.tx_id,
            tx_date: &self.tx_date,
            checksum: None,
        })
        .map_err(GatewayError::from)
    }
}

#[derive(Serialize)]
struct StopRecord<'a> {
    #[serde(rename = "method-name")]
    method_name: &'a str,
    #[serde(rename = "terminal-id", skip_serializing_if = "Option::is_none")]
    terminal_id: Option<&'a str>,
    reference: &'a str,
    #[serde(rename = "voucher-number")]
    voucher_number: &'a str,
    #[serde(rename = "stop-reason")]
    stop_reason: &'a str,
    #[serde(rename = "tx-data")]
    tx_data: &'a TxData,
    #[serde(rename = "tx-id")]
    tx_id: &'a str,
    #[serde(rename = "tx-date")]
    tx_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use authex_primitives::models::{KlvDictionary, KlvEntry};

    fn envelope(method: &str, params: &[&str]) -> Envelope {
        Envelope {
            method_name: method.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn dict() -> KlvDictionary {
        KlvDictionary::from_entries(vec![KlvEntry {
            key_index: "002".into(),
            key_name: "LastfourDigitsPAN".into(),
            key_descrp: "Last four digits of the PAN".into(),
        }])
    }

    const DEDUCT_PARAMS: [&str; 9] = [
        "9264", "7000001", "02500", "POS purchase", "ATM", "002041234", "TX-1", "20260801120000",
        "ABCDEF",
    ];

    #[test]
    fn standard_schema_maps_slots_positionally() {
        let req = StandardRequest::from_envelope(&envelope("Deduct", &DEDUCT_PARAMS)).unwrap();
        assert_eq!(req.terminal_id, "9264");
        assert_eq!(req.reference, "7000001");
        assert_eq!(req.amount_raw, "02500");
        assert_eq!(req.tx_type, "ATM");
        assert_eq!(req.tx_data_raw, "002041234");
        assert_eq!(req.tx_id, "TX-1");
        assert_eq!(req.checksum, "ABCDEF");
    }

    #[test]
    fn schemas_reject_wrong_arity() {
        assert!(StandardRequest::from_envelope(&envelope("Deduct", &DEDUCT_PARAMS[..8])).is_err());
        assert!(ReferencedRequest::from_envelope(&envelope("DeductReversal", &DEDUCT_PARAMS)).is_err());
        assert!(StopRequest::from_envelope(&envelope("Stop", &DEDUCT_PARAMS)).is_err());
    }

    #[test]
    fn canonical_string_is_method_then_all_params_but_checksum() {
        let req = StandardRequest::from_envelope(&envelope("Deduct", &DEDUCT_PARAMS)).unwrap();
        assert_eq!(
            req.canonical(),
            "Deduct9264700000102500POS purchaseATM002041234TX-120260801120000"
        );
    }

    #[test]
    fn referenced_canonical_keeps_wire_order() {
        let params = [
            "9264", "7000001", "02500", "narr", "002041234", "TX-1", "20260801", "TX-2",
            "20260802", "CS",
        ];
        let req =
            ReferencedRequest::from_envelope(&envelope("DeductReversal", &params)).unwrap();
        assert_eq!(
            req.canonical(),
            "DeductReversal9264700000102500narr002041234TX-120260801TX-220260802"
        );
    }

    #[test]
    fn archival_record_drops_credentials_and_decodes_tx_data() {
        let req = StandardRequest::from_envelope(&envelope("Deduct", &DEDUCT_PARAMS)).unwrap();
        let tx_data = crate::protocol::klv::decode(&req.tx_data_raw, &dict()).unwrap();
        let json = req
            .archival_record(crate::protocol::amount::parse_minor_units("02500").unwrap(), &tx_data)
            .unwrap();

        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("terminal-id"));
        assert!(!obj.contains_key("checksum"));
        assert_eq!(json["method-name"], "Deduct");
        assert_eq!(json["tx-id"], "TX-1");
        assert_eq!(json["tx-data"]["LastfourDigitsPAN"], "1234");
    }

    #[test]
    fn stop_archival_record_keeps_voucher_and_reason() {
        let params = [
            "9264", "7000001", "5299990001231234", "LOST", "002041234", "TX-9", "20260801", "CS",
        ];
        let req = StopRequest::from_envelope(&envelope("Stop", &params)).unwrap();
        let tx_data = crate::protocol::klv::decode(&req.tx_data_raw, &dict()).unwrap();
        let json = req.archival_record(&tx_data).unwrap();

        assert_eq!(json["voucher-number"], "5299990001231234");
        assert_eq!(json["stop-reason"], "LOST");
        assert!(!json.as_object().unwrap().contains_key("checksum"));
    }
}
