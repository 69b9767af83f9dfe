use authex_primitives::models::KlvDictionary;
use authex_primitives::GatewayError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One decoded KLV record. The original key index is kept so a decoded
/// payload can be re-encoded without the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlvRecord {
    pub key_index: String,
    pub key_name: String,
    pub value: String,
}

/// Decoded `tx-data` payload. Records keep their wire order; serialization
/// produces a flat JSON map from key name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxData {
    records: Vec<KlvRecord>,
}

impl TxData {
    pub fn get(&self, key_name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.key_name == key_name)
            .map(|r| r.value.as_str())
    }

    pub fn records(&self) -> &[KlvRecord] {
        &self.records
    }

    /// Re-packs the records into the wire form (3-char key index, 2-char
    /// decimal length, value).
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for r in &self.records {
            out.push_str(&r.key_index);
            out.push_str(&format!("{:02}", r.value.len()));
            out.push_str(&r.value);
        }
        out
    }
}

impl Serialize for TxData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for r in &self.records {
            map.serialize_entry(&r.key_name, &r.value)?;
        }
        map.end()
    }
}

fn klv_err(input: &str, offset: usize, msg: &str) -> GatewayError {
    GatewayError::Klv(format!("offset {} of {:?}: {}", offset, input, msg))
}

/// Decodes a packed KLV string against the key-index dictionary.
///
/// An unknown key index is accepted with a synthesized `UNKNOWN<offset>`
/// name; a truncated record or a non-numeric length field is an error, so
/// the whole input must be consumed exactly.
pub fn decode(input: &str, dict: &KlvDictionary) -> Result<TxData, GatewayError> {
    let mut records = Vec::new();
    let mut i = 0usize;

    while i < input.len() {
        let key_index = input
            .get(i..i + 3)
            .ok_or_else(|| klv_err(input, i, "truncated key index"))?;
        let len_field = input
            .get(i + 3..i + 5)
            .ok_or_else(|| klv_err(input, i, "truncated length field"))?;
        if !len_field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(klv_err(input, i, "length field is not numeric"));
        }
        let len: usize = len_field
            .parse()
            .map_err(|_| klv_err(input, i, "length field is not numeric"))?;
        let value = input
            .get(i + 5..i + 5 + len)
            .ok_or_else(|| klv_err(input, i, "value extends past end of input"))?;

        let key_name = match dict.get(key_index) {
            Some(entry) => entry.key_name.clone(),
            None => format!("UNKNOWN{}", i),
        };

        records.push(KlvRecord {
            key_index: key_index.to_string(),
            key_name,
            value: value.to_string(),
        });
        i += 5 + len;
    }

    Ok(TxData { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use authex_primitives::models::KlvEntry;

    fn dict() -> KlvDictionary {
        KlvDictionary::from_entries(vec![
            KlvEntry {
                key_index: "002".into(),
                key_name: "LastfourDigitsPAN".into(),
                key_descrp: "Last four digits of the PAN".into(),
            },
            KlvEntry {
                key_index: "042".into(),
                key_name: "TerminalCity".into(),
                key_descrp: "Terminal city".into(),
            },
        ])
    }

    #[test]
    fn decodes_known_keys_in_order() {
        let data = decode("00204123404206MEXICO", &dict()).unwrap();
        assert_eq!(data.get("LastfourDigitsPAN"), Some("1234"));
        assert_eq!(data.get("TerminalCity"), Some("MEXICO"));
        // a trailing byte belongs to no record and must fail the decode
        assert!(decode("00204123404206MEXICO0", &dict()).is_err());
    }

    #[test]
    fn decodes_zero_length_values_as_empty() {
        let data = decode("00200", &dict()).unwrap();
        assert_eq!(data.get("LastfourDigitsPAN"), Some(""));
    }

    #[test]
    fn synthesizes_unknown_keys_from_the_record_offset() {
        let data = decode("002041234999027X", &dict()).unwrap();
        assert_eq!(data.get("LastfourDigitsPAN"), Some("1234"));
        assert_eq!(data.get("UNKNOWN9"), Some("7X"));
    }

    #[test]
    fn rejects_malformed_payloads() {
        // non-numeric length
        assert!(decode("002xx1234", &dict()).is_err());
        // value shorter than declared
        assert!(decode("00205123", &dict()).is_err());
        // truncated key index / length field
        assert!(decode("00", &dict()).is_err());
        assert!(decode("0020", &dict()).is_err());
    }

    #[test]
    fn encode_round_trips_well_formed_input() {
        let wire = "00204123404206MEXICO999027X";
        let decoded = decode(wire, &dict()).unwrap();
        assert_eq!(decoded.encode(), wire);
    }

    #[test]
    fn serializes_to_a_flat_json_map() {
        let data = decode("002041234", &dict()).unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["LastfourDigitsPAN"], "1234");
    }
}
