use authex_primitives::GatewayError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed `methodCall` envelope: the method name and the positional
/// parameter values as raw strings.
///
/// Each `<value>` contributes the concatenation of its text content,
/// including the text of any typed subtag (`<int>`, `<string>`, ...); the
/// subtags themselves are not interpreted. No trimming or re-normalization
/// is applied, since the checksum is computed over the delivered strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub method_name: String,
    pub params: Vec<String>,
}

impl Envelope {
    pub fn parse(body: &[u8]) -> Result<Self, GatewayError> {
        let mut reader = Reader::from_reader(body);

        let mut method_name = String::new();
        let mut params: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut in_method_name = false;
        let mut value_depth = 0usize;
        let mut saw_method_call = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"methodCall" => saw_method_call = true,
                    b"methodName" => in_method_name = true,
                    b"value" => {
                        if value_depth == 0 {
                            current.clear();
                        }
                        value_depth += 1;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"methodName" => in_method_name = false,
                    b"value" => {
                        if value_depth == 0 {
                            return Err(GatewayError::Protocol(
                                "unbalanced value element".into(),
                            ));
                        }
                        value_depth -= 1;
                        if value_depth == 0 {
                            params.push(std::mem::take(&mut current));
                        }
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"value" && value_depth == 0 {
                        params.push(String::new());
                    }
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| GatewayError::Protocol(format!("bad text content: {}", e)))?;
                    if in_method_name {
                        method_name.push_str(&text);
                    } else if value_depth > 0 {
                        current.push_str(&text);
                    }
                }
                Ok(Event::CData(t)) => {
                    let text = String::from_utf8(t.into_inner().into_owned())
                        .map_err(|e| GatewayError::Protocol(format!("bad CDATA content: {}", e)))?;
                    if in_method_name {
                        method_name.push_str(&text);
                    } else if value_depth > 0 {
                        current.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(GatewayError::Protocol(format!("malformed envelope: {}", e)))
                }
            }
            buf.clear();
        }

        if !saw_method_call || method_name.is_empty() {
            return Err(GatewayError::Protocol(
                "body is not a methodCall envelope".into(),
            ));
        }

        Ok(Self {
            method_name,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_method_name_and_positional_params() {
        let body = b"<methodCall><methodName>Deduct</methodName><params>\
            <param><value>9264</value></param>\
            <param><value>7000001</value></param>\
            <param><value>02500</value></param>\
            </params></methodCall>";

        let env = Envelope::parse(body).unwrap();
        assert_eq!(env.method_name, "Deduct");
        assert_eq!(env.params, vec!["9264", "7000001", "02500"]);
    }

    #[test]
    fn reads_typed_subtags_as_text() {
        let body = b"<methodCall><methodName>Balance</methodName><params>\
            <param><value><string>terminal-1</string></value></param>\
            <param><value><int>42</int></value></param>\
            </params></methodCall>";

        let env = Envelope::parse(body).unwrap();
        assert_eq!(env.params, vec!["terminal-1", "42"]);
    }

    #[test]
    fn keeps_delivered_bytes_unescaped_but_not_normalized() {
        let body = b"<methodCall><methodName>Deduct</methodName><params>\
            <param><value> POS Store &amp; Cafe </value></param>\
            </params></methodCall>";

        let env = Envelope::parse(body).unwrap();
        assert_eq!(env.params, vec![" POS Store & Cafe "]);
    }

    #[test]
    fn empty_values_become_empty_params() {
        let body = b"<methodCall><methodName>Stop</methodName><params>\
            <param><value></value></param>\
            <param><value/></param>\
            </params></methodCall>";

        let env = Envelope::parse(body).unwrap();
        assert_eq!(env.params, vec!["", ""]);
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(Envelope::parse(b"<methodCall><methodName>Deduct</params>").is_err());
        assert!(Envelope::parse(b"this is not xml at all").is_err());
    }

    #[test]
    fn rejects_envelope_without_method_name() {
        let body = b"<methodCall><params><param><value>x</value></param></params></methodCall>";
        assert!(Envelope::parse(body).is_err());
    }
}
