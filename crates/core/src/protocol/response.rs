use authex_primitives::codes::ResultCode;

/// Fixed response bodies. The processor matches on these byte-for-byte, so
/// they are kept as literals instead of going through a serializer.
pub const DO_NOT_HONOR_BODY: &str = "<methodResponse><params><param><value><struct><member><name>resultCode</name><value><int>-9</int></value></member></struct></value></param></params></methodResponse>";
pub const ZERO_BALANCE_BODY: &str = "<methodResponse><params><param><value><struct><member><name>resultCode</name><value><int>1</int></value></member><member><name>balanceAmount</name><value><int>000</int></value></member></struct></value></param></params></methodResponse>";
pub const INCORRECT_PIN_BODY: &str = "<methodResponse><params><param><value><struct><member><name>resultCode</name><value><int>-25</int></value></member></struct></value></param></params></methodResponse>";

pub const RESPONSE_CONTENT_TYPE: &str = "text/xml; charset=utf-8";
pub const RESPONSE_USER_AGENT: &str = "Authex/1.0.0 (Rust)";

/// Renders the single-int result template for a method response.
pub fn render_single_int(code: ResultCode) -> String {
    format!(
        "<methodResponse><params><param><value><struct><member><name>resultCode</name><value><int>{}</int></value></member></struct></value></param></params></methodResponse>",
        code.as_str()
    )
}
