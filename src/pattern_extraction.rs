use once_cell::sync::Lazy;
use regex::Regex;

/// Character class a captured section may contain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// Digits and `-T:.Z`
    Timestamp,
    /// Word characters and whitespace
    Words,
    /// Word characters and hyphens
    Identifier,
    /// Anything up to the next pipe
    Segment,
    /// Rest of the line, pipes and newlines included
    Remainder,
}

impl FieldType {
    fn to_regex(self) -> &'static str {
        match self {
            FieldType::Timestamp => r"[\d\-T:.Z]+",
            FieldType::Words => r"[\w\s]+",
            FieldType::Identifier => r"[\w\-]+",
            FieldType::Segment => r"[^|]+",
            FieldType::Remainder => r".*",
        }
    }
}

/// One section of the line grammar: a literal lead-in, a named capture and
/// the separator that closes it. `lead` and `trail` are regex fragments.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub lead: &'static str,
    pub name: &'static str,
    pub field_type: FieldType,
    pub trail: &'static str,
}

const fn section(
    lead: &'static str,
    name: &'static str,
    field_type: FieldType,
    trail: &'static str,
) -> Section {
    Section {
        lead,
        name,
        field_type,
        trail,
    }
}

/// `date: <datetime> | <message>: <product> | product: <product_name>| endpoint: ...| message: <rest>`
pub const LOG_GRAMMAR: [Section; 8] = [
    section("date: ", "datetime", FieldType::Timestamp, r"\s+\|\s+"),
    section("", "message", FieldType::Words, r":\s+"),
    section("", "product", FieldType::Identifier, r"\s+\|\s+"),
    section(r"product:\s+", "product_name", FieldType::Segment, r"\|\s+"),
    section(r"endpoint:\s+", "endpoint", FieldType::Segment, r"\|\s+"),
    section(r"transaction_id:\s+", "transaction_id", FieldType::Segment, r"\|\s+"),
    section(r"flow_id:\s+", "flow_id", FieldType::Segment, r"\|\s+"),
    section(r"message:\s+", "message_content", FieldType::Remainder, ""),
];

/// Prefix of the CSV header row some exports carry
const HEADER_PREFIX: &str = "timestamp,message";

static LINE_EXTRACTOR: Lazy<PatternExtractor> = Lazy::new(|| PatternExtractor::new(&LOG_GRAMMAR));

static SERVICE_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"serviceType:\s*([\w\-]+)").unwrap());
static TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"type:\s*([\w\-]+)").unwrap());
static STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"status:\s*([\w\-]+)").unwrap());

/// Fields captured by the line grammar, each trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFields {
    pub datetime: String,
    pub message: String,
    pub product: String,
    pub product_name: String,
    pub endpoint: String,
    pub transaction_id: String,
    pub flow_id: String,
    pub message_content: String,
}

/// What became of a single physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Matched(LogFields),
    Blank,
    Header,
    Unmatched,
}

/// Secondary `key: value` pairs found in the message body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFields {
    pub service_type: String,
    pub kind: String,
    pub status: String,
}

/// Line grammar compiled into a single capture-group regex
pub struct PatternExtractor {
    regex: Regex,
}

impl PatternExtractor {
    pub fn new(grammar: &[Section]) -> Self {
        let pattern = Self::compile_pattern(grammar);
        // The fragments are static; a failure here is a programming error.
        let regex = Regex::new(&pattern).expect("line grammar compiles");
        PatternExtractor { regex }
    }

    /// Join the sections into one regex; `(?s)` lets the remainder span newlines
    fn compile_pattern(grammar: &[Section]) -> String {
        let mut pattern = String::from("(?s)");
        for section in grammar {
            pattern.push_str(section.lead);
            pattern.push_str("(?P<");
            pattern.push_str(section.name);
            pattern.push('>');
            pattern.push_str(section.field_type.to_regex());
            pattern.push(')');
            pattern.push_str(section.trail);
        }
        pattern
    }

    fn extract(&self, text: &str) -> Option<LogFields> {
        let captures = self.regex.captures(text)?;
        let field = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };

        Some(LogFields {
            datetime: field("datetime"),
            message: field("message"),
            product: field("product"),
            product_name: field("product_name"),
            endpoint: field("endpoint"),
            transaction_id: field("transaction_id"),
            flow_id: field("flow_id"),
            message_content: field("message_content"),
        })
    }
}

/// Match a raw line against the log grammar
pub fn extract_line(line: &str) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }
    if line.starts_with(HEADER_PREFIX) {
        return LineOutcome::Header;
    }

    match LINE_EXTRACTOR.extract(line) {
        Some(fields) => LineOutcome::Matched(fields),
        None => LineOutcome::Unmatched,
    }
}

/// Split on the first pipe only: `(message_error, message_content)`
pub fn split_message(message: &str) -> (String, String) {
    match message.split_once('|') {
        Some((error, rest)) => (error.trim().to_string(), rest.trim().to_string()),
        None => (message.trim().to_string(), String::new()),
    }
}

/// Search the body for `serviceType`, `type` and `status`, independently
pub fn mine_content_fields(content: &str) -> ContentFields {
    let first_capture = |re: &Regex| {
        re.captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    ContentFields {
        service_type: first_capture(&SERVICE_TYPE_RE),
        kind: first_capture(&TYPE_RE),
        status: first_capture(&STATUS_RE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date: 2024-01-15T10:30:00.000000Z | ERROR: svcA | product: svcA| endpoint: /x| transaction_id: t1| flow_id: f1| message: bad request|serviceType: PAYMENT";

    fn matched(line: &str) -> LogFields {
        match extract_line(line) {
            LineOutcome::Matched(fields) => fields,
            other => panic!("Expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_pattern() {
        let pattern = PatternExtractor::compile_pattern(&LOG_GRAMMAR[..2]);
        assert_eq!(
            pattern,
            r"(?s)date: (?P<datetime>[\d\-T:.Z]+)\s+\|\s+(?P<message>[\w\s]+):\s+"
        );
    }

    #[test]
    fn test_extracts_every_section() {
        let fields = matched(SAMPLE);
        assert_eq!(fields.datetime, "2024-01-15T10:30:00.000000Z");
        assert_eq!(fields.message, "ERROR");
        assert_eq!(fields.product, "svcA");
        assert_eq!(fields.product_name, "svcA");
        assert_eq!(fields.endpoint, "/x");
        assert_eq!(fields.transaction_id, "t1");
        assert_eq!(fields.flow_id, "f1");
        assert_eq!(fields.message_content, "bad request|serviceType: PAYMENT");
    }

    #[test]
    fn test_values_are_trimmed() {
        let line = "  date: 2024-01-15T10:30:00.000000Z   |   Request failed:   pay-api   |   product:   Payments API  |   endpoint:   /v1/pay   |   transaction_id:  abc  |   flow_id:  xyz  |   message:   boom   ";
        let fields = matched(line);
        assert_eq!(fields.message, "Request failed");
        assert_eq!(fields.product, "pay-api");
        assert_eq!(fields.product_name, "Payments API");
        assert_eq!(fields.endpoint, "/v1/pay");
        assert_eq!(fields.transaction_id, "abc");
        assert_eq!(fields.flow_id, "xyz");
        assert_eq!(fields.message_content, "boom");
    }

    #[test]
    fn test_remainder_keeps_newlines() {
        let line = format!("{}\nsecond line|third", SAMPLE);
        let fields = matched(&line);
        assert_eq!(
            fields.message_content,
            "bad request|serviceType: PAYMENT\nsecond line|third"
        );
    }

    #[test]
    fn test_blank_header_and_unmatched() {
        assert_eq!(extract_line(""), LineOutcome::Blank);
        assert_eq!(extract_line("   \t "), LineOutcome::Blank);
        assert_eq!(
            extract_line("timestamp,message,product"),
            LineOutcome::Header
        );
        assert_eq!(extract_line("just some text"), LineOutcome::Unmatched);
        // datetime section refuses letters other than T and Z
        assert_eq!(
            extract_line(&SAMPLE.replace("2024-01-15", "Jan 15")),
            LineOutcome::Unmatched
        );
    }

    #[test]
    fn test_split_message() {
        assert_eq!(split_message("a|b|c"), ("a".to_string(), "b|c".to_string()));
        assert_eq!(split_message("a"), ("a".to_string(), String::new()));
        assert_eq!(split_message(""), (String::new(), String::new()));
        assert_eq!(
            split_message("  oops  |  rest | more "),
            ("oops".to_string(), "rest | more".to_string())
        );
    }

    #[test]
    fn test_mine_content_fields() {
        let fields = mine_content_fields("serviceType: PAYMENT type: PIX-OUT status: FAILED");
        assert_eq!(fields.service_type, "PAYMENT");
        assert_eq!(fields.kind, "PIX-OUT");
        assert_eq!(fields.status, "FAILED");
    }

    #[test]
    fn test_mine_content_fields_defaults_to_empty() {
        let fields = mine_content_fields("nothing interesting");
        assert_eq!(fields, ContentFields::default());

        // keys are case-sensitive, so serviceType does not feed `type`
        let fields = mine_content_fields("serviceType:TOPUP");
        assert_eq!(fields.service_type, "TOPUP");
        assert_eq!(fields.kind, "");
    }

    #[test]
    fn test_mine_content_fields_overlap() {
        // `type:` also matches inside `subtype:`; each search is independent
        let fields = mine_content_fields("subtype: inner status: ok");
        assert_eq!(fields.kind, "inner");
        assert_eq!(fields.status, "ok");
    }
}
