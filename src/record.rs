// src/record.rs
use serde::Serialize;

/// Canonical column order of every exported row
pub const COLUMNS: [&str; 19] = [
    "datetime",
    "message",
    "product",
    "product_name",
    "endpoint",
    "transaction_id",
    "flow_id",
    "service_type",
    "type",
    "status",
    "metadata_service_type",
    "metadata_type",
    "metadata_status",
    "metadata_name",
    "metadata_person_type",
    "metadata_msisdn",
    "metadata_cpf",
    "message_error",
    "message_content",
];

/// One parsed log line. Field order matches `COLUMNS` so serde emits
/// the canonical header when a record is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub datetime: String,
    pub message: String,
    pub product: String,
    pub product_name: String,
    pub endpoint: String,
    pub transaction_id: String,
    pub flow_id: String,
    pub service_type: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub metadata_service_type: String,
    pub metadata_type: String,
    pub metadata_status: String,
    pub metadata_name: String,
    pub metadata_person_type: String,
    pub metadata_msisdn: String,
    pub metadata_cpf: String,
    pub message_error: String,
    pub message_content: String,
}

impl Record {
    /// Values in canonical column order
    pub fn values(&self) -> [&str; 19] {
        [
            self.datetime.as_str(),
            self.message.as_str(),
            self.product.as_str(),
            self.product_name.as_str(),
            self.endpoint.as_str(),
            self.transaction_id.as_str(),
            self.flow_id.as_str(),
            self.service_type.as_str(),
            self.kind.as_str(),
            self.status.as_str(),
            self.metadata_service_type.as_str(),
            self.metadata_type.as_str(),
            self.metadata_status.as_str(),
            self.metadata_name.as_str(),
            self.metadata_person_type.as_str(),
            self.metadata_msisdn.as_str(),
            self.metadata_cpf.as_str(),
            self.message_error.as_str(),
            self.message_content.as_str(),
        ]
    }
}
