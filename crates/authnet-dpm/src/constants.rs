/// Hosted payment form endpoint used when the account runs in test mode.
pub const TEST_SERVICE_URL: &str = "https://test.authorize.net/gateway/transact.dll";

/// Hosted payment form endpoint for live transactions.
pub const LIVE_SERVICE_URL: &str = "https://secure.authorize.net/gateway/transact.dll";

/// `x_response_code` value the gateway sends for an approved transaction.
pub const APPROVED_RESPONSE_CODE: &str = "1";

/// Transaction type carried on every domain event emitted by the processor.
pub const SALE_TRANSACTION_TYPE: &str = "sale";

/// Default target name for approved transactions.
pub const DEFAULT_SUCCESS_TARGET: &str = "authorize_net_success_handler";

/// Default target name for declined transactions.
pub const DEFAULT_FAILURE_TARGET: &str = "authorize_net_failure_handler";

/// Delimiter placed before, between and after fields in a signed message.
pub const FIELD_DELIMITER: char = '^';

// Outbound (checkout form) field names.
pub const X_LOGIN: &str = "x_login";
pub const X_FP_HASH: &str = "x_fp_hash";
pub const X_FP_SEQUENCE: &str = "x_fp_sequence";
pub const X_FP_TIMESTAMP: &str = "x_fp_timestamp";
pub const X_AMOUNT: &str = "x_amount";

// Inbound (relay response) fields read outside the signed schema.
pub const X_TRANS_ID: &str = "x_trans_id";
pub const X_RESPONSE_CODE: &str = "x_response_code";
pub const X_RESPONSE_REASON_TEXT: &str = "x_response_reason_text";
pub const X_SHA2_HASH: &str = "x_SHA2_Hash";

/// Query parameter names on the result redirect.
pub const QUERY_RESPONSE: &str = "response";
pub const QUERY_TRANSACTION_ID: &str = "transaction_id";
