//! Audit logging for provider calls.
//! Turns a completed exchange into the row appended to the audit log.

use promptlog_common::AuditRecord;

use crate::backend::Exchange;

impl Exchange {
    /// Provider response body as text; invalid UTF-8 is replaced.
    pub fn response_text(&self) -> String {
        String::from_utf8_lossy(&self.response_body).into_owned()
    }

    pub fn to_audit_record(&self) -> AuditRecord {
        AuditRecord {
            http_method: self.method.clone(),
            request_url: self.url.clone(),
            request_body: self.request_body.clone(),
            request_headers: self.request_headers.clone(),
            response_headers: self.response_headers.clone(),
            response_body: self.response_text(),
            status_code: i32::from(self.status),
            error_message: String::new(),
            user_agent: self.user_agent.clone(),
            ip_address: self.ip_address.clone(),
            duration: self.elapsed,
            request_timestamp: self.started_at,
            response_timestamp: self.finished_at,
            request_size: self.request_size,
            response_size: self.response_size,
            request_id: self.request_id.clone(),
        }
    }
}
