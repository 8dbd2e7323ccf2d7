use serde::Serialize;

/// Success envelope shared by every customer endpoint:
/// `{ success: true, message?, count?, data? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self { success: true, message: None, count: None, data: Some(data) }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self { success: true, message: None, count: Some(items.len()), data: Some(items) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self { success: true, message: Some(message), count: None, data: None }
    }
}

/// Failure envelope: `{ success: false, error }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { success: false, error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_carries_count() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(body, json!({"success": true, "count": 3, "data": [1, 2, 3]}));
    }

    #[test]
    fn message_only_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Customer deleted successfully")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Customer deleted successfully"}));
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ErrorBody::new("customer not found")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "customer not found"}));
    }
}
