use serde::Serialize;
use utoipa::ToSchema;

/// Pagination block returned next to list data for the admin data tables.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct Meta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let last_page = if total <= 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            current_page: page,
            per_page,
            total,
            last_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(rename = "pagination", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn paginated(message: impl Into<String>, data: T, meta: Meta) -> Self {
        Self::success(message, data, Some(meta))
    }
}

impl ApiResponse<serde_json::Value> {
    /// Success without payload, used by deletes.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::success(message, serde_json::json!({}), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(Meta::new(1, 20, 41).last_page, 3);
        assert_eq!(Meta::new(1, 20, 40).last_page, 2);
        assert_eq!(Meta::new(1, 20, 0).last_page, 1);
    }

    #[test]
    fn pagination_key_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::success("ok", 1, None)).unwrap();
        assert_eq!(body["success"], true);
        assert!(body.get("pagination").is_none());

        let body =
            serde_json::to_value(ApiResponse::paginated("ok", vec![1], Meta::new(2, 10, 15)))
                .unwrap();
        assert_eq!(body["pagination"]["current_page"], 2);
        assert_eq!(body["pagination"]["last_page"], 2);
    }
}
