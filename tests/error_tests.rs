//! 错误响应格式测试

use axum::response::IntoResponse;
use estate_system::error::AppError;
use http_body_util::BodyExt;

async fn error_body(error: AppError) -> (u16, serde_json::Value) {
    let response = error.into_response();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_unauthorized_response_shape() {
    let (status, json) = error_body(AppError::Unauthorized).await;

    assert_eq!(status, 401);
    assert_eq!(json["error"]["code"], 401);
    assert_eq!(json["error"]["message"], "Authentication failed");
    assert!(json["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_data_filtering_response_is_generic_500() {
    // 范围解析失败对客户端只呈现通用 500，不泄露操作名
    let (status, json) = error_body(AppError::DataFiltering {
        operation: "accessible_tenants",
        source: sqlx::Error::PoolTimedOut,
    })
    .await;

    assert_eq!(status, 500);
    assert_eq!(json["error"]["message"], "Internal server error");
    assert!(!json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("tenants"));
}

#[tokio::test]
async fn test_bad_request_carries_message() {
    let (status, json) = error_body(AppError::BadRequest("流水必须关联租户或别墅".into())).await;

    assert_eq!(status, 400);
    assert_eq!(json["error"]["message"], "流水必须关联租户或别墅");
}

#[tokio::test]
async fn test_not_found_response() {
    let (status, json) = error_body(AppError::NotFound).await;

    assert_eq!(status, 404);
    assert_eq!(json["error"]["message"], "Resource not found");
}
