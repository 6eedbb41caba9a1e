//! バックエンドHTTP連携テスト
//!
//! モックサーバーに対して各ポートの実装を検証

use mockito::{Matcher, Server};
use pet_signup::backend::{BackendClient, BackendSettings};
use pet_signup::config::Config;
use pet_signup_common::{
    AnalysisReply, AuthService, AuthSession, Credentials, ImageAnalyzer, ImagePayload,
    ObjectStorage, ProfileRow, ProfileStore, ServiceError,
};
use serde_json::json;
use std::time::Duration;

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(
        base_url,
        "anon-key",
        Duration::from_secs(5),
        BackendSettings::from(&Config::default()),
    )
    .expect("クライアント作成失敗")
}

fn session() -> AuthSession {
    AuthSession {
        user_id: "user-1".to_string(),
        email: Some("owner@example.com".to_string()),
        access_token: Some("session-token".to_string()),
    }
}

fn payload() -> ImagePayload {
    ImagePayload {
        image: "data:image/png;base64,iVBORw==".to_string(),
    }
}

/// 解析関数: 正常応答
#[tokio::test]
async fn test_analyze_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/functions/v1/analyze-pet")
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer anon-key")
        .match_body(Matcher::PartialJson(json!({"image": "data:image/png;base64,iVBORw=="})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"breed": "Shiba Inu", "size": "medium"}"#)
        .create_async()
        .await;

    let reply = client(&server.url()).analyze(&payload()).await.expect("解析失敗");

    mock.assert_async().await;
    match reply {
        AnalysisReply::Analysis(analysis) => {
            assert_eq!(analysis.field(&["breed"]).as_deref(), Some("Shiba Inu"));
            assert_eq!(analysis.error_marker(), None);
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

/// 解析関数: 埋め込みエラーは解析結果として返る
#[tokio::test]
async fn test_analyze_embedded_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/functions/v1/analyze-pet")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "No animal detected"}"#)
        .create_async()
        .await;

    let reply = client(&server.url()).analyze(&payload()).await.expect("解析失敗");

    match reply {
        AnalysisReply::Analysis(analysis) => {
            assert_eq!(analysis.error_marker().as_deref(), Some("No animal detected"));
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

/// 解析関数: 2xx以外はサービスエラー
#[tokio::test]
async fn test_analyze_service_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/functions/v1/analyze-pet")
        .with_status(500)
        .with_body(r#"{"error": "model overloaded"}"#)
        .create_async()
        .await;

    let reply = client(&server.url()).analyze(&payload()).await.expect("通信は成功するはず");
    assert_eq!(reply, AnalysisReply::Rejected("model overloaded".to_string()));
}

/// 解析関数: 接続できない場合は通信エラー
#[tokio::test]
async fn test_analyze_transport_error() {
    let result = client("http://127.0.0.1:1").analyze(&payload()).await;
    assert!(matches!(result, Err(ServiceError::Transport(_))));
}

/// 解析関数: 応答がなければタイムアウトで通信エラー
#[tokio::test]
async fn test_analyze_timeout_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // 接続を受け付けるだけで応答しない
    let silent = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = BackendClient::new(
        &format!("http://{}", addr),
        "anon-key",
        Duration::from_millis(100),
        BackendSettings::from(&Config::default()),
    )
    .expect("クライアント作成失敗");
    let result = client.analyze(&payload()).await;

    silent.abort();
    assert!(matches!(result, Err(ServiceError::Transport(_))));
}

/// 解析関数: JSONでない応答はデコードエラー
#[tokio::test]
async fn test_analyze_invalid_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/functions/v1/analyze-pet")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let result = client(&server.url()).analyze(&payload()).await;
    assert!(matches!(result, Err(ServiceError::Decode(_))));
}

/// サインアップ: セッションを返す
#[tokio::test]
async fn test_sign_up_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/v1/signup")
        .match_header("apikey", "anon-key")
        .match_body(Matcher::Json(json!({"email": "owner@example.com", "password": "secret-pass"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "jwt", "user": {"id": "u-42", "email": "owner@example.com"}}"#)
        .create_async()
        .await;

    let session = client(&server.url())
        .sign_up(&Credentials::new("owner@example.com", "secret-pass"))
        .await
        .expect("サインアップ失敗");

    mock.assert_async().await;
    assert_eq!(session.user_id, "u-42");
    assert_eq!(session.access_token.as_deref(), Some("jwt"));
}

/// サインアップ: 登録済みメールアドレス
#[tokio::test]
async fn test_sign_up_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/v1/signup")
        .with_status(422)
        .with_body(r#"{"code": 422, "msg": "User already registered"}"#)
        .create_async()
        .await;

    let result = client(&server.url())
        .sign_up(&Credentials::new("owner@example.com", "secret-pass"))
        .await;

    assert_eq!(
        result,
        Err(ServiceError::rejected(Some(422), "User already registered"))
    );
}

/// ストレージ: セッショントークンとContent-Typeを付けてアップロード
#[tokio::test]
async fn test_upload_uses_session_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/v1/object/pet-images/user-1/1700000000000.png")
        .match_header("authorization", "Bearer session-token")
        .match_header("content-type", "image/png")
        .with_status(200)
        .with_body(r#"{"Key": "pet-images/user-1/1700000000000.png"}"#)
        .create_async()
        .await;

    client(&server.url())
        .upload(&session(), "user-1/1700000000000.png", &[1, 2, 3], "image/png")
        .await
        .expect("アップロード失敗");

    mock.assert_async().await;
}

/// ストレージ: バケットがない場合
#[tokio::test]
async fn test_upload_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", Matcher::Regex(r"^/storage/v1/object/pet-images/".to_string()))
        .with_status(404)
        .with_body(r#"{"statusCode": "404", "error": "Bucket not found", "message": "Bucket not found"}"#)
        .create_async()
        .await;

    let result = client(&server.url())
        .upload(&session(), "user-1/1.png", &[0], "image/png")
        .await;

    assert!(matches!(result, Err(ServiceError::Rejected { status: Some(404), .. })));
}

/// ストレージ: 公開URL
#[test]
fn test_public_url() {
    let url = client("https://abc.supabase.co").public_url("user-1/5.jpg");
    assert_eq!(url, "https://abc.supabase.co/storage/v1/object/public/pet-images/user-1/5.jpg");
}

/// DB: プロフィール行を挿入
#[tokio::test]
async fn test_insert_profile() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/pets")
        .match_header("authorization", "Bearer session-token")
        .match_header("prefer", "return=minimal")
        .match_body(Matcher::PartialJson(json!({
            "user_id": "user-1",
            "name": "Hachi",
            "gender": "unknown",
            "image_url": null
        })))
        .with_status(201)
        .create_async()
        .await;

    let row = ProfileRow {
        user_id: "user-1".to_string(),
        name: "Hachi".to_string(),
        gender: "unknown".to_string(),
        ..Default::default()
    };

    client(&server.url())
        .insert_profile(&session(), &row)
        .await
        .expect("挿入失敗");

    mock.assert_async().await;
}

/// DB: トークンがない場合はanonキーで認可
#[tokio::test]
async fn test_insert_profile_without_token_uses_anon_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/pets")
        .match_header("authorization", "Bearer anon-key")
        .with_status(401)
        .with_body(r#"{"message": "new row violates row-level security policy"}"#)
        .create_async()
        .await;

    let mut no_token = session();
    no_token.access_token = None;

    let result = client(&server.url())
        .insert_profile(&no_token, &ProfileRow::default())
        .await;

    mock.assert_async().await;
    assert_eq!(
        result,
        Err(ServiceError::rejected(Some(401), "new row violates row-level security policy"))
    );
}
