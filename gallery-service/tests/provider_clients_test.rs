//! HTTP-level tests for the OpenAI and Cloudinary clients against mock servers.

use gallery_service::config::{CloudinaryConfig, OpenAiConfig};
use gallery_service::services::providers::cloudinary::{sign_params, CloudinaryAssetHost};
use gallery_service::services::providers::openai::OpenAiImageGenerator;
use gallery_service::services::{AssetHost, ImageGenerator, ProviderError};
use secrecy::Secret;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_config(api_base: String) -> OpenAiConfig {
    OpenAiConfig {
        api_key: Secret::new("sk-test".to_string()),
        image_model: "dall-e-3".to_string(),
        api_base,
    }
}

fn cloudinary_config(api_base: String) -> CloudinaryConfig {
    CloudinaryConfig {
        cloud_name: "demo-cloud".to_string(),
        api_key: "123456".to_string(),
        api_secret: Secret::new("cloud-secret".to_string()),
        folder: "ai-art-work".to_string(),
        api_base,
    }
}

#[tokio::test]
async fn openai_requests_one_square_image_and_returns_revised_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "dall-e-3",
            "prompt": "a red kite over dunes",
            "n": 1,
            "size": "1024x1024"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{
                "url": "https://oaidalle.example/img-1.png",
                "revised_prompt": "A vivid red kite soaring over golden sand dunes"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiImageGenerator::new(openai_config(server.uri())).unwrap();
    let image = generator.generate("a red kite over dunes").await.unwrap();

    assert_eq!(image.url, "https://oaidalle.example/img-1.png");
    assert_eq!(
        image.revised_prompt.as_deref(),
        Some("A vivid red kite soaring over golden sand dunes")
    );
}

#[tokio::test]
async fn openai_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "Your request was rejected by the safety system.",
                "type": "invalid_request_error",
                "code": "content_policy_violation"
            }
        })))
        .mount(&server)
        .await;

    let generator = OpenAiImageGenerator::new(openai_config(server.uri())).unwrap();
    let err = generator.generate("something").await.unwrap_err();

    match err {
        ProviderError::ApiError(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("rejected by the safety system"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn openai_rate_limit_is_distinguished() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let generator = OpenAiImageGenerator::new(openai_config(server.uri())).unwrap();
    let err = generator.generate("something").await.unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn openai_empty_data_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "created": 1, "data": [] })),
        )
        .mount(&server)
        .await;

    let generator = OpenAiImageGenerator::new(openai_config(server.uri())).unwrap();
    let err = generator.generate("something").await.unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse(_)));
}

#[tokio::test]
async fn cloudinary_uploads_remote_url_into_folder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/upload"))
        .and(body_string_contains("folder=ai-art-work"))
        .and(body_string_contains("api_key=123456"))
        .and(body_string_contains("signature_algorithm=sha256"))
        .and(body_string_contains("signature="))
        .and(body_string_contains(
            "file=https%3A%2F%2Foaidalle.example%2Fimg-1.png",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset_id": "b5e6d2b39ba3e0869d67141ba7dba6cf",
            "public_id": "ai-art-work/kp3hvuq1",
            "secure_url": "https://res.cloudinary.example/demo-cloud/image/upload/ai-art-work/kp3hvuq1.png",
            "format": "png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let host = CloudinaryAssetHost::new(cloudinary_config(server.uri())).unwrap();
    let asset = host
        .upload_from_url("https://oaidalle.example/img-1.png")
        .await
        .unwrap();

    assert_eq!(asset.public_id, "ai-art-work/kp3hvuq1");
    assert!(asset.secure_url.ends_with("kp3hvuq1.png"));
}

/// Form fields of a urlencoded body. Only used for fields that need no decoding.
fn form_fields(body: &[u8]) -> HashMap<String, String> {
    String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn cloudinary_signature_covers_sent_folder_and_timestamp() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "ai-art-work/abc",
            "secure_url": "https://res.cloudinary.example/ai-art-work/abc.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let host = CloudinaryAssetHost::new(cloudinary_config(server.uri())).unwrap();
    host.upload_from_url("https://oaidalle.example/img-2.png")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let fields = form_fields(&requests[0].body);

    let folder = &fields["folder"];
    let timestamp = &fields["timestamp"];
    assert_eq!(folder, "ai-art-work");
    assert!(timestamp.parse::<i64>().is_ok());

    let expected = sign_params(
        &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
        "cloud-secret",
    );
    assert_eq!(fields["signature"], expected);
    assert_eq!(fields["signature"].len(), 64);
}

#[tokio::test]
async fn cloudinary_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo-cloud/image/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid Signature 3f1c. String to sign - 'folder=ai-art-work&timestamp=1'." }
        })))
        .mount(&server)
        .await;

    let host = CloudinaryAssetHost::new(cloudinary_config(server.uri())).unwrap();
    let err = host
        .upload_from_url("https://oaidalle.example/img-1.png")
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(msg) => assert!(msg.contains("Invalid Signature")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let generator =
        OpenAiImageGenerator::new(openai_config("http://127.0.0.1:1".to_string())).unwrap();
    let err = generator.generate("something").await.unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}
