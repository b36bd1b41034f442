use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    test, web, App, Error,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use gemini_client::{GeminiError, GeneratedImage, ImageModelClient};
use serde_json::{json, Value};
use style_service::server::{app_config, AppState};
use style_service::storage::{ImageStore, PersistenceMode};
use tempfile::TempDir;

fn png_fixture() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

enum MockBehavior {
    Image { data: Vec<u8>, mime_type: String },
    NoImage,
    Unreachable,
}

struct MockImageClient {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockImageClient {
    fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(MockImageClient {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModelClient for MockImageClient {
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, GeminiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Image { data, mime_type } => Ok(GeneratedImage {
                data: data.clone(),
                mime_type: mime_type.clone(),
                image_id: "aaaa1111-bbbb-2222-cccc-333344445555".to_string(),
            }),
            MockBehavior::NoImage => Err(GeminiError::NoImage),
            MockBehavior::Unreachable => {
                Err(GeminiError::Transport("connection refused".to_string()))
            }
        }
    }
}

async fn setup_test_environment(
    behavior: MockBehavior,
    mode: PersistenceMode,
) -> (
    impl Service<Request, Response = ServiceResponse, Error = Error>,
    Arc<MockImageClient>,
    TempDir,
) {
    let data_dir = tempfile::tempdir().unwrap();
    let image_store = ImageStore::new(data_dir.path(), mode);
    image_store.init().await.unwrap();

    let image_client = MockImageClient::new(behavior);
    let app_state = web::Data::new(AppState {
        image_client: image_client.clone(),
        image_store,
        model: "test-image-model".to_string(),
    });

    let app =
        test::init_service(App::new().app_data(app_state.clone()).configure(app_config)).await;
    (app, image_client, data_dir)
}

fn two_items() -> Value {
    json!({
        "selectedItems": [
            {
                "name": "Silk Blouse",
                "category": "Tops",
                "color": "Ivory",
                "theme": "Elegant",
                "description": "A flowing silk blouse."
            },
            {
                "name": "Wide-Leg Trousers",
                "category": "Bottoms",
                "color": "Ivory",
                "theme": "Elegant",
                "description": "High-waisted trousers."
            }
        ]
    })
}

#[actix_web::test]
async fn generate_style_returns_embedded_image() {
    let png = png_fixture();
    let (app, client, _dir) = setup_test_environment(
        MockBehavior::Image {
            data: png.clone(),
            mime_type: "image/png".to_string(),
        },
        PersistenceMode::SingleSlot,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(two_items())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["image_data"]["mime_type"], json!("image/png"));
    assert_eq!(body["image_data"]["image_id"], json!("recent"));
    assert_eq!(body["image_data"]["filename"], json!("recent.png"));
    assert_eq!(body["image_url"], json!("/recent-image"));

    let decoded = BASE64
        .decode(body["image_data"]["base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded, png);

    let analysis = &body["style_analysis"];
    assert_eq!(analysis["total_items"], json!(2));
    assert_eq!(analysis["dominant_colors"], json!(["Ivory"]));
    assert_eq!(analysis["style_themes"], json!(["Elegant"]));
    assert_eq!(
        analysis["items_used"],
        json!(["Silk Blouse", "Wide-Leg Trousers"])
    );
    assert_eq!(client.call_count(), 1);
}

#[actix_web::test]
async fn generate_style_per_request_mode_uses_generation_id() {
    let png = png_fixture();
    let (app, _client, _dir) = setup_test_environment(
        MockBehavior::Image {
            data: png.clone(),
            mime_type: "image/png".to_string(),
        },
        PersistenceMode::PerRequest,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(two_items())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let image_id = body["image_data"]["image_id"].as_str().unwrap();
    assert_eq!(image_id, "aaaa1111-bbbb-2222-cccc-333344445555");
    assert_eq!(
        body["image_url"],
        json!(format!("/generated-image/{image_id}"))
    );

    // The freshly stored image must be fetchable through its id
    let req = test::TestRequest::get()
        .uri(&format!("/generated-image/{image_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let served = test::read_body(resp).await;
    assert_eq!(served.to_vec(), png);
}

#[actix_web::test]
async fn missing_selected_items_is_rejected_without_upstream_call() {
    let (app, client, _dir) =
        setup_test_environment(MockBehavior::NoImage, PersistenceMode::SingleSlot).await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(json!({ "somethingElse": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("selectedItems"));
    assert_eq!(client.call_count(), 0);
}

#[actix_web::test]
async fn non_array_selected_items_is_rejected_without_upstream_call() {
    let (app, client, _dir) =
        setup_test_environment(MockBehavior::NoImage, PersistenceMode::SingleSlot).await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(json!({ "selectedItems": "a scarf" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(client.call_count(), 0);
}

#[actix_web::test]
async fn empty_selected_items_is_rejected_without_upstream_call() {
    let (app, client, _dir) =
        setup_test_environment(MockBehavior::NoImage, PersistenceMode::SingleSlot).await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(json!({ "selectedItems": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    assert_eq!(client.call_count(), 0);
}

#[actix_web::test]
async fn text_only_model_output_is_a_500_generation_failure() {
    let (app, client, _dir) =
        setup_test_environment(MockBehavior::NoImage, PersistenceMode::SingleSlot).await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(two_items())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("generate"));
    assert_eq!(client.call_count(), 1);
}

#[actix_web::test]
async fn unreachable_upstream_is_a_500_without_image_data() {
    let (app, _client, _dir) =
        setup_test_environment(MockBehavior::Unreachable, PersistenceMode::SingleSlot).await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(two_items())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body.get("image_data").is_none());
}

#[actix_web::test]
async fn undecodable_model_output_is_a_storage_error() {
    let (app, _client, _dir) = setup_test_environment(
        MockBehavior::Image {
            data: b"definitely not an image".to_vec(),
            mime_type: "image/png".to_string(),
        },
        PersistenceMode::SingleSlot,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/generate-style")
        .set_json(two_items())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    // Nothing may have been written for the failed request
    let req = test::TestRequest::get().uri("/recent-image").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
