use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use warp::http::StatusCode;

use super::routes::routes;
use super::types::{ApiError, MessageResponse};
use crate::error_handling::types::{RegistrationError, StorageError};
use crate::storage::{ActivityCatalog, ActivityDetails, ActivityStore, DatabaseStorage};

async fn seeded_store() -> Arc<dyn ActivityStore> {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("web.sqlite3");
    Box::leak(Box::new(dir));
    let storage = DatabaseStorage::connect(&format!("sqlite://{}?mode=rwc", path.display()), 5)
        .await
        .unwrap();
    storage.bootstrap().await.unwrap();
    Arc::new(storage)
}

fn body<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

/// Store whose backend is always down.
struct FailingStore;

#[async_trait]
impl ActivityStore for FailingStore {
    async fn list_activities(&self) -> Result<ActivityCatalog, StorageError> {
        Err(StorageError::ReadFailed)
    }

    async fn signup(&self, _: &str, _: &str) -> Result<(), RegistrationError> {
        Err(StorageError::WriteFailed.into())
    }

    async fn unregister(&self, _: &str, _: &str) -> Result<(), RegistrationError> {
        Err(StorageError::WriteFailed.into())
    }
}

async fn participant_count(store: &Arc<dyn ActivityStore>, activity: &str) -> usize {
    let filter = routes(store.clone());
    let res = warp::test::request()
        .method("GET")
        .path("/activities")
        .reply(&filter)
        .await;
    let catalog: std::collections::HashMap<String, ActivityDetails> = body(res.body());
    catalog[activity].participants.len()
}

#[tokio::test]
async fn test_root_redirects_to_front_end() {
    let filter = routes(seeded_store().await);
    let res = warp::test::request().path("/").reply(&filter).await;

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/static/index.html");
}

#[tokio::test]
async fn test_list_activities() {
    let filter = routes(seeded_store().await);
    let res = warp::test::request()
        .method("GET")
        .path("/activities")
        .reply(&filter)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let catalog: serde_json::Value = body(res.body());
    let activities = catalog.as_object().unwrap();
    assert_eq!(activities.len(), 9);

    let chess = &catalog["Chess Club"];
    assert_eq!(chess["description"], "Learn strategies and compete in chess tournaments");
    assert_eq!(chess["schedule"], "Fridays, 3:30 PM - 5:00 PM");
    assert_eq!(chess["max_participants"], 12);
    assert_eq!(
        chess["participants"],
        serde_json::json!(["michael@mergington.edu", "daniel@mergington.edu"])
    );
}

#[tokio::test]
async fn test_signup_and_unregister_round() {
    let store = seeded_store().await;
    let filter = routes(store.clone());
    let signup = "/activities/Chess%20Club/signup?email=newstudent%40mergington.edu";
    let unregister = "/activities/Chess%20Club/unregister?email=newstudent%40mergington.edu";

    let res = warp::test::request().method("POST").path(signup).reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);
    let message: MessageResponse = body(res.body());
    assert_eq!(message.message, "Signed up newstudent@mergington.edu for Chess Club");
    assert_eq!(participant_count(&store, "Chess Club").await, 3);

    let res = warp::test::request().method("POST").path(signup).reply(&filter).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Student is already signed up");
    assert_eq!(participant_count(&store, "Chess Club").await, 3);

    let res = warp::test::request()
        .method("DELETE")
        .path(unregister)
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let message: MessageResponse = body(res.body());
    assert_eq!(message.message, "Unregistered newstudent@mergington.edu from Chess Club");
    assert_eq!(participant_count(&store, "Chess Club").await, 2);

    let res = warp::test::request()
        .method("DELETE")
        .path(unregister)
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Student is not signed up for this activity");
    assert_eq!(participant_count(&store, "Chess Club").await, 2);
}

#[tokio::test]
async fn test_signup_full_activity() {
    let store = seeded_store().await;
    let filter = routes(store.clone());

    // Math Club: capacity 10, 2 seeded
    for i in 0..8 {
        let res = warp::test::request()
            .method("POST")
            .path(&format!("/activities/Math%20Club/signup?email=s{}@mergington.edu", i))
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = warp::test::request()
        .method("POST")
        .path("/activities/Math%20Club/signup?email=late@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Activity is full");
    assert_eq!(participant_count(&store, "Math Club").await, 10);
}

#[tokio::test]
async fn test_unknown_activity_and_user() {
    let filter = routes(seeded_store().await);

    let res = warp::test::request()
        .method("POST")
        .path("/activities/Knitting/signup?email=a@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Activity not found");

    let res = warp::test::request()
        .method("DELETE")
        .path("/activities/Knitting/unregister?email=a@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Activity not found");

    let res = warp::test::request()
        .method("DELETE")
        .path("/activities/Gym%20Class/unregister?email=ghost@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "User not found");
}

#[tokio::test]
async fn test_missing_email_and_wrong_method() {
    let filter = routes(seeded_store().await);

    let res = warp::test::request()
        .method("POST")
        .path("/activities/Chess%20Club/signup")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = warp::test::request()
        .method("GET")
        .path("/activities/Chess%20Club/signup?email=a@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = warp::test::request()
        .method("GET")
        .path("/nowhere")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Not Found");
}

#[tokio::test]
async fn test_static_assets() {
    let filter = routes(seeded_store().await);

    let res = warp::test::request()
        .path("/static/index.html")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(String::from_utf8_lossy(res.body()).contains("Mergington High School"));

    let res = warp::test::request().path("/static/app.js").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = warp::test::request()
        .path("/static/missing.css")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failures_surface_as_500() {
    let filter = routes(Arc::new(FailingStore));

    let res = warp::test::request().path("/activities").reply(&filter).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = warp::test::request()
        .method("POST")
        .path("/activities/Chess%20Club/signup?email=a@mergington.edu")
        .reply(&filter)
        .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ApiError = body(res.body());
    assert_eq!(error.detail, "Internal storage error");
}
