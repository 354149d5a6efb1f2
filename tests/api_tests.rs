use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use fleet_admin::models::car::{Car, CarFields, CarStats, CarStatus};
use fleet_admin::repositories::CarStore;
use fleet_admin::routes::create_app_router;
use fleet_admin::services::{AuthConfig, SessionGate};
use fleet_admin::state::AppState;
use fleet_admin::utils::errors::{CarOperation, CarServiceError};
use fleet_admin::utils::validation::FormVariant;

const ADMIN_PASSWORD: &str = "admin123";

/// Almacén en memoria para no depender de PostgreSQL
#[derive(Default)]
struct MemoryStore {
    cars: Mutex<Vec<Car>>,
    broken: bool,
}

impl MemoryStore {
    fn with_cars(cars: Vec<Car>) -> Self {
        Self {
            cars: Mutex::new(cars),
            broken: false,
        }
    }

    fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    fn check(&self, operation: CarOperation) -> Result<(), CarServiceError> {
        if self.broken {
            return Err(CarServiceError::new(operation, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CarStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Car>, CarServiceError> {
        self.check(CarOperation::Fetch)?;
        Ok(self.cars.lock().unwrap().clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Car>, CarServiceError> {
        self.check(CarOperation::Fetch)?;
        Ok(self.cars.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, fields: CarFields) -> Result<Car, CarServiceError> {
        self.check(CarOperation::Create)?;
        let car = build_car(Uuid::new_v4(), fields, Utc::now());
        self.cars.lock().unwrap().insert(0, car.clone());
        Ok(car)
    }

    async fn update(&self, id: Uuid, fields: CarFields) -> Result<Car, CarServiceError> {
        self.check(CarOperation::Update)?;
        let mut cars = self.cars.lock().unwrap();
        let slot = cars
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CarServiceError::new(CarOperation::Update, "no rows returned"))?;
        *slot = build_car(id, fields, slot.created_at);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CarServiceError> {
        self.check(CarOperation::Delete)?;
        let mut cars = self.cars.lock().unwrap();
        let before = cars.len();
        cars.retain(|c| c.id != id);
        Ok(cars.len() < before)
    }

    async fn stats(&self) -> Result<CarStats, CarServiceError> {
        self.check(CarOperation::Stats)?;
        let cars = self.cars.lock().unwrap();
        Ok(CarStats::from_rates(cars.iter().map(|c| (c.status, c.daily_rate))))
    }
}

fn build_car(id: Uuid, fields: CarFields, created_at: chrono::DateTime<Utc>) -> Car {
    Car {
        id,
        make: fields.make,
        model: fields.model,
        year: fields.year,
        color: fields.color,
        license_plate: fields.license_plate,
        daily_rate: fields.daily_rate,
        status: fields.status,
        mileage: fields.mileage,
        fuel_type: fields.fuel_type,
        transmission: fields.transmission,
        created_at,
        updated_at: created_at,
    }
}

fn sample_car(make: &str, year: i32, rate: i64, age_minutes: i64) -> Car {
    build_car(
        Uuid::new_v4(),
        CarFields {
            make: make.to_string(),
            model: "Model".to_string(),
            year,
            color: "Black".to_string(),
            license_plate: format!("{}-{}", make.to_uppercase(), year),
            daily_rate: Decimal::from(rate),
            status: CarStatus::Available,
            mileage: None,
            fuel_type: None,
            transmission: None,
        },
        Utc::now() - Duration::minutes(age_minutes),
    )
}

fn create_test_app(store: Arc<dyn CarStore>) -> Router {
    let config = AuthConfig::new(vec![ADMIN_PASSWORD.to_string()]).unwrap();
    create_app_router(AppState::new(store, SessionGate::new(config), FormVariant::Standard))
}

fn session_cookie() -> String {
    let gate = SessionGate::new(AuthConfig::new(vec![ADMIN_PASSWORD.to_string()]).unwrap());
    format!("admin_session={}", gate.login(ADMIN_PASSWORD).unwrap())
}

fn request(method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(request("POST", "/api/auth/login", Some(json!({ "password": ADMIN_PASSWORD })), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains(ADMIN_PASSWORD));
    assert_eq!(json_body(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(request("POST", "/api/auth/login", Some(json!({ "password": "nope" })), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(json_body(response).await["error"], "Invalid password");
}

#[tokio::test]
async fn test_login_without_password() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(request("POST", "/api/auth/login", Some(json!({})), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Password is required");
}

#[tokio::test]
async fn test_login_with_unreadable_body() {
    let app = create_test_app(Arc::new(MemoryStore::default()));

    let not_json = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("password=admin123"))
        .unwrap();
    let response = app.clone().oneshot(not_json).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Password is required");

    let response = app
        .oneshot(request("POST", "/api/auth/login", Some(json!({ "password": 1234 })), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(json_body(response).await["error"], "Password is required");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let response = app
        .oneshot(request("POST", "/api/auth/logout", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let app = create_test_app(Arc::new(MemoryStore::default()));

    for cookie in [None, Some("admin_session=authenticated")] {
        let response = app
            .clone()
            .oneshot(request("GET", "/dashboard/cars", None, cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }
}

#[tokio::test]
async fn test_login_page_redirects_when_authenticated() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let cookie = session_cookie();

    let response = app
        .clone()
        .oneshot(request("GET", "/login", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/dashboard");

    let response = app.oneshot(request("GET", "/login", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_cars_sorted_by_rate() {
    let store = MemoryStore::with_cars(vec![
        sample_car("Toyota", 2022, 65, 1),
        sample_car("BMW", 2024, 120, 2),
        sample_car("Honda", 2020, 55, 3),
    ]);
    let app = create_test_app(Arc::new(store));
    let cookie = session_cookie();

    let response = app
        .clone()
        .oneshot(request("GET", "/dashboard/cars?sort=dailyRate&direction=ascending", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let makes: Vec<&str> = body["cars"].as_array().unwrap().iter().map(|c| c["make"].as_str().unwrap()).collect();
    assert_eq!(makes, vec!["Honda", "Toyota", "BMW"]);
    assert_eq!(body["sort"]["column"], "dailyRate");
    assert_eq!(body["sortableColumns"], json!(["year", "dailyRate"]));

    // Sin ordenación se mantiene el orden del almacén
    let response = app
        .oneshot(request("GET", "/dashboard/cars", None, Some(&cookie)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["cars"][0]["make"], "Toyota");
}

#[tokio::test]
async fn test_list_cars_rejects_non_sortable_column() {
    let app = create_test_app(Arc::new(MemoryStore::default()));
    let cookie = session_cookie();

    let response = app
        .oneshot(request("GET", "/dashboard/cars?sort=color", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_car_with_invalid_form() {
    let store = Arc::new(MemoryStore::default());
    let app = create_test_app(store.clone());
    let cookie = session_cookie();

    let response = app
        .oneshot(request(
            "POST",
            "/dashboard/cars/add",
            Some(json!({ "make": "T", "year": 1985, "dailyRate": "0" })),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["fields"]["make"], "Make must be at least 2 characters");
    assert_eq!(body["fields"]["dailyRate"], "Daily rate must be a positive number");
    assert!(body["fields"]["year"].as_str().unwrap().starts_with("Year must be between 1990 and "));
    assert!(store.cars.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_car_success() {
    let store = Arc::new(MemoryStore::default());
    let app = create_test_app(store.clone());
    let cookie = session_cookie();

    let response = app
        .oneshot(request(
            "POST",
            "/dashboard/cars/add",
            Some(json!({
                "make": "Toyota",
                "model": "Camry",
                "year": "2024",
                "color": "Silver",
                "licensePlate": "ABC-1234",
                "dailyRate": "65.50"
            })),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["year"], 2024);
    assert_eq!(body["data"]["status"], "available");
    assert_eq!(store.cars.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_store_failure_returns_fixed_message() {
    let app = create_test_app(Arc::new(MemoryStore::broken()));
    let cookie = session_cookie();

    let response = app
        .clone()
        .oneshot(request("GET", "/dashboard/cars", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to load cars. Please refresh the page.");
    assert!(!body.to_string().contains("connection refused"));

    let response = app
        .oneshot(request("GET", "/dashboard", None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await["error"],
        "Failed to load statistics. Please refresh the page."
    );
}

#[tokio::test]
async fn test_edit_and_delete_car() {
    let car = sample_car("Honda", 2020, 55, 1);
    let id = car.id;
    let store = Arc::new(MemoryStore::with_cars(vec![car]));
    let app = create_test_app(store.clone());
    let cookie = session_cookie();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/dashboard/cars/{}/edit", id),
            Some(json!({
                "make": "Honda",
                "model": "Civic",
                "year": 2021,
                "color": "Red",
                "licensePlate": "HON-2021",
                "dailyRate": 60,
                "status": "maintenance"
            })),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["status"], "maintenance");

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/dashboard/cars/{}", id), None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", &format!("/dashboard/cars/{}", id), None, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
