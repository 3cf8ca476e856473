use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::Role;
use career_service::career_path::service::CareerPathService;
use career_service::domain::user::models::UserId;
use career_service::domain::user::models::UserUpdate;
use career_service::domain::user::ports::UserRepository;
use career_service::domain::user::service::UserService;
use career_service::inbound::http::router::create_router;
use career_service::outbound::repositories::InMemoryStore;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryStore::new());
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));
        let store_timeout = Duration::from_secs(5);

        let user_service = Arc::new(UserService::new(
            Arc::clone(&store),
            Arc::clone(&authenticator),
            store_timeout,
        ));
        let career_path_service =
            Arc::new(CareerPathService::new(Arc::clone(&store), store_timeout));

        let router = create_router(user_service, career_path_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            authenticator,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an identity and return its token.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Identity ID carried by a token issued by this app.
    pub fn user_id(&self, token: &str) -> UserId {
        let claims = self.authenticator.verify_token(token).expect("Invalid token");
        UserId::from_string(&claims.sub).expect("Invalid subject")
    }

    /// Register an identity and promote it to admin directly through the store.
    pub async fn register_admin(&self, email: &str) -> String {
        let token = self.register("Admin", email, "admin-secret").await;
        self.store
            .update(&self.user_id(&token), UserUpdate::role(Role::Admin))
            .await
            .expect("Failed to promote admin");
        token
    }

    /// Create a career path for the token's owner and return its ID.
    pub async fn create_career_path(&self, token: &str, title: &str) -> String {
        let response = self
            .post_authenticated("/api/career-paths", token)
            .json(&json!({
                "title": title,
                "description": "A path worth following",
                "required_skills": ["communication"]
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().expect("Missing id").to_string()
    }
}
