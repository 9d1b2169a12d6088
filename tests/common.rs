use std::collections::HashMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use emc_academy::{
    Config,
    auth::{UserClaims, generate_token},
    build_server_with_model,
    model::ModelManager,
    web::middlewares::AUTH_TOKEN,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_cookies::Cookie;

/// Every server gets its own in-memory store, so flows never see each other.
pub async fn setup_server() -> TestServer {
    let mm = ModelManager::memory().await.unwrap();
    let server = build_server_with_model(mm).await.unwrap().1;
    TestServer::new(server).unwrap()
}

/// Identity token as the external provider would issue it.
pub async fn token_for(sub: &str, name: &str, email: &str) -> String {
    let config = Config::get_or_init(true).await;
    let claims = UserClaims::new(sub, name, email, Duration::hours(1));
    generate_token(&claims, config.app().jwt()).unwrap()
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub sub: &'static str,
    pub name: &'static str,
    pub email: &'static str,
}

pub const ANN: Identity = Identity {
    sub: "user-ann",
    name: "Ann Lee",
    email: "ann@example.com",
};

pub const BOB: Identity = Identity {
    sub: "user-bob",
    name: "Bob Stone",
    email: "bob@example.com",
};

/// Listed in `admin_emails` of the development config.
pub const ADMIN: Identity = Identity {
    sub: "user-admin",
    name: "Admin",
    email: "admin@emc.uz",
};

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    #[allow(unused)]
    pub fn get_json<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned,
    {
        let obj = self.get(key);
        let de: T = serde_json::from_value(obj.clone()).expect("Invalid json format");
        de
    }
}

pub struct Action {
    #[allow(unused)]
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub dyn_path: Option<Box<dyn Fn(&FlowContext) -> String + Send + Sync>>,
    pub body: Option<Value>,
    pub dyn_body: Option<Box<dyn Fn(&FlowContext) -> Value + Send + Sync>>,
    pub expect: StatusCode,
    pub identity: Option<Identity>,
    pub raw_token: Option<String>,
    pub query_params: Vec<(String, String)>,
    pub body_asserts: Vec<Box<dyn Fn(&Value) + Send + Sync>>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: &str) -> Self {
        Self {
            name,
            method,
            path: path.to_string(),
            dyn_path: None,
            body: None,
            dyn_body: None,
            expect: StatusCode::OK,
            identity: None,
            raw_token: None,
            query_params: vec![],
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    /// Sends the request with an identity cookie for `identity`.
    pub fn as_user(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[allow(unused)]
    pub fn with_raw_token<S: Into<String>>(mut self, token: S) -> Self {
        self.raw_token = Some(token.into());
        self
    }

    #[allow(unused)]
    pub fn with_param(mut self, key: &str, val: &str) -> Self {
        self.query_params
            .push((String::from(key), String::from(val)));
        self
    }

    #[allow(unused)]
    pub fn with_dyn_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> String + Send + Sync + 'static,
    {
        self.dyn_path = Some(Box::new(f));
        self
    }

    #[allow(unused)]
    pub fn with_dyn_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> Value + Send + Sync + 'static,
    {
        self.dyn_body = Some(Box::new(f));
        self
    }

    #[allow(unused)]
    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &mut TestServer) {
        let mut ctx = FlowContext::new(); // create new context for this flow
        server.do_not_save_cookies();

        for action in self.actions {
            println!("==> Running test action `{}`", action.name);

            let path = if let Some(dyn_path_fn) = action.dyn_path {
                dyn_path_fn(&ctx)
            } else {
                action.path.clone()
            };

            let mut req = match action.method {
                "GET" => server.get(&path),
                "POST" => server.post(&path),
                "PUT" => server.put(&path),
                "DELETE" => server.delete(&path),
                _ => panic!("unsupported method {}", action.method),
            };

            let token = match (action.raw_token, action.identity) {
                (Some(raw), _) => Some(raw),
                (_, Some(id)) => Some(token_for(id.sub, id.name, id.email).await),
                _ => None,
            };
            if let Some(token) = token {
                req = req.add_cookie(Cookie::new(AUTH_TOKEN, token));
            }

            match (action.dyn_body, action.body) {
                (Some(f), _) => {
                    req = req.json(&f(&ctx));
                }
                (_, Some(json)) => req = req.json(&json),
                _ => {}
            }

            for (k, v) in action.query_params {
                req = req.add_query_param(&k, v);
            }

            let resp = req.await;
            resp.assert_status(action.expect);

            if !action.body_asserts.is_empty() {
                let body = resp.json::<Value>();
                for check in action.body_asserts {
                    check(&body);
                }
            }

            if let Some(save_key) = action.save_as {
                let body = resp.json::<Value>();
                ctx.store(save_key, body);
            }
        }
    }
}

// Common actions builders

pub fn enroll_action(identity: Identity, course_id: &str) -> Action {
    Action::new("enroll", "POST", &format!("/api/v1/courses/{course_id}/enroll")).as_user(identity)
}

pub fn lesson_done_action(identity: Identity, course_id: &str, lesson_id: &str) -> Action {
    Action::new(
        "lesson_done",
        "POST",
        &format!("/api/v1/courses/{course_id}/lessons/{lesson_id}/done"),
    )
    .as_user(identity)
}

pub fn submit_action(identity: Identity, course_id: &str, answers: Value) -> Action {
    Action::new("quiz_submit", "POST", &format!("/api/v1/quiz/{course_id}/submit"))
        .as_user(identity)
        .with_body(serde_json::json!({ "answers": answers }))
}
