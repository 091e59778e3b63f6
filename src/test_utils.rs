#[cfg(test)]
pub mod test_helpers {
    use std::collections::{HashMap, HashSet};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex, MutexGuard};

    use axum::body::Bytes;
    use axum::{Json, Router};
    use axum::extract::{Path, State};
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::routing::any;
    use serde_json::{Map, Value, json};

    use crate::EntityKind;
    use crate::api::LoanApi;

    /// A request as the fake server saw it.  `path` is relative to the API root and
    /// still percent-encoded.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: String,
        pub path: String,
        pub body: Option<Value>,
    }

    #[derive(Debug, Clone)]
    struct User {
        password: String,
        name: String,
        email: String,
        answers: (String, String),
    }

    #[derive(Debug)]
    struct FakeState {
        tables: HashMap<EntityKind, Vec<Value>>,
        next_id: i64,
        journal: Vec<RecordedRequest>,
        failures: HashSet<(String, String)>,
        canned: HashMap<String, Value>,
        users: HashMap<String, User>,
    }

    impl Default for FakeState {
        fn default() -> Self {
            let mut users = HashMap::new();
            users.insert(
                "admin".to_string(),
                User {
                    password: "Secret#123".to_string(),
                    name: "Administrator".to_string(),
                    email: "admin@lender.co.ke".to_string(),
                    answers: ("blue".to_string(), "rex".to_string()),
                },
            );
            Self {
                tables: HashMap::new(),
                next_id: 1000,
                journal: Vec::new(),
                failures: HashSet::new(),
                canned: HashMap::new(),
                users,
            }
        }
    }

    type Shared = Arc<Mutex<FakeState>>;

    /// An in-process stand-in for the loan-management API, served on an ephemeral port.
    pub struct FakeApi {
        addr: SocketAddr,
        state: Shared,
    }

    impl FakeApi {
        /// Binds the fake to `127.0.0.1:0` and serves it in the background.
        pub async fn start() -> Self {
            let state: Shared = Arc::default();
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind fake api");
            let addr = listener.local_addr().expect("fake api address");
            let router = router(Arc::clone(&state));
            tokio::spawn(async move {
                axum::serve(listener, router).await.ok();
            });
            Self { addr, state }
        }

        /// Base URL of the fake, including the `/api` root.
        pub fn base_url(&self) -> String {
            format!("http://{}/api", self.addr)
        }

        /// A client pointed at the fake.
        pub fn api(&self) -> LoanApi {
            LoanApi::new(&self.base_url()).expect("fake api url")
        }

        /// Replaces the records of `kind`.
        pub fn seed(&self, kind: EntityKind, records: Vec<Value>) {
            self.lock().tables.insert(kind, records);
        }

        /// The records of `kind` the fake currently holds.
        pub fn records(&self, kind: EntityKind) -> Vec<Value> {
            self.lock().tables.get(&kind).cloned().unwrap_or_default()
        }

        /// Makes `method path` answer 500 until [`FakeApi::heal`].
        pub fn fail(&self, method: &str, path: &str) {
            self.lock()
                .failures
                .insert((method.to_string(), path.to_string()));
        }

        /// Removes every forced failure.
        pub fn heal(&self) {
            self.lock().failures.clear();
        }

        /// Answers `GET path` with `body`.
        pub fn respond(&self, path: &str, body: Value) {
            self.lock().canned.insert(path.to_string(), body);
        }

        /// Every request received so far.
        pub fn journal(&self) -> Vec<RecordedRequest> {
            self.lock().journal.clone()
        }

        /// Forgets the requests received so far.
        pub fn clear_journal(&self) {
            self.lock().journal.clear();
        }

        fn lock(&self) -> MutexGuard<'_, FakeState> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    /// The fake's routes, for driving it directly with `axum_test`.
    fn router(state: Shared) -> Router {
        Router::new()
            .route("/api/*rest", any(handle))
            .with_state(state)
    }

    async fn handle(
        State(state): State<Shared>,
        method: Method,
        uri: Uri,
        Path(rest): Path<String>,
        body: Bytes,
    ) -> Response {
        let raw_path = uri
            .path()
            .strip_prefix("/api/")
            .unwrap_or(uri.path())
            .to_string();
        let body: Option<Value> = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(&body).ok()
        };
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        state.journal.push(RecordedRequest {
            method: method.to_string(),
            path: raw_path.clone(),
            body: body.clone(),
        });
        if state
            .failures
            .contains(&(method.to_string(), raw_path.clone()))
        {
            return (StatusCode::INTERNAL_SERVER_ERROR, "forced failure").into_response();
        }
        if method == Method::GET {
            if let Some(canned) = state.canned.get(&raw_path) {
                return Json(canned.clone()).into_response();
            }
        }
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        route(&mut state, &method, &segments, body.unwrap_or(Value::Null))
    }

    fn route(state: &mut FakeState, method: &Method, segments: &[&str], body: Value) -> Response {
        match (method.as_str(), segments) {
            ("GET", ["user", "login", username, password]) => login(state, username, password),
            ("POST", ["user", "register"]) => register(state, &body),
            ("POST", ["user", "reset-password"]) => reset_password(state, &body),
            ("GET", ["customers", family, _value]) if family.contains('-') => {
                wrapped(EntityKind::Customer.list_key(), json!([]))
            }
            (_, [path, rest @ ..]) => match EntityKind::from_path(path) {
                Some(kind) => crud(state, kind, method, rest, body),
                None => not_found("No such endpoint"),
            },
            _ => not_found("No such endpoint"),
        }
    }

    fn crud(
        state: &mut FakeState,
        kind: EntityKind,
        method: &Method,
        rest: &[&str],
        mut body: Value,
    ) -> Response {
        let id = match rest {
            [] => None,
            [id] => match id.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => return bad_request("Identifier must be a number"),
            },
            _ => return not_found("No such endpoint"),
        };
        let missing = format!("No {} found", kind.noun());
        let position = |table: &[Value], id: i64| {
            table
                .iter()
                .position(|r| r.get(kind.id_field()).and_then(Value::as_i64) == Some(id))
        };
        match (method.as_str(), id) {
            ("GET", None) => {
                let table = state.tables.get(&kind).cloned().unwrap_or_default();
                wrapped(kind.list_key(), Value::Array(table))
            }
            ("POST", None) => {
                if !body.is_object() || body.get(kind.id_field()).is_some() {
                    return bad_request("Body must be an object without an identifier");
                }
                let id = state.next_id;
                state.next_id += 1;
                body[kind.id_field()] = json!(id);
                state.tables.entry(kind).or_default().push(body.clone());
                let mut reply = Map::new();
                reply.insert(
                    "successMessage".to_string(),
                    json!(format!("{} added", kind.noun())),
                );
                reply.insert(kind.record_key(), body);
                Json(Value::Object(reply)).into_response()
            }
            ("GET", Some(id)) => {
                let table = state.tables.entry(kind).or_default();
                match position(table.as_slice(), id) {
                    Some(at) => wrapped(kind.record_key(), table[at].clone()),
                    None => not_found(&missing),
                }
            }
            ("PUT", Some(id)) => {
                let table = state.tables.entry(kind).or_default();
                let (Some(at), Some(fields)) = (position(table.as_slice(), id), body.as_object())
                else {
                    return not_found(&missing);
                };
                let mut updated = fields.clone();
                updated.insert(kind.id_field().to_string(), json!(id));
                table[at] = Value::Object(updated);
                Json(json!({ "successMessage": format!("{} updated", kind.noun()) }))
                    .into_response()
            }
            ("DELETE", Some(id)) => {
                let table = state.tables.entry(kind).or_default();
                match position(table.as_slice(), id) {
                    Some(at) => {
                        table.remove(at);
                        StatusCode::NO_CONTENT.into_response()
                    }
                    None => not_found(&missing),
                }
            }
            _ => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response(),
        }
    }

    fn login(state: &FakeState, username: &str, password: &str) -> Response {
        match state.users.get(username) {
            Some(user) if user.password == password => {
                Json(json!({"successMessage": "Login successful"})).into_response()
            }
            _ => Json(json!({"failureMessage": "Invalid username or password"})).into_response(),
        }
    }

    fn register(state: &mut FakeState, body: &Value) -> Response {
        let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
        let username = field("userName");
        if state.users.contains_key(&username) {
            return Json(json!({"failureMessage": "Username already exists"})).into_response();
        }
        state.users.insert(
            username,
            User {
                password: field("password"),
                name: field("name"),
                email: field("email"),
                answers: (field("securityAnswer1"), field("securityAnswer2")),
            },
        );
        Json(json!({"successMessage": "User registered"})).into_response()
    }

    fn reset_password(state: &mut FakeState, body: &Value) -> Response {
        let field = |name: &str| body[name].as_str().unwrap_or_default().to_string();
        let Some(user) = state.users.get_mut(&field("userName")) else {
            return Json(json!({"failureMessage": "User not found"})).into_response();
        };
        let answers = (field("securityAnswer1"), field("securityAnswer2"));
        if user.answers != answers || user.email != field("email") || user.name != field("name")
        {
            return Json(json!({"failureMessage": "Security answers do not match"}))
                .into_response();
        }
        user.password = field("newPassword");
        Json(json!({"successMessage": "Password reset"})).into_response()
    }

    fn wrapped(key: String, value: Value) -> Response {
        let mut body = Map::new();
        body.insert(key, value);
        Json(Value::Object(body)).into_response()
    }

    fn not_found(message: &str) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "failureMessage": message })),
        )
            .into_response()
    }

    fn bad_request(message: &str) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "failureMessage": message })),
        )
            .into_response()
    }

    /// Field values of a customer draft that passes validation.
    pub fn valid_customer() -> [(&'static str, &'static str); 9] {
        [
            ("firstName", "Grace"),
            ("lastName", "Wanjiru"),
            ("gender", "F"),
            ("dob", "1990-05-17"),
            ("mobileNumber", "0712345678"),
            ("cityId", "1"),
            ("stateId", "2"),
            ("countryId", "3"),
            ("occupationId", "4"),
        ]
    }

    #[cfg(test)]
    mod tests {
        use axum_test::TestServer;

        use super::*;

        fn server() -> (TestServer, Shared) {
            let state: Shared = Arc::default();
            let server = TestServer::new(router(Arc::clone(&state))).unwrap();
            (server, state)
        }

        #[tokio::test]
        async fn list_wraps_records_in_list_key() {
            let (server, state) = server();
            state.lock().unwrap().tables.insert(
                EntityKind::LoanType,
                vec![json!({"typeId": 1, "typeName": "Home"})],
            );
            let response = server.get("/api/loans-types").await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body, json!({"loansTypeListDTO": [{"typeId": 1, "typeName": "Home"}]}));
        }

        #[tokio::test]
        async fn create_assigns_identifier() {
            let (server, state) = server();
            let response = server
                .post("/api/coverages")
                .json(&json!({"coverageName": "Full"}))
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["coverageDTO"]["coverageId"], json!(1000));
            assert_eq!(state.lock().unwrap().tables[&EntityKind::Coverage].len(), 1);
        }

        #[tokio::test]
        async fn create_with_identifier_is_rejected() {
            let (server, _state) = server();
            let response = server
                .post("/api/coverages")
                .json(&json!({"coverageId": 5, "coverageName": "Full"}))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn missing_record_is_404_with_failure_message() {
            let (server, _state) = server();
            let response = server.get("/api/customers/77").await;
            response.assert_status(StatusCode::NOT_FOUND);
            let body: Value = response.json();
            assert_eq!(body["failureMessage"], json!("No customer found"));
        }

        #[tokio::test]
        async fn login_decodes_path_segments() {
            let (server, state) = server();
            let response = server.get("/api/user/login/admin/Secret%23123").await;
            let body: Value = response.json();
            assert_eq!(body["successMessage"], json!("Login successful"));
            let guard = state.lock().unwrap();
            assert_eq!(guard.journal[0].path, "user/login/admin/Secret%23123");
        }

        #[tokio::test]
        async fn forced_failure_is_500() {
            let (server, state) = server();
            state
                .lock()
                .unwrap()
                .failures
                .insert(("GET".to_string(), "states".to_string()));
            server
                .get("/api/states")
                .await
                .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
