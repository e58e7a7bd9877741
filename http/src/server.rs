//! # HttpServer - the request executor
//!
//! Every call is a single POST of an [`Envelope`] to one fixed URL. The reply is
//! classified into an [`Outcome`]:
//!
//! | transport | status | body parses | result |
//! |---|---|---|---|
//! | failed | - | - | `Outcome::FetchError` |
//! | ok | 2xx | yes (as `S`) | `Outcome::Success` |
//! | ok | 2xx | no | `Err(ExecuteError::ContractViolation)` |
//! | ok | other | yes (as `E`) | `Outcome::CustomError` |
//! | ok | other | no | `Outcome::StatusError` |
//!
//! A failure response may carry any body (a proxy's HTML page, an empty body), so
//! its parse failure is tolerated. A success response must match `S`.

use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::{ConfigError, ExecuteError};
use crate::transport::{RawResponse, ReqwestTransport, Transport};
use courier_core::{AsObject, JsonSerializer, Outcome, Serializer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Client for a server that exposes every endpoint behind one URL.
///
/// Cheap to clone; the URL, transport and serializer are shared and never change
/// after construction, so one instance can serve any number of concurrent calls.
pub struct HttpServer<T = ReqwestTransport, Z = JsonSerializer> {
    url: Arc<str>,
    transport: Arc<T>,
    serializer: Arc<Z>,
}

impl HttpServer {
    /// A client with the default `reqwest` transport and JSON wire format.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_transport(url, ReqwestTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::with_transport(config.url.clone(), transport))
    }
}

impl<T: Transport> HttpServer<T, JsonSerializer> {
    pub fn with_transport(url: impl Into<String>, transport: T) -> Self {
        Self {
            url: Arc::from(url.into()),
            transport: Arc::new(transport),
            serializer: Arc::new(JsonSerializer),
        }
    }
}

impl<T: Transport, Z: Serializer> HttpServer<T, Z> {
    /// Replace the wire format used by [`execute`](Self::execute) and [`call`](Self::call).
    pub fn with_serializer<Z2: Serializer>(self, serializer: Z2) -> HttpServer<T, Z2> {
        HttpServer {
            url: self.url,
            transport: self.transport,
            serializer: Arc::new(serializer),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn serializer(&self) -> &Z {
        &self.serializer
    }

    /// Call `endpoint` with `body` (or `{}` when absent).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let server = HttpServer::new("https://api.example.com/rpc");
    /// let user: Outcome<User, NotFound> = server.execute("getUser", Some(&GetUser { id: 7 })).await?;
    /// if let Some(user) = user.as_success() {
    ///     println!("{}", user.name);
    /// }
    /// ```
    pub async fn execute<S, E, B>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Outcome<S, E>, ExecuteError>
    where
        S: AsObject + DeserializeOwned,
        E: AsObject + DeserializeOwned,
        B: Serialize + Sync,
    {
        self.execute_with(endpoint, body, &*self.serializer).await
    }

    /// Call `endpoint` without a request body.
    pub async fn call<S, E>(&self, endpoint: &str) -> Result<Outcome<S, E>, ExecuteError>
    where
        S: AsObject + DeserializeOwned,
        E: AsObject + DeserializeOwned,
    {
        self.execute::<S, E, ()>(endpoint, None).await
    }

    /// Like [`execute`](Self::execute), with a serializer chosen for this call only.
    pub async fn execute_with<S, E, B, P>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        serializer: &P,
    ) -> Result<Outcome<S, E>, ExecuteError>
    where
        S: AsObject + DeserializeOwned,
        E: AsObject + DeserializeOwned,
        B: Serialize + Sync,
        P: Serializer,
    {
        let call_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "RpcCall",
            courier.endpoint = %endpoint,
            courier.url = %self.url,
            courier.call_id = %call_id
        );

        async move {
            let payload = encode(endpoint, body, serializer)?;
            tracing::debug!(bytes = payload.len(), "Sending request");
            let start = Instant::now();

            let response = match self.transport.post(&self.url, payload).await {
                Ok(response) => response,
                Err(err) => {
                    let duration = start.elapsed();
                    tracing::warn!(error = %err, kind = %err.kind(), ?duration, "Request failed: FetchError");
                    return Ok(Outcome::fetch_error(err));
                }
            };

            let status = response.status.as_u16();
            let outcome = resolve::<S, E, P>(endpoint, response, serializer)?;
            let duration = start.elapsed();
            match &outcome {
                Outcome::StatusError(_) => {
                    tracing::warn!(status, ?duration, "Request failed: StatusError");
                }
                other => {
                    tracing::info!(status, kind = %other.kind(), ?duration, "Request completed");
                }
            }
            Ok(outcome)
        }
        .instrument(span)
        .await
    }
}

impl<T, Z> Clone for HttpServer<T, Z> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            transport: self.transport.clone(),
            serializer: self.serializer.clone(),
        }
    }
}

impl<T, Z> fmt::Debug for HttpServer<T, Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServer")
            .field("url", &self.url)
            .field("transport", &std::any::type_name::<T>())
            .field("serializer", &std::any::type_name::<Z>())
            .finish()
    }
}

fn encode<B, P>(endpoint: &str, body: Option<&B>, serializer: &P) -> Result<String, ExecuteError>
where
    B: Serialize,
    P: Serializer,
{
    let envelope = Envelope::new(endpoint, body);
    serializer.stringify(&envelope).map_err(|source| {
        tracing::error!(error = %source, "Request envelope could not be encoded");
        ExecuteError::Encode {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

/// Classify a received response. Parsing is attempted against `S` for 2xx and `E` otherwise.
fn resolve<S, E, P>(
    endpoint: &str,
    response: RawResponse,
    serializer: &P,
) -> Result<Outcome<S, E>, ExecuteError>
where
    S: AsObject + DeserializeOwned,
    E: AsObject + DeserializeOwned,
    P: Serializer,
{
    let RawResponse { status, body } = response;

    if status.is_success() {
        let parsed: S = match serializer.parse(&body) {
            Ok(parsed) => parsed,
            Err(source) => {
                tracing::error!(status = status.as_u16(), error = %source, "Success response body does not parse");
                return Err(ExecuteError::ContractViolation {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body,
                    source,
                });
            }
        };
        Ok(Outcome::success(parsed))
    } else {
        match serializer.parse::<E>(&body) {
            Ok(parsed) => Ok(Outcome::custom_error(parsed)),
            Err(source) => {
                tracing::debug!(status = status.as_u16(), error = %source, "Failure response body is not the error shape");
                Ok(Outcome::status_error(body, status.as_u16()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_core::{
        BooleanWrapper, ParseError, TransportError, TransportErrorKind, VoidResponse,
        object_payload,
    };
    use http::StatusCode;
    use serde::Deserialize;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct User {
        name: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct NotFound {
        reason: String,
    }

    object_payload!(User, NotFound);

    /// Replays one scripted reply and records what was posted.
    struct ScriptedTransport {
        reply: Mutex<Option<Result<RawResponse, TransportError>>>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedTransport {
        fn respond(status: StatusCode, body: &str) -> Self {
            Self::with_reply(Ok(RawResponse::new(status, body)))
        }

        fn fail(kind: TransportErrorKind, message: &str) -> Self {
            Self::with_reply(Err(TransportError::new(kind, message)))
        }

        fn with_reply(reply: Result<RawResponse, TransportError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, url: &str, body: String) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push((url.to_string(), body));
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("transport called more than once")
        }
    }

    const URL: &str = "http://rpc.test/api";

    fn server(transport: ScriptedTransport) -> HttpServer<ScriptedTransport> {
        HttpServer::with_transport(URL, transport)
    }

    #[tokio::test]
    async fn test_success_with_typed_payload() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, r#"{"name":"Ann"}"#));

        let outcome: Outcome<User, NotFound> = server
            .execute("getUser", Some(&json!({ "id": 7 })))
            .await
            .unwrap();

        assert!(outcome.is_ok());
        assert!(!outcome.is_generic_error());
        assert_eq!(
            outcome.as_success(),
            Some(&User {
                name: "Ann".into()
            })
        );

        let sent = server.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, URL);
        let envelope: Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(envelope, json!({ "body": { "id": 7 }, "endpoint": "getUser" }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_fetch_error() {
        let server = server(ScriptedTransport::fail(
            TransportErrorKind::Connect,
            "connection refused",
        ));

        let outcome: Outcome<User, NotFound> = server.call("getUser").await.unwrap();

        assert!(outcome.is_fetch_err());
        assert!(!outcome.is_ok());
        assert!(outcome.is_generic_error());
        assert!(outcome.as_fetch_error().unwrap().error().is_connect());
    }

    #[tokio::test]
    async fn test_failure_status_with_error_shape_is_custom_error() {
        let server = server(ScriptedTransport::respond(
            StatusCode::NOT_FOUND,
            r#"{"reason":"not_found"}"#,
        ));

        let outcome: Outcome<User, NotFound> = server
            .execute("getUser", Some(&json!({ "id": 7 })))
            .await
            .unwrap();

        assert!(outcome.is_custom_error());
        assert!(!outcome.is_generic_error());
        assert_eq!(outcome.as_custom_error().unwrap().reason, "not_found");
    }

    #[tokio::test]
    async fn test_failure_status_with_unknown_body_is_status_error() {
        let page = "<html>Internal Server Error</html>";
        let server = server(ScriptedTransport::respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            page,
        ));

        let outcome: Outcome<User, NotFound> = server.call("getUser").await.unwrap();

        assert!(outcome.is_status_error());
        let err = outcome.as_status_error().unwrap();
        assert_eq!(err.error, page);
        assert_eq!(err.code, 500);
    }

    #[tokio::test]
    async fn test_failure_status_with_other_json_shape_is_status_error() {
        let server = server(ScriptedTransport::respond(
            StatusCode::BAD_REQUEST,
            r#"{"unexpected":true}"#,
        ));

        let outcome: Outcome<User, NotFound> = server.call("getUser").await.unwrap();
        assert_eq!(
            outcome.as_status_error().map(|e| e.code),
            Some(StatusCode::BAD_REQUEST.as_u16())
        );
    }

    #[tokio::test]
    async fn test_default_error_type_accepts_any_json_document() {
        let server = server(ScriptedTransport::respond(
            StatusCode::FORBIDDEN,
            r#"{"reason":"nope"}"#,
        ));

        let outcome: Outcome<User> = server.call("getUser").await.unwrap();
        assert!(outcome.is_custom_error());
        assert_eq!(outcome.as_custom_error(), Some(&json!({ "reason": "nope" })));
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_contract_violation() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "<html>ok</html>"));

        let err = server
            .call::<User, NotFound>("getUser")
            .await
            .unwrap_err();

        assert!(err.is_parse_failure());
        assert_eq!(err.endpoint(), "getUser");
        match err {
            ExecuteError::ContractViolation { status, body, .. } => {
                assert_eq!(status, 200);
                assert_eq!(body, "<html>ok</html>");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_boolean_success_is_wrapped() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "true"));

        let outcome: Outcome<bool> = server.call("ping").await.unwrap();
        assert_eq!(outcome.as_success(), Some(&BooleanWrapper { is_true: true }));

        let (_, body) = &server.transport().sent()[0];
        let envelope: Value = serde_json::from_str(body).unwrap();
        assert_eq!(envelope, json!({ "body": {}, "endpoint": "ping" }));
    }

    #[tokio::test]
    async fn test_dynamic_payloads_are_normalized() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "42"));
        let outcome: Outcome<Value> = server.call("count").await.unwrap();
        assert_eq!(outcome.as_success(), Some(&json!({ "value": 42 })));

        let server = self::server(ScriptedTransport::respond(StatusCode::OK, "null"));
        let outcome: Outcome<()> = server.call("reset").await.unwrap();
        assert_eq!(outcome.into_success(), Some(VoidResponse {}));
    }

    #[tokio::test]
    async fn test_array_success_body_is_success() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "[1,2]"));

        let outcome: Outcome<Value> = server.call("list").await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.into_success(), Some(json!([1, 2])));

        let server = self::server(ScriptedTransport::respond(StatusCode::OK, "[1,2]"));
        let outcome: Outcome<Vec<u32>> = server.call("list").await.unwrap();
        assert_eq!(outcome.into_success(), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_array_failure_body_is_custom_error() {
        let server = server(ScriptedTransport::respond(
            StatusCode::BAD_REQUEST,
            r#"[{"field":"id"}]"#,
        ));

        let outcome: Outcome<User, Value> = server
            .execute("createUser", Some(&json!({ "id": "x" })))
            .await
            .unwrap();
        assert!(outcome.is_custom_error());
        assert!(!outcome.is_generic_error());
        assert_eq!(
            outcome.as_custom_error(),
            Some(&json!([{ "field": "id" }]))
        );
    }

    /// Upper-cases endpoint names on the way out and accepts `yes` as `true`.
    struct ShoutingSerializer;

    impl Serializer for ShoutingSerializer {
        fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ParseError> {
            let text = if text == "yes" { "true" } else { text };
            JsonSerializer.parse(text)
        }

        fn stringify<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ParseError> {
            JsonSerializer.stringify(value).map(|s| s.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_per_call_serializer() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "yes"));

        let outcome: Outcome<bool> = server
            .execute_with::<_, _, (), _>("ping", None, &ShoutingSerializer)
            .await
            .unwrap();

        assert!(outcome.as_success().unwrap().is_true);
        assert!(server.transport().sent()[0].1.contains("PING"));
    }

    #[tokio::test]
    async fn test_server_wide_serializer() {
        let server = server(ScriptedTransport::respond(StatusCode::OK, "yes"))
            .with_serializer(ShoutingSerializer);

        let outcome: Outcome<bool> = server.call("ping").await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(
            server.transport().sent()[0].1,
            r#"{"BODY":{},"ENDPOINT":"PING"}"#
        );
    }

    #[test]
    fn test_clone_shares_configuration() {
        let server = HttpServer::new(URL);
        let copy = server.clone();
        assert_eq!(copy.url(), URL);
        assert!(format!("{:?}", copy).contains("HttpServer"));
    }

    #[test]
    fn test_from_config_validates_url() {
        assert!(HttpServer::from_config(&ClientConfig::new(URL)).is_ok());
        assert!(HttpServer::from_config(&ClientConfig::new("::nope::")).is_err());
    }
}
