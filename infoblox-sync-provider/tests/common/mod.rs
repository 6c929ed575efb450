//! Shared test helpers

#![allow(dead_code)]

use infoblox_sync_provider::{WapiClient, WapiConfig};
use wiremock::MockServer;

/// Assert that an `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// WAPI version used by every test server.
pub const WAPI_VERSION: &str = "2.3.1";

/// Path prefix of every WAPI call.
pub fn wapi_path(rest: &str) -> String {
    format!("/wapi/v{WAPI_VERSION}/{rest}")
}

/// Config pointing at a local mock server.
pub fn config_for(server: &MockServer) -> WapiConfig {
    let address = server.address();
    WapiConfig::new(address.ip().to_string(), address.port())
        .with_scheme("http")
        .with_version(WAPI_VERSION)
}

/// Start a mock grid manager and a client pointed at it.
pub async fn setup() -> (MockServer, WapiClient) {
    let server = MockServer::start().await;
    let client = WapiClient::new(config_for(&server), reqwest::Client::new());
    (server, client)
}

/// Same as [`setup`] with a customised config.
pub async fn setup_with(
    customise: impl FnOnce(WapiConfig) -> WapiConfig,
) -> (MockServer, WapiClient) {
    let server = MockServer::start().await;
    let client = WapiClient::new(customise(config_for(&server)), reqwest::Client::new());
    (server, client)
}
