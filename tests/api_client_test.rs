use pim_cli::{
    api::PimApiClient,
    auth::TokenManager,
    configuration::{
        CredentialStore, MemoryCredentialStore, KEY_ACCESS_TOKEN, KEY_BASE_URL, KEY_CLIENT_ID,
        KEY_CLIENT_SECRET, KEY_PASSWORD, KEY_TOKEN_EXPIRY, KEY_USERNAME,
    },
    error::ApiError,
    http_utils::{HttpClient, HttpRequestConfig},
    model::{AttributeListOptions, NewCategory, Paging, ProductListOptions},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const NOW: i64 = 1_700_000_000_000;

fn fixed_clock() -> i64 {
    NOW
}

/// One request as seen by the stub server.
#[derive(Debug, Clone)]
struct Recorded {
    head: String,
    body: String,
}

impl Recorded {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn target(&self) -> &str {
        self.request_line().split(' ').nth(1).unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    fn query_param(&self, name: &str) -> Option<String> {
        let url = url::Url::parse(&format!("http://stub{}", self.target())).unwrap();
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

type Requests = Arc<Mutex<Vec<Recorded>>>;

async fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before the request was complete");
        data.extend_from_slice(&chunk[..read]);
        if let Some(position) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break position;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = data[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }

    Recorded {
        head,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Serve the scripted responses in order, one per connection, then stop
/// listening. Returns the base URL of the REST API and the recorded requests.
async fn stub_server(responses: Vec<(u16, &'static str)>) -> (String, Requests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            recorded.lock().unwrap().push(request);

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    (format!("http://{}/api/rest/v1", address), requests)
}

fn credentials(base_url: &str) -> Vec<(&'static str, String)> {
    vec![
        (KEY_CLIENT_ID, "client".to_string()),
        (KEY_CLIENT_SECRET, "secret".to_string()),
        (KEY_USERNAME, "julia".to_string()),
        (KEY_PASSWORD, "julia-password".to_string()),
        (KEY_BASE_URL, base_url.to_string()),
    ]
}

fn with_cached_token(base_url: &str) -> MemoryCredentialStore {
    let mut values = credentials(base_url);
    values.push((KEY_ACCESS_TOKEN, "cached-token".to_string()));
    values.push((KEY_TOKEN_EXPIRY, (NOW + 600_000).to_string()));
    MemoryCredentialStore::with_values(values)
}

fn client(store: MemoryCredentialStore) -> PimApiClient<MemoryCredentialStore> {
    let http = HttpClient::new(HttpRequestConfig::default()).unwrap();
    let tokens = TokenManager::new(store, http.clone()).with_clock(fixed_clock);
    PimApiClient::with_parts(http, tokens)
}

fn recorded(requests: &Requests) -> Vec<Recorded> {
    requests.lock().unwrap().clone()
}

#[tokio::test]
async fn test_token_exchange_caches_expiry_and_sends_search_filter() {
    let (base_url, requests) = stub_server(vec![
        (
            200,
            r#"{"access_token":"abc","expires_in":3600,"token_type":"bearer"}"#,
        ),
        (
            200,
            r#"{"_links":{},"current_page":1,"_embedded":{"items":[{"code":"description","type":"pim_catalog_text"}]}}"#,
        ),
    ])
    .await;
    let mut api = client(MemoryCredentialStore::with_values(credentials(&base_url)));

    let options = AttributeListOptions {
        paging: Paging::default(),
        attribute_type: Some("pim_catalog_text".to_string()),
    };
    let items = api.list_attributes(&options).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["code"], "description");

    let store = api.tokens().store();
    assert_eq!(store.get(KEY_ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
    assert_eq!(
        store.get(KEY_TOKEN_EXPIRY).unwrap(),
        Some((NOW + 3_600_000 - 60_000).to_string())
    );

    let requests = recorded(&requests);
    assert_eq!(requests.len(), 2);

    let token_request = &requests[0];
    assert_eq!(token_request.request_line(), "POST /api/oauth/v1/token HTTP/1.1");
    let grant: serde_json::Value = serde_json::from_str(&token_request.body).unwrap();
    assert_eq!(grant["grant_type"], "password");
    assert_eq!(grant["username"], "julia");
    assert!(token_request
        .header("authorization")
        .unwrap()
        .starts_with("Basic "));

    let list_request = &requests[1];
    assert!(list_request.target().starts_with("/api/rest/v1/attributes?"));
    assert_eq!(list_request.header("authorization").as_deref(), Some("Bearer abc"));
    assert_eq!(
        list_request.query_param("search").as_deref(),
        Some(r#"{"type":[{"operator":"=","value":"pim_catalog_text"}]}"#)
    );
}

#[tokio::test]
async fn test_cached_token_is_reused() {
    let (base_url, requests) = stub_server(vec![(
        200,
        r#"[{"identifier":"tee","family":"clothing"},{"identifier":"cap","family":"clothing"}]"#,
    )])
    .await;
    let mut api = client(with_cached_token(&base_url));

    let options = ProductListOptions {
        paging: Paging {
            limit: Some(2),
            page: None,
        },
        family: Some("clothing".to_string()),
    };
    let items = api.list_products(&options).await.unwrap();
    assert_eq!(items.len(), 2);

    let requests = recorded(&requests);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].header("authorization").as_deref(),
        Some("Bearer cached-token")
    );
    assert_eq!(requests[0].query_param("limit").as_deref(), Some("2"));
    assert_eq!(
        requests[0].query_param("search").as_deref(),
        Some(r#"{"family":[{"operator":"IN","value":["clothing"]}]}"#)
    );
}

#[tokio::test]
async fn test_expired_token_is_exchanged_again() {
    let (base_url, requests) = stub_server(vec![
        (200, r#"{"access_token":"fresh","expires_in":3600}"#),
        (200, r#"{"code":"master","parent":null}"#),
    ])
    .await;
    let mut store = with_cached_token(&base_url);
    store.set(KEY_TOKEN_EXPIRY, &NOW.to_string()).unwrap();
    let mut api = client(store);

    let category = api.get_category("master").await.unwrap();
    assert_eq!(category["code"], "master");

    let requests = recorded(&requests);
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].header("authorization").as_deref(),
        Some("Bearer fresh")
    );
}

#[tokio::test]
async fn test_missing_product_is_not_found_without_retry() {
    let (base_url, requests) = stub_server(vec![(
        404,
        r#"{"code":404,"message":"Resource `missing-sku` does not exist."}"#,
    )])
    .await;
    let mut api = client(with_cached_token(&base_url));

    match api.get_product("missing-sku").await {
        Err(ApiError::NotFound(message)) => assert!(message.contains("missing-sku")),
        other => panic!("expected a not found error, got {:?}", other),
    }

    let requests = recorded(&requests);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].request_line(),
        "GET /api/rest/v1/products/missing-sku HTTP/1.1"
    );
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let (base_url, requests) =
        stub_server(vec![(429, r#"{"code":429,"message":"Too many requests"}"#)]).await;
    let mut api = client(with_cached_token(&base_url));

    let result = api.list_categories(&Default::default()).await;
    assert!(matches!(result, Err(ApiError::RateLimit(_))));
    assert_eq!(recorded(&requests).len(), 1);
}

#[tokio::test]
async fn test_forbidden_resource_is_a_permission_error() {
    let (base_url, requests) = stub_server(vec![(
        403,
        r#"{"code":403,"message":"You are not allowed to access the web API."}"#,
    )])
    .await;
    let mut api = client(with_cached_token(&base_url));

    match api.get_product("tee").await {
        Err(ApiError::Permission(message)) => assert!(message.contains("not allowed")),
        other => panic!("expected a permission error, got {:?}", other),
    }
    assert_eq!(recorded(&requests).len(), 1);
}

#[tokio::test]
async fn test_revoked_cached_token_asks_to_reconfigure() {
    let (base_url, requests) = stub_server(vec![(
        401,
        r#"{"code":401,"message":"The access token provided is invalid."}"#,
    )])
    .await;
    let mut api = client(with_cached_token(&base_url));

    match api.list_attributes(&Default::default()).await {
        Err(ApiError::Auth(message)) => {
            assert!(message.contains("access token provided is invalid"));
            assert!(message.contains("pim configure"));
        }
        other => panic!("expected an auth error, got {:?}", other),
    }

    let requests = recorded(&requests);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].header("authorization").as_deref(),
        Some("Bearer cached-token")
    );
}

#[tokio::test]
async fn test_create_echoes_identifying_fields() {
    let (base_url, requests) = stub_server(vec![(201, "")]).await;
    let mut api = client(with_cached_token(&base_url));

    let category = NewCategory {
        code: "summer".to_string(),
        parent: Some("master".to_string()),
        labels: BTreeMap::from([("en_US".to_string(), "Summer".to_string())]),
    };
    let created = api.create_category(&category).await.unwrap();

    assert_eq!(created["code"], "summer");
    assert_eq!(created["parent"], "master");
    assert_eq!(created.len(), 2);

    let requests = recorded(&requests);
    assert_eq!(requests[0].request_line(), "POST /api/rest/v1/categories HTTP/1.1");
    let payload: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(payload["labels"]["en_US"], "Summer");
}

#[tokio::test]
async fn test_validation_error_carries_field_messages() {
    let (base_url, _) = stub_server(vec![(
        422,
        r#"{"code":422,"message":"Validation failed.","errors":[{"property":"code","message":"This value is already used."}]}"#,
    )])
    .await;
    let mut api = client(with_cached_token(&base_url));

    let category = NewCategory {
        code: "master".to_string(),
        parent: None,
        labels: BTreeMap::new(),
    };
    match api.create_category(&category).await {
        Err(ApiError::Validation(message)) => {
            assert!(message.contains("code: This value is already used."))
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_credentials_are_an_auth_error() {
    let (base_url, requests) = stub_server(vec![(
        401,
        r#"{"error":"invalid_client","error_description":"The client credentials are invalid"}"#,
    )])
    .await;
    let mut api = client(MemoryCredentialStore::with_values(credentials(&base_url)));

    match api.get_attribute("sku").await {
        Err(ApiError::Auth(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("client ID and secret"));
        }
        other => panic!("expected an auth error, got {:?}", other),
    }
    assert_eq!(recorded(&requests).len(), 1);
    assert_eq!(api.tokens().store().get(KEY_ACCESS_TOKEN).unwrap(), None);
}

#[tokio::test]
async fn test_unconfigured_store_never_touches_the_network() {
    let (base_url, requests) = stub_server(vec![]).await;
    let mut store = with_cached_token(&base_url);
    store.remove(KEY_PASSWORD).unwrap();
    let mut api = client(store);

    match api.list_products(&Default::default()).await {
        Err(ApiError::Auth(message)) => assert!(message.contains("not configured")),
        other => panic!("expected an auth error, got {:?}", other),
    }
    assert!(recorded(&requests).is_empty());
}

#[tokio::test]
async fn test_repeated_get_returns_identical_data() {
    let body = r#"{"identifier":"tee","family":"clothing","enabled":true,"values":{}}"#;
    let (base_url, requests) = stub_server(vec![(200, body), (200, body)]).await;
    let mut api = client(with_cached_token(&base_url));

    let first = api.get_product("tee").await.unwrap();
    let second = api.get_product("tee").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(recorded(&requests).len(), 2);
}
