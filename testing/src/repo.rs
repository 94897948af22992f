use async_trait::async_trait;
use http::{
    HeaderMap,
    HeaderName,
    HeaderValue,
    StatusCode,
};
use mockall::mock;
use ptagrepo::transport::{
    Response,
    Transport,
    TransportError,
};

mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn get(&self, path: &str) -> Result<Response, TransportError>;
    }
}

pub fn response(status: u16, body: &str) -> Response {
    Response {
        status: StatusCode::from_u16(status)
            .expect("a valid status code"),
        headers: HeaderMap::new(),
        body: body.to_string(),
    }
}

pub fn response_with_headers(
    status: u16,
    body: &str,
    headers: &[(&'static str, &str)],
) -> Response {
    let mut result = response(status, body);
    for (name, value) in headers {
        result.headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(value).expect("a valid header value"),
        );
    }
    result
}
