//! HTTP response building module
//!
//! Provides builders for every response the server emits, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::mime::JSON_CONTENT_TYPE;

pub const NOT_FOUND_BODY: &str = "<html><h1>404: Not found</h1></html>";

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 200 response carrying a file
///
/// JSON resources are readable cross-origin.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if content_type == JSON_CONTENT_TYPE {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(NOT_FOUND_BODY.as_bytes())
    };

    Response::builder()
        .status(404)
        .header("Content-Type", "text/html")
        .header("Content-Length", NOT_FOUND_BODY.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(NOT_FOUND_BODY.as_bytes())))
        })
}

/// Build 401 Unauthorized response with an empty body
pub fn build_401_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(401)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("401", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 308 Permanent Redirect response
pub fn build_permanent_redirect(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(308)
        .header("Location", location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("308", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let builder = if enable_cors {
        Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header(
                "Access-Control-Allow-Headers",
                "Origin, X-Requested-With, Content-Type, Accept",
            )
            .header("Access-Control-Allow-Methods", "POST, GET, PUT, DELETE")
    } else {
        Response::builder()
            .status(204)
            .header("Allow", ALLOWED_METHODS)
    };

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_404_body() {
        let resp = build_404_response(false);
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(body_of(resp).await, NOT_FOUND_BODY.as_bytes());

        let resp = build_404_response(true);
        assert_eq!(resp.status(), 404);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_file_response() {
        let resp = build_file_response(Bytes::from("body {}"), "text/css", false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/css");
        assert_eq!(resp.headers()["content-length"], "7");
        assert!(resp.headers().get("access-control-allow-origin").is_none());
        assert_eq!(body_of(resp).await, "body {}");
    }

    #[tokio::test]
    async fn test_json_is_cross_origin() {
        let resp = build_file_response(Bytes::from("{}"), JSON_CONTENT_TYPE, true);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["content-length"], "2");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_401_and_308() {
        let resp = build_401_response();
        assert_eq!(resp.status(), 401);
        assert!(body_of(resp).await.is_empty());

        let resp = build_permanent_redirect("/?id=abc");
        assert_eq!(resp.status(), 308);
        assert_eq!(resp.headers()["location"], "/?id=abc");
    }

    #[test]
    fn test_options() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            resp.headers()["access-control-allow-headers"],
            "Origin, X-Requested-With, Content-Type, Accept"
        );
        assert_eq!(
            resp.headers()["access-control-allow-methods"],
            "POST, GET, PUT, DELETE"
        );

        let resp = build_options_response(false);
        assert_eq!(resp.status(), 204);
        assert!(resp.headers().get("access-control-allow-origin").is_none());
        assert_eq!(resp.headers()["allow"], ALLOWED_METHODS);
    }
}
