use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use playground_server::access::{AccessFilter, MemoryAllowlist};
use playground_server::config::{AppState, Config, GistMode, Strategy};
use playground_server::handler::handle_request;
use playground_server::http::NOT_FOUND_BODY;
use tempfile::TempDir;

const GIST: &str = "0123456789abcdef0123456789abcdef";
const PHONE_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36";

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("web");
    let write = |rel: &str, content: &str| {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    };
    write("index.html", "<html>desktop</html>");
    write("mobile.html", "<html>mobile</html>");
    write("style.css", "body {}");
    write("robots.txt", "User-agent: *");
    write("samples.json", "{\"samples\":[]}");
    write("my file.txt", "spaced");
    write("packages/foo/bar.js", "bar();");
    write("scripts/assets/frame.js", "frame();");
    std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();
    dir
}

fn config(dir: &Path) -> Config {
    let mut cfg = Config::defaults().unwrap();
    cfg.site.root = dir.join("web").to_string_lossy().into_owned();
    cfg.site.mobile_page = Some("mobile.html".to_string());
    cfg.logging.access_log = false;
    cfg
}

fn state(cfg: Config) -> Arc<AppState> {
    Arc::new(AppState::with_access_filter(cfg, None))
}

fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Empty::new())
        .unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Empty<Bytes>>) -> Response<Full<Bytes>> {
    let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
    handle_request(req, Arc::clone(state), peer).await.unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> Response<Full<Bytes>> {
    send(state, request(Method::GET, uri)).await
}

async fn body(resp: Response<Full<Bytes>>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn serves_root_and_pseudo_routes_as_main_page() {
    let dir = site();
    let state = state(config(dir.path()));

    for uri in ["/", "/flutter", "/dart", "/html"] {
        let resp = get(&state, uri).await;
        assert_eq!(resp.status(), 200, "{uri}");
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(body(resp).await, "<html>desktop</html>");
    }
}

#[tokio::test]
async fn mobile_clients_get_mobile_page() {
    let dir = site();
    let state = state(config(dir.path()));

    let req = Request::builder()
        .uri("/flutter")
        .header("user-agent", PHONE_UA)
        .body(Empty::new())
        .unwrap();
    let resp = send(&state, req).await;
    assert_eq!(body(resp).await, "<html>mobile</html>");
}

#[tokio::test]
async fn serves_files_with_content_types() {
    let dir = site();
    let state = state(config(dir.path()));

    let resp = get(&state, "/style.css").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/css");
    assert_eq!(body(resp).await, "body {}");

    let resp = get(&state, "/packages/foo/bar.js").await;
    assert_eq!(resp.headers()["content-type"], "application/javascript");
    assert_eq!(body(resp).await, "bar();");

    let resp = get(&state, "/scripts/assets/frame.js").await;
    assert_eq!(body(resp).await, "frame();");

    let resp = get(&state, "/my%20file.txt").await;
    assert_eq!(resp.headers()["content-type"], "text/plain");
    assert_eq!(body(resp).await, "spaced");
}

#[tokio::test]
async fn json_is_served_cross_origin() {
    let dir = site();
    let state = state(config(dir.path()));

    let resp = get(&state, "/samples.json").await;
    assert_eq!(resp.headers()["content-type"], "application/json");
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let resp = get(&state, "/style.css").await;
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn gist_placeholder_strips_identifier() {
    let dir = site();
    let state = state(config(dir.path()));

    let resp = get(&state, &format!("/{GIST}/style.css")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body(resp).await, "body {}");

    let resp = get(&state, &format!("/{GIST}/packages/foo/bar.js")).await;
    assert_eq!(body(resp).await, "bar();");
}

#[tokio::test]
async fn bare_gist_rewrites_or_redirects() {
    let dir = site();

    let state_rewrite = state(config(dir.path()));
    let resp = get(&state_rewrite, &format!("/{GIST}")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body(resp).await, "<html>desktop</html>");

    let mut cfg = config(dir.path());
    cfg.site.gist_mode = GistMode::Redirect;
    let state_redirect = state(cfg);

    let resp = get(&state_redirect, &format!("/{GIST}")).await;
    assert_eq!(resp.status(), 308);
    assert_eq!(resp.headers()["location"], format!("/?id={GIST}").as_str());

    let resp = get(&state_redirect, &format!("/{GIST}?theme=dark")).await;
    assert_eq!(resp.status(), 308);
    assert_eq!(
        resp.headers()["location"],
        format!("/?theme=dark&id={GIST}").as_str()
    );
}

#[tokio::test]
async fn missing_resources_render_404_page() {
    let dir = site();
    let state = state(config(dir.path()));

    for uri in ["/missing.css", "/anything/missing.js", "/packages/nope.js"] {
        let resp = get(&state, uri).await;
        assert_eq!(resp.status(), 404, "{uri}");
        assert_eq!(body(resp).await, NOT_FOUND_BODY);
    }
}

#[tokio::test]
async fn missing_main_page_is_404() {
    let dir = site();
    let mut cfg = config(dir.path());
    cfg.site.main_page = "gone.html".to_string();
    let state = state(cfg);

    let resp = get(&state, "/").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn traversal_never_leaves_root() {
    let dir = site();
    let state = state(config(dir.path()));

    for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/x/../../secret.txt"] {
        let resp = get(&state, uri).await;
        assert_eq!(resp.status(), 404, "{uri}");
    }
}

#[tokio::test]
async fn head_has_headers_without_body() {
    let dir = site();
    let state = state(config(dir.path()));

    let resp = send(&state, request(Method::HEAD, "/style.css")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-length"], "7");
    assert_eq!(body(resp).await, "");
}

#[tokio::test]
async fn options_and_other_methods() {
    let dir = site();
    let state = state(config(dir.path()));

    let resp = send(&state, request(Method::OPTIONS, "/anything")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        resp.headers()["access-control-allow-methods"],
        "POST, GET, PUT, DELETE"
    );
    assert_eq!(body(resp).await, "");

    let resp = send(&state, request(Method::POST, "/")).await;
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn flat_strategy_only_knows_listed_items() {
    let dir = site();
    let mut cfg = config(dir.path());
    cfg.site.strategy = Strategy::Flat;
    let state = state(cfg);

    assert_eq!(get(&state, "/robots.txt").await.status(), 200);
    assert_eq!(get(&state, "/flutter").await.status(), 200);
    assert_eq!(get(&state, &format!("/{GIST}")).await.status(), 200);
    // Exists on disk but is not a known file
    assert_eq!(get(&state, "/style.css").await.status(), 404);
    assert_eq!(get(&state, "/packages/foo/bar.js").await.status(), 404);
}

mod access_control {
    use super::*;

    fn guarded(dir: &Path, local_dev: bool) -> Arc<AppState> {
        let filter = AccessFilter::new(
            vec!["google.com".to_string()],
            local_dev,
            Arc::new(MemoryAllowlist::new(["friend@example.com"])),
        );
        Arc::new(AppState::with_access_filter(config(dir), Some(filter)))
    }

    fn as_user(uri: &str, principal: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .uri(uri)
            .header("x-goog-authenticated-user-email", principal)
            .body(Empty::new())
            .unwrap()
    }

    #[tokio::test]
    async fn denies_without_principal() {
        let dir = site();
        let state = guarded(dir.path(), false);

        let resp = get(&state, "/style.css").await;
        assert_eq!(resp.status(), 401);
        assert_eq!(body(resp).await, "");

        // Denial happens before method dispatch too
        let resp = send(&state, request(Method::OPTIONS, "/")).await;
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn allows_approved_domain_and_allowlist() {
        let dir = site();
        let state = guarded(dir.path(), false);

        let resp = send(&state, as_user("/", "accounts.google.com:a@google.com")).await;
        assert_eq!(resp.status(), 200);

        let resp = send(&state, as_user("/", "accounts.google.com:friend@example.com")).await;
        assert_eq!(resp.status(), 200);

        let resp = send(&state, as_user("/", "accounts.google.com:eve@example.com")).await;
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn local_dev_allows_everyone() {
        let dir = site();
        let state = guarded(dir.path(), true);
        assert_eq!(get(&state, "/").await.status(), 200);
    }

    #[tokio::test]
    async fn state_loads_allowlist_file() {
        let dir = site();
        let allowlist = dir.path().join("allowlist.toml");
        std::fs::write(&allowlist, "emails = [\"listed@example.com\"]\n").unwrap();

        let mut cfg = config(dir.path());
        cfg.access.enabled = true;
        cfg.access.local_dev = Some(false);
        cfg.access.allowlist_file = Some(allowlist.to_string_lossy().into_owned());
        let state = Arc::new(AppState::new(cfg).unwrap());

        let resp = send(&state, as_user("/", "listed@example.com")).await;
        assert_eq!(resp.status(), 200);
        let resp = send(&state, as_user("/", "other@example.com")).await;
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn state_fails_on_missing_allowlist_file() {
        let dir = site();
        let mut cfg = config(dir.path());
        cfg.access.enabled = true;
        let missing = dir.path().join("nope.toml");
        cfg.access.allowlist_file = Some(missing.to_string_lossy().into_owned());
        assert!(AppState::new(cfg).is_err());
    }
}
