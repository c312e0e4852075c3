use mockito::{Matcher, Server};
use serde_json::json;

use sorng_box::auth;
use sorng_box::downloads;
use sorng_box::error::BoxErrorKind;
use sorng_box::files;
use sorng_box::folders;
use sorng_box::types::{OAuthCredentials, SharedLinkAccess, SharedLinkRequest};
use sorng_box::uploads;
use sorng_box::{BoxClient, BoxConfig, BoxService, Folder};

fn config_for(server: &Server) -> BoxConfig {
    BoxConfig::default()
        .with_api_url(server.url())
        .with_upload_url(server.url())
        .with_token_url(format!("{}/oauth2/token", server.url()))
        .with_credentials(OAuthCredentials {
            client_id: "cid".into(),
            client_secret: "csecret".into(),
            redirect_uri: None,
        })
}

fn client_for(server: &Server) -> BoxClient {
    let mut client = BoxClient::new(config_for(server)).unwrap();
    client.set_access_token("token");
    client
}

// ── Files ───────────────────────────────────────────────────────────

#[tokio::test]
async fn get_file_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/files/42")
        .match_header("authorization", "Bearer token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"type":"file","id":"42","name":"report.pdf","size":1024}"#)
        .create_async()
        .await;

    let file = files::get_file(&client_for(&server), "42").await.unwrap();
    assert_eq!(file.id.as_deref(), Some("42"));
    assert_eq!(file.name.as_deref(), Some("report.pdf"));
    assert_eq!(file.size, Some(1024));
    mock.assert_async().await;
}

#[tokio::test]
async fn rename_and_move_file_bodies() {
    let mut server = Server::new_async().await;
    let rename = server
        .mock("PUT", "/files/42")
        .match_body(Matcher::Json(json!({"name": "new.txt"})))
        .with_status(200)
        .with_body(r#"{"id":"42","name":"new.txt"}"#)
        .create_async()
        .await;
    let client = client_for(&server);

    let file = files::rename_file(&client, "42", "new.txt").await.unwrap();
    assert_eq!(file.name.as_deref(), Some("new.txt"));
    rename.assert_async().await;

    let moved = server
        .mock("PUT", "/files/42")
        .match_body(Matcher::Json(json!({"parent": {"id": "7"}})))
        .with_status(200)
        .with_body(r#"{"id":"42","parent":{"type":"folder","id":"7"}}"#)
        .create_async()
        .await;

    let file = files::move_file(&client, "42", "7").await.unwrap();
    assert_eq!(file.parent.unwrap().id.as_deref(), Some("7"));
    moved.assert_async().await;
}

#[tokio::test]
async fn copy_file_with_new_name() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files/42/copy")
        .match_body(Matcher::Json(json!({"name": "copy.txt", "parent": {"id": "0"}})))
        .with_status(201)
        .with_body(r#"{"id":"43","name":"copy.txt"}"#)
        .create_async()
        .await;

    let file = files::copy_file(&client_for(&server), "42", "0", Some("copy.txt"))
        .await
        .unwrap();
    assert_eq!(file.id.as_deref(), Some("43"));
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_file_accepts_no_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/files/42")
        .with_status(204)
        .create_async()
        .await;

    files::delete_file(&client_for(&server), "42").await.unwrap();
    mock.assert_async().await;
}

// ── Folders ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_folder_is_recursive() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/folders/9")
        .match_query(Matcher::UrlEncoded("recursive".into(), "true".into()))
        .with_status(204)
        .create_async()
        .await;

    folders::delete_folder(&client_for(&server), "9").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn create_folder_under_root() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/folders")
        .match_body(Matcher::Json(json!({"name": "Docs", "parent": {"id": "0"}})))
        .with_status(201)
        .with_body(r#"{"type":"folder","id":"11","name":"Docs"}"#)
        .create_async()
        .await;

    let folder = folders::create_folder(&client_for(&server), "0", "Docs")
        .await
        .unwrap();
    assert_eq!(folder.id.as_deref(), Some("11"));
    mock.assert_async().await;
}

#[tokio::test]
async fn list_items_fetches_unpopulated_folder() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/folders/0")
        .with_status(200)
        .with_body(
            r#"{"type":"folder","id":"0","name":"All Files",
                "item_collection":{"total_count":2,"entries":[
                    {"type":"folder","id":"11","name":"Docs"},
                    {"type":"file","id":"42","name":"a.txt"}]}}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let client = client_for(&server);

    let mut folder = Folder::with_id("0");
    let items = folders::list_items(&client, &mut folder).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_folder());
    assert!(items[1].is_file());
    assert_eq!(folder.name.as_deref(), Some("All Files"));

    // Second call reuses the stored collection.
    let again = folders::list_items(&client, &mut folder).await.unwrap();
    assert_eq!(again, items);
    mock.assert_async().await;
}

// ── Shared links ────────────────────────────────────────────────────

#[tokio::test]
async fn share_and_unshare_file() {
    let mut server = Server::new_async().await;
    let share = server
        .mock("PUT", "/files/42")
        .match_body(Matcher::Json(json!({"shared_link": {"access": "open"}})))
        .with_status(200)
        .with_body(
            r#"{"id":"42","shared_link":{"url":"https://app.box.com/s/abc","access":"open"}}"#,
        )
        .create_async()
        .await;
    let client = client_for(&server);

    let req = SharedLinkRequest::with_access(SharedLinkAccess::Open);
    let file = files::share_file(&client, "42", &req).await.unwrap();
    assert_eq!(
        file.shared_link.unwrap().url.as_deref(),
        Some("https://app.box.com/s/abc")
    );
    share.assert_async().await;

    let unshare = server
        .mock("PUT", "/files/42")
        .match_body(Matcher::Json(json!({"shared_link": null})))
        .with_status(200)
        .with_body(r#"{"id":"42"}"#)
        .create_async()
        .await;

    let file = files::unshare_file(&client, "42").await.unwrap();
    assert!(file.shared_link.is_none());
    unshare.assert_async().await;
}

#[tokio::test]
async fn share_folder_targets_folder_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/folders/11")
        .match_body(Matcher::Json(json!({"shared_link": {"access": "company"}})))
        .with_status(200)
        .with_body(r#"{"type":"folder","id":"11"}"#)
        .create_async()
        .await;

    let req = SharedLinkRequest::with_access(SharedLinkAccess::Company);
    folders::share_folder(&client_for(&server), "11", &req)
        .await
        .unwrap();
    mock.assert_async().await;
}

// ── Uploads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upload_bytes_sends_attributes_then_file() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/files/content")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="attributes"[\s\S]*name="file"; filename="a.txt""#.into()),
            Matcher::Regex(r#"\{"name":"a.txt","parent":\{"id":"0"\}\}"#.into()),
            Matcher::Regex("hello world".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"total_count":1,"entries":[{"type":"file","id":"100","name":"a.txt"}]}"#)
        .create_async()
        .await;

    let file = uploads::upload_bytes(&client_for(&server), "0", "a.txt", b"hello world".to_vec())
        .await
        .unwrap();
    assert_eq!(file.id.as_deref(), Some("100"));
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_path_uses_base_name() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, "# notes").unwrap();

    let mock = server
        .mock("POST", "/files/content")
        .match_body(Matcher::Regex(r#"filename="notes.md""#.into()))
        .with_status(201)
        .with_body(r#"{"total_count":1,"entries":[{"id":"101","name":"notes.md"}]}"#)
        .create_async()
        .await;

    let file = uploads::upload_path(&client_for(&server), "0", &path, None)
        .await
        .unwrap();
    assert_eq!(file.name.as_deref(), Some("notes.md"));
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_conflict_maps_to_409() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/files/content")
        .with_status(409)
        .with_body(
            r#"{"type":"error","status":409,"code":"item_name_in_use","message":"Item with the same name already exists","request_id":"r1"}"#,
        )
        .create_async()
        .await;

    let err = uploads::upload_bytes(&client_for(&server), "0", "a.txt", vec![1])
        .await
        .unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::Conflict);
    assert_eq!(err.box_code.as_deref(), Some("item_name_in_use"));
    assert_eq!(err.request_id.as_deref(), Some("r1"));
}

// ── Downloads ───────────────────────────────────────────────────────

#[tokio::test]
async fn download_follows_redirect() {
    let mut server = Server::new_async().await;
    let location = format!("{}/dl/42", server.url());
    let redirect = server
        .mock("GET", "/files/42/content")
        .with_status(302)
        .with_header("location", &location)
        .create_async()
        .await;
    let content = server
        .mock("GET", "/dl/42")
        .with_status(200)
        .with_body("file body")
        .create_async()
        .await;

    let bytes = downloads::download_bytes(&client_for(&server), "42")
        .await
        .unwrap();
    assert_eq!(bytes, b"file body");
    redirect.assert_async().await;
    content.assert_async().await;
}

#[tokio::test]
async fn download_to_path_writes_file() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/42/content")
        .with_status(200)
        .with_body("0123456789")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.bin");
    let size = downloads::download_to_path(&client_for(&server), "42", &dest)
        .await
        .unwrap();
    assert_eq!(size, 10);
    assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
}

#[tokio::test]
async fn failed_download_keeps_existing_file() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/42/content")
        .with_status(404)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("keep.txt");
    std::fs::write(&dest, "precious").unwrap();

    let err = downloads::download_to_path(&client_for(&server), "42", &dest)
        .await
        .unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::NotFound);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "precious");
}

#[tokio::test]
async fn download_to_unwritable_destination() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/42/content")
        .with_status(200)
        .with_body("data")
        .create_async()
        .await;

    let dest = "/definitely/not/a/dir/out.bin";
    let err = downloads::download_to_path(&client_for(&server), "42", dest)
        .await
        .unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::Io);
}

#[tokio::test]
async fn download_error_status_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/42/content")
        .with_status(403)
        .create_async()
        .await;

    let err = downloads::download_bytes(&client_for(&server), "42")
        .await
        .unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::Forbidden);
    assert!(err.is_status(403));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn not_found_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/folders/404")
        .with_status(404)
        .with_body(
            r#"{"type":"error","status":404,"code":"not_found","message":"Not Found","request_id":"abc"}"#,
        )
        .create_async()
        .await;

    let err = folders::get_folder(&client_for(&server), "404")
        .await
        .unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::NotFound);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.box_code.as_deref(), Some("not_found"));
}

#[tokio::test]
async fn unknown_status_is_preserved() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/files/1")
        .with_status(418)
        .create_async()
        .await;

    let err = files::get_file(&client_for(&server), "1").await.unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::Unknown(418));
    assert_eq!(err.message, "Unknown error");
}

#[tokio::test]
async fn missing_token_never_hits_the_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/files/1")
        .expect(0)
        .create_async()
        .await;

    let client = BoxClient::new(config_for(&server)).unwrap();
    let err = files::get_file(&client, "1").await.unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::NotAuthenticated);
    mock.assert_async().await;
}

// ── Auth ────────────────────────────────────────────────────────────

fn token_mock_body() -> &'static str {
    r#"{"access_token":"fresh","expires_in":3600,"token_type":"bearer","refresh_token":"r1"}"#
}

#[tokio::test]
async fn exchange_code_posts_form() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "the-code".into()),
            Matcher::UrlEncoded("client_id".into(), "cid".into()),
            Matcher::UrlEncoded("client_secret".into(), "csecret".into()),
        ]))
        .with_status(200)
        .with_body(token_mock_body())
        .create_async()
        .await;

    let client = BoxClient::new(config_for(&server)).unwrap();
    let token = auth::exchange_code(&client, " the-code\n").await.unwrap();
    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.refresh_token.as_deref(), Some("r1"));
    assert!(token.expires_at.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn interactive_flow_installs_token() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::UrlEncoded("code".into(), "pasted".into()))
        .with_status(200)
        .with_body(token_mock_body())
        .create_async()
        .await;

    let mut client = BoxClient::new(config_for(&server)).unwrap();
    let mut input = tokio::io::BufReader::new(&b"pasted\n"[..]);
    let mut output: Vec<u8> = Vec::new();
    auth::authorize_interactive(&mut client, &mut input, &mut output)
        .await
        .unwrap();

    let prompt = String::from_utf8(output).unwrap();
    assert!(prompt.starts_with("Please visit:\nhttps://app.box.com/api/oauth2/authorize?"));
    assert!(prompt.ends_with("Enter the code: "));
    assert_eq!(client.access_token(), Some("fresh"));
}

#[tokio::test]
async fn rejected_code_keeps_client_unauthenticated() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Auth code doesn't exist"}"#)
        .create_async()
        .await;

    let mut svc = BoxService::new(config_for(&server)).unwrap();
    let err = svc.exchange_code("bad").await.unwrap_err();
    assert!(err.is_status(400));
    assert!(!svc.is_authenticated());
}

// ── Service ─────────────────────────────────────────────────────────

#[tokio::test]
async fn service_exchange_then_call() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .with_status(200)
        .with_body(token_mock_body())
        .create_async()
        .await;
    let get = server
        .mock("GET", "/folders/0")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(r#"{"type":"folder","id":"0","name":"All Files"}"#)
        .create_async()
        .await;

    let mut svc = BoxService::new(config_for(&server)).unwrap();
    svc.exchange_code("code").await.unwrap();
    assert!(svc.connection_summary().token_expires_at.is_some());

    let root = svc.get_folder("0").await.unwrap();
    assert_eq!(root.name.as_deref(), Some("All Files"));
    get.assert_async().await;
}

#[tokio::test]
async fn service_interactive_flow() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::UrlEncoded("code".into(), "typed-in".into()))
        .with_status(200)
        .with_body(token_mock_body())
        .create_async()
        .await;

    let mut svc = BoxService::new(config_for(&server)).unwrap();
    let mut input = tokio::io::BufReader::new(&b"typed-in\n"[..]);
    let mut output: Vec<u8> = Vec::new();
    svc.authorize_interactive(&mut input, &mut output)
        .await
        .unwrap();

    assert!(String::from_utf8(output).unwrap().contains("Enter the code: "));
    assert!(svc.is_authenticated());
    assert_eq!(svc.get_token().unwrap().access_token, "fresh");
}

#[tokio::test]
async fn service_upload_reader_and_download_to_writer() {
    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/files/content")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="log.txt""#.into()),
            Matcher::Regex("from a reader".into()),
        ]))
        .with_status(201)
        .with_body(r#"{"total_count":1,"entries":[{"id":"200","name":"log.txt"}]}"#)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/files/200/content")
        .with_status(200)
        .with_body("from a reader")
        .create_async()
        .await;

    let mut svc = BoxService::new(config_for(&server)).unwrap();
    svc.set_access_token("token");

    let mut reader = &b"from a reader"[..];
    let file = svc.upload_reader("0", "log.txt", &mut reader).await.unwrap();
    assert_eq!(file.id.as_deref(), Some("200"));

    let mut sink: Vec<u8> = Vec::new();
    let size = svc.download_to_writer("200", &mut sink).await.unwrap();
    assert_eq!(size, 13);
    assert_eq!(sink, b"from a reader");

    upload.assert_async().await;
    download.assert_async().await;
}

#[tokio::test]
async fn dot_ids_never_reach_the_server() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let copy = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = client_for(&server);

    let err = folders::delete_folder(&client, "..").await.unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::InvalidParameter);
    let err = files::copy_file(&client, ".", "0", None).await.unwrap_err();
    assert_eq!(err.kind, BoxErrorKind::InvalidParameter);

    delete.assert_async().await;
    copy.assert_async().await;
}

#[tokio::test]
async fn oversized_expiry_is_ignored() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .with_status(200)
        .with_body(format!(
            r#"{{"access_token":"fresh","expires_in":{},"token_type":"bearer"}}"#,
            i64::MAX
        ))
        .create_async()
        .await;

    let client = BoxClient::new(config_for(&server)).unwrap();
    let token = auth::exchange_code(&client, "code").await.unwrap();
    assert_eq!(token.access_token, "fresh");
    assert!(token.expires_at.is_none());
}
