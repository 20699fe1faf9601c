use super::*;
use mockito::Matcher;

fn client_for(server: &mockito::ServerGuard) -> GitHubClient {
    let auth = AuthProvider::new().with_github_token("test-token");
    GitHubClient::with_base_url(&HttpConfig::default(), &auth, &server.url())
}

fn repo() -> Repo {
    Repo::new(HostKind::GitHub, "owner", "starter", None)
}

// === parse_repo_path ===

#[test]
fn test_parse_repo_path_simple() {
    let (owner, name) = parse_repo_path("owner/repo").unwrap();
    assert_eq!(owner, "owner");
    assert_eq!(name, "repo");
}

#[test]
fn test_parse_repo_path_full_url() {
    let (owner, name) = parse_repo_path("https://github.com/owner/repo.git").unwrap();
    assert_eq!(owner, "owner");
    assert_eq!(name, "repo");
}

#[test]
fn test_parse_repo_path_with_extra_path() {
    let (owner, name) = parse_repo_path("owner/repo/blob/main/src/main.ts").unwrap();
    assert_eq!(owner, "owner");
    assert_eq!(name, "repo");
}

#[test]
fn test_parse_repo_path_invalid() {
    assert!(parse_repo_path("invalid").is_err());
    assert!(parse_repo_path("").is_err());
    assert!(parse_repo_path("/repo").is_err());
    assert!(parse_repo_path("owner/").is_err());
    assert!(parse_repo_path("owner/  ").is_err());
}

// === contents_url ===

fn public_client() -> GitHubClient {
    GitHubClient::with_base_url(&HttpConfig::default(), &AuthProvider::new(), API_BASE)
}

#[test]
fn test_contents_url_root() {
    let client = public_client();
    assert_eq!(
        client.contents_url(&repo(), "").unwrap().as_str(),
        "https://api.github.com/repos/owner/starter/contents"
    );
}

#[test]
fn test_contents_url_with_ref() {
    let client = public_client();
    let repo = Repo::new(HostKind::GitHub, "owner", "starter", Some("dev".to_string()));
    assert_eq!(
        client.contents_url(&repo, "/src/").unwrap().as_str(),
        "https://api.github.com/repos/owner/starter/contents/src?ref=dev"
    );
}

#[test]
fn test_contents_url_encodes_reserved_characters() {
    let client = public_client();
    let repo = Repo::new(HostKind::GitHub, "owner", "starter", Some("feature/x".to_string()));
    assert_eq!(
        client.contents_url(&repo, "docs/a#b?.md").unwrap().as_str(),
        "https://api.github.com/repos/owner/starter/contents/docs/a%23b%3F.md?ref=feature%2Fx"
    );
}

#[test]
fn test_contents_url_keeps_base_path() {
    let client = GitHubClient::with_base_url(
        &HttpConfig::default(),
        &AuthProvider::new(),
        "https://ghe.example.com/api/v3/",
    );
    assert_eq!(
        client.contents_url(&repo(), "src").unwrap().as_str(),
        "https://ghe.example.com/api/v3/repos/owner/starter/contents/src"
    );
}

#[test]
fn test_contents_url_invalid_base() {
    let client =
        GitHubClient::with_base_url(&HttpConfig::default(), &AuthProvider::new(), "not a url");
    assert!(matches!(
        client.contents_url(&repo(), ""),
        Err(TimError::Config(_))
    ));
}

// === list_contents ===

#[tokio::test]
async fn test_list_contents_directory_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/starter/contents/src")
        .match_header("authorization", "Bearer test-token")
        .match_header("user-agent", "tim-cli")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"type":"file","name":"main.ts","path":"src/main.ts","url":"u"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let listing = client.list_contents(&repo(), "src").await.unwrap();

    match listing {
        ContentListing::Dir(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].path, "src/main.ts");
        }
        ContentListing::File(_) => panic!("expected a directory listing"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_contents_file_with_ref() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/starter/contents/README.md")
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"type":"file","name":"README.md","path":"README.md","content":"aGk=","encoding":"base64"}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let repo = Repo::new(HostKind::GitHub, "owner", "starter", Some("main".to_string()));
    let listing = client.list_contents(&repo, "README.md").await.unwrap();

    assert!(matches!(listing, ContentListing::File(ref f) if f.content == "aGk="));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_contents_path_with_hash() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/owner/starter/contents/docs/a%23b.md")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"type":"file","name":"a#b.md","path":"docs/a#b.md","content":"aGk=","encoding":"base64"}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let listing = client.list_contents(&repo(), "docs/a#b.md").await.unwrap();

    assert!(matches!(listing, ContentListing::File(ref f) if f.path == "docs/a#b.md"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_contents_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/repos/owner/starter/contents")
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.list_contents(&repo(), "").await;

    match result {
        Err(TimError::RepoApi {
            host,
            status,
            message,
        }) => {
            assert_eq!(host, "github");
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected RepoApi error, got {:?}", other),
    }
}
