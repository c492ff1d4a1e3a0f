//! Page flows through the router, with method override applied

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        Request, StatusCode,
    },
    response::Response,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::{Layer, ServiceExt};
use uuid::Uuid;

use bookshelf_server::{
    api,
    config::AppConfig,
    models::{Author, Book, Cover, ImageType, NewBook},
    repository::Repository,
    AppState,
};

struct Harness {
    state: AppState,
    repository: Repository,
}

impl Harness {
    fn new() -> Self {
        let repository = Repository::memory();
        Self {
            state: AppState::new(AppConfig::default(), repository.clone()),
            repository,
        }
    }

    async fn send(&self, method: &str, uri: &str, form: Option<&str>) -> Response {
        match form {
            Some(body) => {
                self.send_raw(method, uri, Some("application/x-www-form-urlencoded"), body)
                    .await
            }
            None => self.send_raw(method, uri, None, "").await,
        }
    }

    async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> Response {
        let app = axum::middleware::map_request(api::method_override)
            .layer(api::create_router(self.state.clone()));

        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        app.oneshot(request).await.unwrap()
    }

    async fn author(&self, name: &str) -> Author {
        self.repository.insert_author(name).await.unwrap()
    }

    async fn book(&self, title: &str, author_id: Uuid, published: &str) -> Book {
        self.repository
            .insert_book(&NewBook {
                title: title.into(),
                description: String::new(),
                publish_date: NaiveDate::parse_from_str(published, "%Y-%m-%d").unwrap(),
                page_count: 200,
                author_id,
                cover: None,
            })
            .await
            .unwrap()
    }
}

fn template(response: &Response) -> &str {
    response.headers()["x-view-template"].to_str().unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encode a form value
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn book_form(title: &str, author: Uuid, published: &str, cover: Option<&str>) -> String {
    let mut body = format!(
        "title={}&author={}&publishDate={}&pageCount=180&description=",
        encode(title),
        author,
        published
    );
    if let Some(cover) = cover {
        body.push_str("&cover=");
        body.push_str(&encode(cover));
    }
    body
}

#[tokio::test]
async fn test_author_name_length_bounds() {
    let harness = Harness::new();

    let response = harness.send("POST", "/authors", Some("name=Kafka")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "authors/new");
    let body = json(response).await;
    assert_eq!(body["author"]["name"], "Kafka");
    assert_eq!(body["error_message"], "Error creating Author");

    let too_long = "a".repeat(256);
    let response = harness
        .send("POST", "/authors", Some(&format!("name={}", too_long)))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let longest = "a".repeat(255);
    let response = harness
        .send("POST", "/authors", Some(&format!("name={}", longest)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/authors");

    let response = harness.send("GET", "/authors", None).await;
    let body = json(response).await;
    assert_eq!(body["authors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_author_search_by_name() {
    let harness = Harness::new();
    harness.author("Jane Smith").await;
    harness.author("Adam SMITHERS").await;
    harness.author("John Doe III").await;

    let response = harness.send("GET", "/authors?name=smi", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(template(&response), "authors/index");

    let body = json(response).await;
    let names: Vec<_> = body["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Jane Smith", "Adam SMITHERS"]);
    assert_eq!(body["search_options"]["name"], "smi");
}

#[tokio::test]
async fn test_author_page_lists_their_books() {
    let harness = Harness::new();
    let author = harness.author("Ursula K. Le Guin").await;
    let other = harness.author("Someone Else").await;
    for n in 0..8 {
        harness.book(&format!("Earthsea {}", n), author.id, "1968-01-01").await;
    }
    harness.book("Unrelated", other.id, "2000-01-01").await;

    let response = harness.send("GET", &format!("/authors/{}", author.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(template(&response), "authors/show");

    let body = json(response).await;
    assert_eq!(body["author"]["name"], "Ursula K. Le Guin");
    let books = body["books_by_author"].as_array().unwrap();
    assert_eq!(books.len(), 6);
    assert!(books.iter().all(|b| b["author_id"] == author.id.to_string()));
}

#[tokio::test]
async fn test_author_rename_through_method_override() {
    let harness = Harness::new();
    let author = harness.author("Mary Shelly").await;

    let uri = format!("/authors/{}?_method=PUT", author.id);
    let response = harness.send("POST", &uri, Some("name=Mary+Shelley")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/authors/{}", author.id));

    let stored = harness.repository.find_author(author.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Mary Shelley");
}

#[tokio::test]
async fn test_deleting_author_keeps_books() {
    let harness = Harness::new();
    let author = harness.author("Isaac Asimov").await;
    let book = harness.book("Foundation", author.id, "1951-05-01").await;

    let uri = format!("/authors/{}?_method=DELETE", author.id);
    let response = harness.send("POST", &uri, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/authors");

    let response = harness.send("GET", &format!("/books/{}", book.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["book"]["title"], "Foundation");
    assert!(body["author"].is_null());
}

#[tokio::test]
async fn test_unknown_records_redirect() {
    let harness = Harness::new();
    let missing = Uuid::new_v4();

    for uri in [format!("/books/{}", missing), "/books/not-an-id".to_string()] {
        let response = harness.send("GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    let response = harness.send("GET", &format!("/authors/{}/edit", missing), None).await;
    assert_eq!(location(&response), "/authors");

    let response = harness
        .send("POST", &format!("/books/{}?_method=DELETE", missing), None)
        .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_create_book_with_cover() {
    let harness = Harness::new();
    let author = harness.author("Frank Herbert").await;

    let cover = r#"{"type":"image/png","data":"iVBORw0KGgo=","name":"dune.png"}"#;
    let form = book_form("Dune", author.id, "1965-08-01", Some(cover));
    let response = harness.send("POST", "/books", Some(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books");

    let body = json(harness.send("GET", "/books", None).await).await;
    let book = &body["books"][0];
    assert_eq!(book["title"], "Dune");
    assert_eq!(book["cover_image_type"], "image/png");
    assert!(book["cover_image_path"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;"));
}

#[tokio::test]
async fn test_unsupported_cover_is_dropped() {
    let harness = Harness::new();
    let author = harness.author("Frank Herbert").await;

    let cover = r#"{"type":"image/bmp","data":"Qk0="}"#;
    let form = book_form("Children of Dune", author.id, "1976-04-01", Some(cover));
    let response = harness.send("POST", "/books", Some(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let books = harness.repository.find_books(&Default::default()).await.unwrap();
    assert_eq!(books.len(), 1);
    assert!(books[0].cover.is_none());
}

#[tokio::test]
async fn test_invalid_book_rerenders_form_with_authors() {
    let harness = Harness::new();
    let author = harness.author("Frank Herbert").await;

    let form = book_form("", author.id, "1965-08-01", None);
    let response = harness.send("POST", "/books", Some(&form)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "books/new");

    let body = json(response).await;
    assert_eq!(body["error_message"], "Error Creating Book");
    assert_eq!(body["authors"][0]["name"], "Frank Herbert");
    assert_eq!(body["book"]["publish_date"], "1965-08-01");
    assert!(harness.repository.find_books(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_book_keeps_cover() {
    let harness = Harness::new();
    let author = harness.author("Frank Herbert").await;
    let mut book = harness.book("Dune", author.id, "1965-08-01").await;
    book.cover = Some(Cover::new(ImageType::Gif, b"GIF89a".to_vec()));
    harness.repository.update_book(&book).await.unwrap();

    let uri = format!("/books/{}?_method=PUT", book.id);
    let form = book_form("Dune Messiah", author.id, "1969-10-15", None);
    let response = harness.send("POST", &uri, Some(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/books/{}", book.id));

    let stored = harness.repository.find_book(book.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune Messiah");
    assert_eq!(stored.page_count, 180);
    assert_eq!(stored.cover, book.cover);
}

#[tokio::test]
async fn test_delete_book_redirects_to_list() {
    let harness = Harness::new();
    let author = harness.author("Frank Herbert").await;
    let book = harness.book("Dune", author.id, "1965-08-01").await;

    let response = harness
        .send("POST", &format!("/books/{}?_method=DELETE", book.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/books");
    assert!(harness.repository.find_book(book.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_book_search_by_title_and_dates() {
    let harness = Harness::new();
    let author = harness.author("Agatha Christie").await;
    harness.book("Murder on the Orient Express", author.id, "1934-01-01").await;
    harness.book("Death on the Nile", author.id, "1937-11-01").await;
    harness.book("The Murder at the Vicarage", author.id, "1930-10-01").await;

    let response = harness
        .send("GET", "/books?title=MURDER&publishedBefore=1934-01-01", None)
        .await;
    let body = json(response).await;
    let titles: Vec<_> = body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Murder on the Orient Express", "The Murder at the Vicarage"]);
    assert_eq!(body["search_options"]["publishedBefore"], "1934-01-01");

    let response = harness.send("GET", "/books?publishedAfter=1935-01-01", None).await;
    let body = json(response).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"][0]["title"], "Death on the Nile");

    let response = harness.send("GET", "/books?publishedBefore=someday", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_home_shows_ten_newest_books() {
    let harness = Harness::new();
    let author = harness.author("Terry Pratchett").await;
    for n in 1..=12 {
        harness.book(&format!("Discworld {}", n), author.id, "1983-11-24").await;
    }

    let response = harness.send("GET", "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(template(&response), "index");

    let body = json(response).await;
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 10);
    assert_eq!(books[0]["title"], "Discworld 12");
    assert_eq!(books[9]["title"], "Discworld 3");
}

#[tokio::test]
async fn test_health_endpoints() {
    let harness = Harness::new();

    let body = json(harness.send("GET", "/health", None).await).await;
    assert_eq!(body["status"], "healthy");

    let response = harness.send("GET", "/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_undecodable_queries_redirect_home() {
    let harness = Harness::new();

    for uri in ["/authors?name=a&name=b", "/books?title=a&title=b"] {
        let response = harness.send("GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/");
    }
}

#[tokio::test]
async fn test_undecodable_author_forms_rerender() {
    let harness = Harness::new();
    let author = harness.author("Toni Morrison").await;

    let response = harness.send_raw("POST", "/authors", None, "name=Toni+Morrison").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "authors/new");
    assert_eq!(json(response).await["error_message"], "Error creating Author");

    let response = harness
        .send("POST", "/authors", Some("name=Chinua+Achebe&name=Wole+Soyinka"))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "authors/new");

    let uri = format!("/authors/{}?_method=PUT", author.id);
    let response = harness
        .send_raw("POST", &uri, Some("text/plain"), "name=Someone+Else")
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "authors/edit");
    let body = json(response).await;
    assert_eq!(body["author"]["name"], "Toni Morrison");
    assert_eq!(body["error_message"], "Error updating Author");

    let authors = harness.repository.find_authors(&Default::default()).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Toni Morrison");
}

#[tokio::test]
async fn test_undecodable_book_forms_rerender() {
    let harness = Harness::new();
    let author = harness.author("Toni Morrison").await;
    let book = harness.book("Beloved", author.id, "1987-09-02").await;

    let response = harness.send_raw("POST", "/books", None, "title=Jazz").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "books/new");
    let body = json(response).await;
    assert_eq!(body["error_message"], "Error Creating Book");
    assert_eq!(body["authors"][0]["name"], "Toni Morrison");

    let uri = format!("/books/{}?_method=PUT", book.id);
    let response = harness.send_raw("POST", &uri, Some("text/plain"), "title=Jazz").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(template(&response), "books/edit");
    let body = json(response).await;
    assert_eq!(body["book"]["title"], "Beloved");
    assert_eq!(body["error_message"], "Error Updating Book");

    let stored = harness.repository.find_book(book.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Beloved");
}

#[tokio::test]
async fn test_updates_for_unknown_ids_redirect_home() {
    let harness = Harness::new();
    let author = harness.author("Toni Morrison").await;
    let missing = Uuid::new_v4().to_string();

    for id in [missing.as_str(), "not-an-id"] {
        let uri = format!("/authors/{}?_method=PUT", id);
        let response = harness.send("POST", &uri, Some("name=Toni+Morrison")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let uri = format!("/books/{}?_method=PUT", id);
        let form = book_form("Sula", author.id, "1973-01-01", None);
        let response = harness.send("POST", &uri, Some(&form)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    assert!(harness.repository.find_books(&Default::default()).await.unwrap().is_empty());
}
