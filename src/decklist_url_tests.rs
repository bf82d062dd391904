//! Tests for decklist URL handling.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn source_for(mock_uri: &str) -> HttpDecklistSource {
    let config = Config {
        moxfield_api_url: mock_uri.to_string(),
        archidekt_api_url: mock_uri.to_string(),
        ..Config::default()
    };
    HttpDecklistSource::new(&config)
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

// ── is_valid_http_url ────────────────────────────────────────────────

#[test]
fn accepts_absolute_http_urls() {
    assert!(is_valid_http_url("https://example.com/mydeck").is_some());
    assert!(is_valid_http_url("  http://example.com/deck.txt ").is_some());
}

#[test]
fn rejects_card_lines_and_other_schemes() {
    assert!(is_valid_http_url("1 Sol Ring").is_none());
    assert!(is_valid_http_url("Forest").is_none());
    assert!(is_valid_http_url("ftp://example.com/deck.txt").is_none());
    assert!(is_valid_http_url("mailto:someone@example.com").is_none());
    assert!(is_valid_http_url("").is_none());
}

// ── deck_site ────────────────────────────────────────────────────────

#[test]
fn recognises_deck_sites() {
    assert_eq!(
        deck_site(&url("https://www.moxfield.com/decks/abc123XYZ")).unwrap(),
        DeckSite::Moxfield("abc123XYZ".to_string())
    );
    assert_eq!(
        deck_site(&url("https://archidekt.com/decks/123456/my_deck")).unwrap(),
        DeckSite::Archidekt("123456".to_string())
    );
    assert_eq!(
        deck_site(&url("https://example.com/mydeck")).unwrap(),
        DeckSite::PlainText
    );
}

#[test]
fn site_urls_without_deck_are_invalid() {
    assert!(matches!(
        deck_site(&url("https://moxfield.com/users/someone")),
        Err(DeckError::InvalidDecklistUrl(_))
    ));
    assert!(matches!(
        deck_site(&url("https://archidekt.com/decks/not-a-number")),
        Err(DeckError::InvalidDecklistUrl(_))
    ));
}

// ── HttpDecklistSource ───────────────────────────────────────────────

#[tokio::test]
async fn moxfield_deck_becomes_lines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/decks/all/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Atraxa Superfriends",
            "commanders": { "Atraxa, Praetors' Voice": { "quantity": 1 } },
            "mainboard": {
                "Forest": { "quantity": 2 },
                "Sol Ring": { "quantity": 1 }
            },
            "sideboard": { "Duress": { "quantity": 3 } }
        })))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server.uri());
    let lines = source
        .fetch_lines(&url("https://www.moxfield.com/decks/abc123"))
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![
            "1 Atraxa, Praetors' Voice",
            "2 Forest",
            "1 Sol Ring",
            "SB: 3 Duress",
        ]
    );
}

#[tokio::test]
async fn archidekt_deck_skips_excluded_categories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/decks/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "categories": [
                { "name": "Ramp", "includedInDeck": true },
                { "name": "Maybeboard", "includedInDeck": false },
                { "name": "Sideboard", "includedInDeck": false }
            ],
            "cards": [
                { "quantity": 1, "categories": ["Ramp"],
                  "card": { "oracleCard": { "name": "Sol Ring" } } },
                { "quantity": 1, "categories": ["Maybeboard"],
                  "card": { "oracleCard": { "name": "Mana Crypt" } } },
                { "quantity": 2, "categories": ["Sideboard"],
                  "card": { "oracleCard": { "name": "Duress" } } },
                { "quantity": 5, "categories": null,
                  "card": { "oracleCard": { "name": "Island" } } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server.uri());
    let lines = source
        .fetch_lines(&url("https://archidekt.com/decks/42/test"))
        .await
        .unwrap();

    assert_eq!(lines, vec!["1 Sol Ring", "SB: 2 Duress", "5 Island"]);
}

#[tokio::test]
async fn plain_text_url_returns_body_lines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mydeck"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("2 Forest\n1 Sol Ring\n"),
        )
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server.uri());
    let lines = source
        .fetch_lines(&url(&format!("{}/mydeck", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(lines, vec!["2 Forest", "1 Sol Ring"]);
}

#[tokio::test]
async fn html_page_is_unsupported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deck.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server.uri());
    let result = source
        .fetch_lines(&url(&format!("{}/deck.html", mock_server.uri())))
        .await;

    assert!(matches!(
        result,
        Err(DeckError::UnsupportedDecklistSource(_))
    ));
}

#[tokio::test]
async fn missing_deck_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/decks/all/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server.uri());
    let result = source
        .fetch_lines(&url("https://moxfield.com/decks/gone"))
        .await;

    match result {
        Err(DeckError::HttpStatus(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("Expected DeckError::HttpStatus, got: {other:?}"),
    }
}
