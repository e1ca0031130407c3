use crate::domain::{FetchError, FetchResult, ItemSource, MenuItem};
use crate::infrastructure::Settings;
use reqwest::blocking::Client;
use tracing::{info, warn};

/// Reads active menu items from a PostgREST endpoint.
pub struct RestItemSource {
    client: Client,
    base_url: String,
    anon_key: String,
    table: String,
}

impl RestItemSource {
    pub fn new(settings: &Settings) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            table: settings.table.clone(),
        })
    }

    pub fn items_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

impl ItemSource for RestItemSource {
    fn fetch_active_items(&self) -> FetchResult<Vec<MenuItem>> {
        let url = self.items_url();
        info!(%url, "fetching active menu items");

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("is_active", "eq.true")])
            .header("apikey", self.anon_key.as_str())
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "data service rejected item query");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let items: Vec<MenuItem> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(items.into_iter().filter(|item| item.is_active).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves exactly one HTTP response and reports the request head it saw.
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            tx.send(head).unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        (format!("http://{addr}"), rx)
    }

    fn settings_for(base_url: String) -> Settings {
        Settings {
            base_url,
            anon_key: "test-key".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_items_url_trims_trailing_slash() {
        let source = RestItemSource::new(&settings_for("https://db.example.com/".into())).unwrap();
        assert_eq!(source.items_url(), "https://db.example.com/rest/v1/menu_items");
    }

    #[test]
    fn test_fetch_sends_filter_and_key() {
        let (url, rx) = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Syrniki","description":null,"category_id":4,"price":290,"image_url":null,"key_features":null,"is_active":true}]"#,
        );
        let source = RestItemSource::new(&settings_for(url)).unwrap();

        let items = source.fetch_active_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Syrniki");
        assert_eq!(items[0].price(), Some(290.0));

        let head = rx.recv().unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /rest/v1/menu_items?"));
        assert!(request_line.contains("is_active=eq.true"));
        assert!(head.to_ascii_lowercase().contains("apikey: test-key"));
        assert!(head.contains("Bearer test-key"));
    }

    #[test]
    fn test_fetch_reports_status() {
        let (url, _rx) = serve_once("401 Unauthorized", r#"{"message":"Invalid API key"}"#);
        let source = RestItemSource::new(&settings_for(url)).unwrap();

        let err = source.fetch_active_items().unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 401, .. }));
    }

    #[test]
    fn test_fetch_reports_bad_payload() {
        let (url, _rx) = serve_once("200 OK", r#"{"not":"a list"}"#);
        let source = RestItemSource::new(&settings_for(url)).unwrap();

        let err = source.fetch_active_items().unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_fetch_reports_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = RestItemSource::new(&settings_for(format!("http://{addr}"))).unwrap();
        let err = source.fetch_active_items().unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
