//! Domain methods for the gallery API client.
//!
//! Endpoint shapes:
//!
//! - `POST /upload` with `{filename, contentType}` returns `{uploadUrl, fields}`
//! - `GET /photos` returns `{photos: [...]}`
//! - `DELETE /photos/{photoId}` returns 2xx with an ignored body

use crate::transport::{PhotoApi, TransportError, TransportResult};
use crate::ApiClient;
use async_trait::async_trait;
use gallery_core::models::{FilePayload, PhotoRecord, UploadCredential, UploadRequest};
use reqwest::multipart::{Form, Part};

/// List photos response. Matches GET /photos.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct PhotoListResponse {
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

/// Build the storage form: every credential field verbatim, then the file.
fn transfer_form(credential: &UploadCredential, file: FilePayload) -> TransportResult<Form> {
    let mut form = Form::new();
    for (name, value) in &credential.fields {
        form = form.text(name.clone(), value.clone());
    }

    let part = Part::bytes(file.bytes)
        .file_name(file.filename)
        .mime_str(&file.content_type)
        .map_err(|e| TransportError::Request(format!("Invalid content type: {}", e)))?;

    Ok(form.part("file", part))
}

#[async_trait]
impl PhotoApi for ApiClient {
    async fn request_upload(&self, request: &UploadRequest) -> TransportResult<UploadCredential> {
        self.post_json("/upload", request).await
    }

    async fn transfer(
        &self,
        credential: &UploadCredential,
        file: FilePayload,
    ) -> TransportResult<()> {
        let size_bytes = file.len();
        let form = transfer_form(credential, file)?;
        let start = std::time::Instant::now();

        self.post_multipart_to(&credential.upload_url, form).await?;

        tracing::debug!(
            upload_url = %credential.upload_url,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage transfer accepted"
        );
        Ok(())
    }

    async fn list_photos(&self) -> TransportResult<Vec<PhotoRecord>> {
        let response: PhotoListResponse = self.get("/photos").await?;
        Ok(response.photos)
    }

    async fn delete_photo(&self, photo_id: &str) -> TransportResult<()> {
        self.delete(&format!("/photos/{}", urlencoding::encode(photo_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    fn upload_request() -> UploadRequest {
        UploadRequest {
            filename: "cat.png".to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("https://api.example.com/prod/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/prod");
        assert_eq!(client.build_url("/photos"), "https://api.example.com/prod/photos");
    }

    #[tokio::test]
    async fn test_request_upload_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_body(Matcher::Json(json!({
                "filename": "cat.png",
                "contentType": "image/png"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "uploadUrl": "https://bucket.example.com/",
                    "fields": {"key": "photos/p1/cat.png", "policy": "xyz"},
                    "photoId": "p1",
                    "key": "photos/p1/cat.png"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let credential = client_for(&server)
            .request_upload(&upload_request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(credential.upload_url, "https://bucket.example.com/");
        assert_eq!(credential.fields["policy"], "xyz");
        assert_eq!(credential.photo_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_request_upload_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"quota exceeded"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .request_upload(&upload_request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransportError::Status {
                status: 403,
                message: Some("quota exceeded".to_string())
            }
        );
        assert_eq!(err.backend_message(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_request_upload_unstructured_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client_for(&server)
            .request_upload(&upload_request())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.backend_message(), None);
    }

    #[tokio::test]
    async fn test_transfer_replays_fields_before_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bucket")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="key"\r\n\r\nphotos/p1/cat.png"#.to_string()),
                Matcher::Regex(r#"name="policy"\r\n\r\nxyz"#.to_string()),
                Matcher::Regex(r#"(?s)name="policy".*name="file"; filename="cat.png""#.to_string()),
                Matcher::Regex("PNGDATA".to_string()),
            ]))
            .with_status(204)
            .create_async()
            .await;

        let credential = UploadCredential {
            upload_url: format!("{}/bucket", server.url()),
            fields: [
                ("key".to_string(), "photos/p1/cat.png".to_string()),
                ("policy".to_string(), "xyz".to_string()),
            ]
            .into_iter()
            .collect(),
            photo_id: None,
            key: None,
        };
        let file = FilePayload::new(b"PNGDATA".to_vec(), "cat.png", "image/png");

        client_for(&server).transfer(&credential, file).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transfer_failure_has_no_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bucket")
            .with_status(403)
            .with_body(r#"{"error":"looks like json but is not parsed"}"#)
            .create_async()
            .await;

        let credential = UploadCredential {
            upload_url: format!("{}/bucket", server.url()),
            fields: Default::default(),
            photo_id: None,
            key: None,
        };
        let file = FilePayload::new(b"GIF89a".to_vec(), "a.gif", "image/gif");

        let err = client_for(&server)
            .transfer(&credential, file)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 403,
                message: None
            }
        );
    }

    #[tokio::test]
    async fn test_list_photos() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photos")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"photos": [
                    {
                        "photoId": "2",
                        "filename": "dog.jpg",
                        "uploadDate": "2024-02-10T08:00:00Z",
                        "thumbnailUrl": "https://t/2",
                        "photoUrl": "https://p/2",
                        "tags": ["dog"],
                        "dimensions": {}
                    },
                    {
                        "photoId": "1",
                        "filename": "cat.jpg",
                        "uploadDate": "2024-01-05T08:00:00Z",
                        "thumbnailUrl": "https://t/1",
                        "photoUrl": "https://p/1",
                        "tags": ["cat", "beach"],
                        "dimensions": {"width": 640, "height": 480}
                    }
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let photos = client_for(&server).list_photos().await.unwrap();
        let ids: Vec<&str> = photos.iter().map(|p| p.photo_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(photos[0].dimensions.is_none());
        assert_eq!(photos[1].dimensions.map(|d| d.height), Some(480));
    }

    #[tokio::test]
    async fn test_list_photos_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photos")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).list_photos().await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_delete_photo_encodes_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/photos/a%2Fb")
            .with_status(200)
            .with_body(r#"{"message":"Photo deleted successfully"}"#)
            .create_async()
            .await;

        client_for(&server).delete_photo("a/b").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_photo_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/photos/missing")
            .with_status(404)
            .with_body(r#"{"error":"Photo not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).delete_photo("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.backend_message(), Some("Photo not found"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_request_error() {
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.list_photos().await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_) | TransportError::Timeout));
    }
}
