//! `reqwest` transport for the deck API client.

use async_trait::async_trait;
use deck::api::{ApiRequest, ApiResponse, Body, Method, Transport, Upload};
use deck::error::TransportError;
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

pub fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Single-part form carrying `upload` under `field`.
pub fn multipart_form(field: &'static str, upload: Upload) -> Result<Form, TransportError> {
    let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
    if let Some(content_type) = upload.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| TransportError::new(format!("invalid content type {content_type}: {e}")))?;
    }
    Ok(Form::new().part(field, part))
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self.http.request(reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.body(value.to_string()),
            Body::Multipart { field, upload } => builder.multipart(multipart_form(field, upload)?),
        };

        let response = builder.send().await.map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::new(e.to_string()))?;
        tracing::debug!(status, url = %request.url, "api response");
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
