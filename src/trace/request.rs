use reqwest::{
    Method, Url,
    header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue},
};

use crate::error::TraceError;

use super::HarEntry;

/// A recorded request validated and converted once, ready to be reissued.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Builds the request from a HAR entry.
    ///
    /// HTTP/2 pseudo headers and `content-length` are dropped. Recorded
    /// cookies and the post data mime type only fill in headers the entry
    /// does not already carry.
    ///
    /// # Errors
    ///
    /// Returns an error when the method, URL, or a header is invalid.
    pub fn from_entry(entry: &HarEntry) -> Result<Self, TraceError> {
        let request = &entry.request;
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_err| {
            TraceError::InvalidMethod {
                method: request.method.clone(),
                url: request.url.clone(),
            }
        })?;
        let url = Url::parse(&request.url).map_err(|err| TraceError::InvalidUrl {
            url: request.url.clone(),
            source: err,
        })?;

        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for header in &request.headers {
            if header.name.starts_with(':') {
                continue;
            }
            let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(|_err| {
                TraceError::InvalidHeaderName {
                    name: header.name.clone(),
                    url: request.url.clone(),
                }
            })?;
            if name == CONTENT_LENGTH {
                continue;
            }
            let value = header_value(&header.name, &header.value, &request.url)?;
            headers.append(name, value);
        }

        if !headers.contains_key(COOKIE) && !request.cookies.is_empty() {
            let cookie = request
                .cookies
                .iter()
                .map(|cookie| format!("{}={}", cookie.name, cookie.value))
                .collect::<Vec<_>>()
                .join("; ");
            headers.insert(COOKIE, header_value("cookie", &cookie, &request.url)?);
        }

        let body = request
            .post_data
            .as_ref()
            .and_then(|post_data| post_data.text.clone());
        if body.is_some()
            && !headers.contains_key(CONTENT_TYPE)
            && let Some(mime_type) = request
                .post_data
                .as_ref()
                .and_then(|post_data| post_data.mime_type.as_deref())
                .filter(|mime_type| !mime_type.is_empty())
        {
            headers.insert(
                CONTENT_TYPE,
                header_value("content-type", mime_type, &request.url)?,
            );
        }

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

fn header_value(name: &str, value: &str, url: &str) -> Result<HeaderValue, TraceError> {
    HeaderValue::from_bytes(value.as_bytes()).map_err(|_err| TraceError::InvalidHeaderValue {
        name: name.to_owned(),
        url: url.to_owned(),
    })
}
