//! 전송 계층 모듈 — HTTP POST 왕복과 테스트용 시임(seam)
//!
//! [`Transport`]는 직렬화된 엔벨로프 바이트를 보내고 원시 응답 바이트를
//! 돌려받는 단일 연산 트레이트입니다. 트랜잭션당 정확히 한 번의 왕복이며,
//! 재시도·풀링·속도 제한은 이 계층에 존재하지 않습니다 (호출자 정책).
//!
//! [`HttpTransport`]는 reqwest 기반 구현으로 feature `"client"` 활성화 시에만
//! 포함됩니다. 트레이트 자체는 항상 컴파일되므로 테스트에서 스텁으로
//! 대체할 수 있습니다.

use std::future::Future;

use crate::error::Result;

/// 단일 요청/응답 왕복을 수행하는 전송 시임
///
/// 구현체는 `body`를 전송하고 응답 본문 바이트를 그대로 반환합니다.
/// 연결 실패, 비정상 HTTP 상태, 타임아웃은 모두
/// [`ErrorKind::Transport`](crate::error::ErrorKind::Transport)로 분류되는
/// 에러로 표현되어야 합니다.
pub trait Transport {
    /// 직렬화된 요청 본문을 전송하고 원시 응답 바이트를 반환합니다.
    fn send(&self, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[cfg(feature = "client")]
pub use http::HttpTransport;

#[cfg(feature = "client")]
mod http {
    use std::time::Duration;

    use tracing::debug;

    use crate::constants::{CONTENT_TYPE_XML, DEFAULT_TIMEOUT_SECS, INDEX_PAGE};
    use crate::error::{ApiError, Result};

    use super::Transport;

    /// reqwest 기반 HTTP 전송 구현
    ///
    /// 설정된 호스트의 `{folder}index.php`로 `Content-Type: text/xml`
    /// POST 한 번을 수행합니다. 타임아웃은 요청 단위로 적용되며, 만료 시
    /// [`ApiError::Http`]로 표면화됩니다.
    ///
    /// # 예시
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use paneltx::transport::HttpTransport;
    ///
    /// let transport = HttpTransport::new("api.example.net", "/panel/")?
    ///     .with_timeout(Duration::from_secs(10));
    /// # Ok::<(), paneltx::ApiError>(())
    /// ```
    pub struct HttpTransport {
        http: reqwest::Client,
        host: String,
        folder: String,
        timeout: Duration,
    }

    impl HttpTransport {
        /// 새 전송을 생성합니다.
        ///
        /// - `host`: 엔드포인트 호스트. 스킴이 없으면 `http://`가 붙습니다
        ///   (레거시 상대 시스템은 평문 HTTP만 제공).
        /// - `folder`: 엔드포인트 폴더. 앞뒤 `/`가 없으면 보충됩니다.
        ///
        /// # 에러
        ///
        /// - [`ApiError::Http`] — reqwest 클라이언트 초기화 실패
        pub fn new(host: &str, folder: &str) -> Result<Self> {
            let http = reqwest::Client::builder().build()?;
            let mut folder = folder.to_string();
            if !folder.starts_with('/') {
                folder.insert(0, '/');
            }
            if !folder.ends_with('/') {
                folder.push('/');
            }
            Ok(Self {
                http,
                host: host.trim_end_matches('/').to_string(),
                folder,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            })
        }

        /// 요청 단위 타임아웃을 설정합니다.
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        /// 최종 요청 URL: `{scheme}://{host}{folder}index.php`
        fn endpoint(&self) -> String {
            if self.host.contains("://") {
                format!("{}{}{}", self.host, self.folder, INDEX_PAGE)
            } else {
                format!("http://{}{}{}", self.host, self.folder, INDEX_PAGE)
            }
        }
    }

    impl Transport for HttpTransport {
        async fn send(&self, body: Vec<u8>) -> Result<Vec<u8>> {
            let url = self.endpoint();
            debug!(url = %url, bytes = body.len(), "sending api request");

            let resp = self
                .http
                .post(&url)
                .header("Content-Type", CONTENT_TYPE_XML)
                .timeout(self.timeout)
                .body(body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ApiError::HttpStatus {
                    status: status.as_u16(),
                });
            }

            let raw = resp.bytes().await?.to_vec();
            debug!(bytes = raw.len(), "received api response");
            Ok(raw)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_endpoint_appends_index_page() {
            let t = HttpTransport::new("api.example.net", "/").unwrap();
            assert_eq!(t.endpoint(), "http://api.example.net/index.php");
        }

        #[test]
        fn test_endpoint_folder_normalization() {
            let t = HttpTransport::new("api.example.net", "panel").unwrap();
            assert_eq!(t.endpoint(), "http://api.example.net/panel/index.php");
        }

        #[test]
        fn test_endpoint_preserves_explicit_scheme() {
            let t = HttpTransport::new("https://api.example.net", "/panel/").unwrap();
            assert_eq!(t.endpoint(), "https://api.example.net/panel/index.php");
        }

        #[test]
        fn test_endpoint_trims_trailing_host_slash() {
            let t = HttpTransport::new("api.example.net/", "/").unwrap();
            assert_eq!(t.endpoint(), "http://api.example.net/index.php");
        }
    }
}
