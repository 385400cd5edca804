//! 고수준 클라이언트 모듈 — 설정 보관 + 타입 지정 명령 래퍼 *(feature `"client"`)*
//!
//! [`ApiClient`]는 엔드포인트/인증 설정([`ApiConfig`])을 한 번 보관하고,
//! 호스팅 마이그레이션 도구가 사용하는 명령들을 타입 지정 메서드로 노출합니다.
//! 각 메서드는 [`constants::commands`](crate::constants::commands)의 고정
//! 와이어 명령 문자열에 매핑됩니다 — 런타임 메서드명 변환은 없습니다.
//!
//! ## 명령 래퍼
//!
//! - [`account_info`](ApiClient::account_info) — `WTD2_AccountInfo`
//! - [`server_info`](ApiClient::server_info) — `WTD2_ServerInfo`
//! - [`migrate`](ApiClient::migrate) — `WTD2_Migrate`
//! - [`recreate`](ApiClient::recreate) — `WTD2_Recreate`
//! - [`replace_host`](ApiClient::replace_host) — `DNS_ReplaceHost`
//! - [`call`](ApiClient::call) — 임의 명령 (위 래퍼들의 공통 경로)

use std::time::Duration;

use tracing::debug;

use crate::constants::{commands, DEFAULT_FOLDER, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;
use crate::transaction::{ApiVersion, Transaction};
use crate::transport::{HttpTransport, Transport};
use crate::value::{Reply, Value};

/// 클라이언트 설정
///
/// 엔드포인트 호스트/폴더와 인증 정보는 항상 외부에서 주입됩니다 —
/// 코어에 하드코딩된 엔드포인트는 없습니다. 공유 기본값 위에 `with_*`
/// 빌더로 덮어쓰는 조합 방식이며, `Clone`으로 기본 설정을 복제해
/// 변형을 만들 수 있습니다 (상속 없는 설정 조합).
///
/// # 예시
///
/// ```
/// use std::time::Duration;
/// use paneltx::client::ApiConfig;
///
/// let base = ApiConfig::new("api.example.net", "migraweb", "secret");
/// let staging = base
///     .clone()
///     .with_production(false)
///     .with_timeout(Duration::from_secs(5));
/// assert!(base.production);
/// assert!(!staging.production);
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// 엔드포인트 호스트 (예: `"api.example.net"`)
    pub host: String,
    /// 엔드포인트 폴더 (기본 `"/"`)
    pub folder: String,
    /// API 사용자명
    pub user: String,
    /// API 비밀번호 (전송 시에는 MD5 다이제스트만 나감)
    pub password: String,
    /// production 여부 (와이어의 `istest`는 반전되어 나감)
    pub production: bool,
    /// 요청 단위 타임아웃
    pub timeout: Duration,
    /// 프로토콜 버전
    pub version: ApiVersion,
    /// 레거시 타입 호환 모드 (알 수 없는 와이어 타입 → null)
    pub lenient_types: bool,
}

impl ApiConfig {
    /// 기본값으로 채운 새 설정을 생성합니다.
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            folder: DEFAULT_FOLDER.to_string(),
            user: user.into(),
            password: password.into(),
            production: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            version: ApiVersion::default(),
            lenient_types: false,
        }
    }

    /// 엔드포인트 폴더를 설정합니다.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// production 여부를 설정합니다.
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /// 요청 단위 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 프로토콜 버전을 설정합니다.
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// 레거시 타입 호환 모드를 설정합니다.
    pub fn with_lenient_types(mut self, lenient: bool) -> Self {
        self.lenient_types = lenient;
        self
    }
}

/// 원격 제어판 API의 고수준 클라이언트
///
/// 트랜잭션 인스턴스 간에 공유되는 가변 상태는 없으며, 각 호출은 독립적인
/// 단일 왕복입니다. 원격 시스템이 직렬 처리를 요구한다면 호출을 순서대로
/// 기다리는 것은 호출자의 책임입니다.
///
/// 전송 계층은 [`Transport`] 구현이면 무엇이든 가능합니다 — 기본은
/// [`HttpTransport`]이며, 테스트에서는 [`with_transport`](Self::with_transport)로
/// 스텁을 주입할 수 있습니다.
///
/// # 예시
///
/// ```no_run
/// use paneltx::client::{ApiClient, ApiConfig};
///
/// # async fn example() -> paneltx::Result<()> {
/// let client = ApiClient::new(ApiConfig::new("api.example.net", "migraweb", "secret"))?;
/// let result = client.migrate("acme", "web01.example", "web02.example").await?;
/// println!("migrate result: {result:?}");
/// # Ok(())
/// # }
/// ```
pub struct ApiClient<T = HttpTransport> {
    config: ApiConfig,
    transport: T,
}

/// 서버 FQDN에서 첫 번째 DNS 레이블을 추출합니다.
///
/// 레거시 시스템은 `WTD2_Recreate`에 `"web01.example.net"`이 아니라
/// `"web01"`을 기대합니다.
fn server_label(server: &str) -> &str {
    server.split('.').next().unwrap_or(server)
}

impl ApiClient<HttpTransport> {
    /// 설정으로부터 HTTP 전송 기반의 새 클라이언트를 생성합니다.
    ///
    /// # 에러
    ///
    /// - [`ApiError::Http`](crate::error::ApiError::Http) — HTTP 클라이언트 초기화 실패
    pub fn new(config: ApiConfig) -> Result<Self> {
        let transport =
            HttpTransport::new(&config.host, &config.folder)?.with_timeout(config.timeout);
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    /// 임의의 전송 구현으로 클라이언트를 생성합니다.
    ///
    /// 전송이 별도로 주입되므로 설정의 호스트/폴더/타임아웃은 전송 생성에
    /// 사용되지 않습니다.
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// 주입된 전송 구현을 반환합니다.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 설정이 적용된 인증 완료 트랜잭션을 준비합니다.
    fn transaction(&self) -> Result<Transaction> {
        let mut t = Transaction::with_version(self.config.version);
        t.authenticate(&self.config.user, &self.config.password, self.config.production)?;
        if self.config.lenient_types {
            t.lenient_types();
        }
        Ok(t)
    }

    /// 임의 명령을 실행하고 해당 명령의 결과 값을 반환합니다.
    ///
    /// 값이 없는 정상 응답(빈 결과)은 `Ok(None)`입니다.
    ///
    /// # 에러
    ///
    /// - 트랜잭션 검증/전송/파싱에서 발생 가능한 모든 에러
    /// - [`ApiError::Command`](crate::error::ApiError::Command) — 원격 명령 거부
    pub async fn call<N, V, I>(&self, command: &str, params: I) -> Result<Option<Value>>
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        let mut t = self.transaction()?;
        t.command(command)?;
        t.parameters(params);

        debug!(command = %command, "api call");
        let reply = t.commit(&self.transport).await?;
        match reply {
            Reply::Values(response) => Ok(response.into_value(command)),
            // NOTE: unreachable here — this client never enables debug mode
            Reply::Raw(_) => Ok(None),
        }
    }

    /// 계정 정보를 조회합니다 (`WTD2_AccountInfo`).
    pub async fn account_info(&self, account: &str) -> Result<Option<Value>> {
        self.call(commands::ACCOUNT_INFO, [("StAccount", account)])
            .await
    }

    /// 서버 정보를 조회합니다 (`WTD2_ServerInfo`).
    pub async fn server_info(&self, server: &str) -> Result<Option<Value>> {
        self.call(commands::SERVER_INFO, [("server", server)]).await
    }

    /// 계정을 원 서버에서 새 서버로 마이그레이션합니다 (`WTD2_Migrate`).
    pub async fn migrate(
        &self,
        account: &str,
        server: &str,
        new_server: &str,
    ) -> Result<Option<Value>> {
        self.call(
            commands::MIGRATE,
            [
                ("account", account),
                ("server", server),
                ("new_server", new_server),
            ],
        )
        .await
    }

    /// 계정을 지정 서버에 재생성합니다 (`WTD2_Recreate`).
    ///
    /// 서버는 FQDN으로 받아 첫 번째 레이블만 전송합니다
    /// (예: `"web01.example.net"` → `"web01"`).
    pub async fn recreate(&self, account: &str, server: &str) -> Result<Option<Value>> {
        self.call(
            commands::RECREATE,
            [("account", account), ("server", server_label(server))],
        )
        .await
    }

    /// 도메인의 DNS 호스트 레코드를 교체합니다 (`DNS_ReplaceHost`).
    ///
    /// `search_zone`은 항상 참으로 전송됩니다 — 존 전체에서 기존 호스트를
    /// 찾아 교체하는 레거시 동작입니다.
    pub async fn replace_host(
        &self,
        domain: &str,
        host: &str,
        new_host: &str,
    ) -> Result<Option<Value>> {
        self.call(
            commands::DNS_REPLACE_HOST,
            [
                ("domain", Value::from(domain)),
                ("host", Value::from(host)),
                ("new_host", Value::from(new_host)),
                ("search_zone", Value::from(true)),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiConfig::new("api.example.net", "migraweb", "secret");
        assert_eq!(config.host, "api.example.net");
        assert_eq!(config.folder, "/");
        assert!(config.production);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.version, ApiVersion::V2);
        assert!(!config.lenient_types);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = ApiConfig::new("h", "u", "p")
            .with_folder("/panel/")
            .with_production(false)
            .with_timeout(Duration::from_secs(3))
            .with_lenient_types(true);
        assert_eq!(config.folder, "/panel/");
        assert!(!config.production);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.lenient_types);
    }

    #[test]
    fn test_config_clone_composition() {
        // 기본 설정 복제 + 덮어쓰기 — 원본은 변하지 않아야 함
        let base = ApiConfig::new("h", "u", "p");
        let staging = base.clone().with_production(false);
        assert!(base.production);
        assert!(!staging.production);
    }

    #[test]
    fn test_server_label_extraction() {
        assert_eq!(server_label("web01.example.net"), "web01");
        assert_eq!(server_label("web01"), "web01");
        assert_eq!(server_label("a.b.c"), "a");
    }

    #[test]
    fn test_client_new_builds_transport() {
        let client = ApiClient::new(ApiConfig::new("api.example.net", "u", "p")).unwrap();
        assert_eq!(client.config().host, "api.example.net");
    }

    #[test]
    fn test_prepared_transaction_rejects_empty_credentials() {
        let client = ApiClient::new(ApiConfig::new("api.example.net", "", "p")).unwrap();
        assert!(client.transaction().is_err());
    }
}
