//! 트랜잭션 빌더 모듈 — 인증, 명령, 파라미터 축적과 커밋
//!
//! [`Transaction`]은 하나의 요청/응답 교환을 구성하는 build-once 레코드입니다.
//! 생성 → 빌더 호출로 채움 → [`commit`](Transaction::commit)으로 정확히 한 번
//! 소비되는 생명주기를 가지며, `commit`이 `self`를 소유권으로 받기 때문에
//! 재사용은 타입 수준에서 차단됩니다.
//!
//! ## 사용 순서
//!
//! 1. [`authenticate`](Transaction::authenticate) — 사용자/비밀번호 (비밀번호는 MD5 다이제스트로만 보관)
//! 2. [`command`](Transaction::command) — `[A-Za-z0-9_]+` 형식의 명령명
//! 3. [`parameter`](Transaction::parameter) / [`parameters`](Transaction::parameters) — 순서 보존 추가
//! 4. [`commit`](Transaction::commit) — 직렬화 → 전송 → 파싱

use md5::{Digest, Md5};

use crate::error::{ApiError, Result};
use crate::transport::Transport;
use crate::value::{Reply, Value};
use crate::wire;

/// 지원되는 API 프로토콜 버전
///
/// 레거시 시스템의 버전별 다형 래퍼를 대체하는 명시적 설정값입니다.
/// 버전은 트랜잭션 생성 시점에 선택되며, 현재는 버전 2만 지원합니다.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// API 버전 2 — `<apirequest>` 엔벨로프, 명령명 단일 문자열
    #[default]
    V2,
}

/// 인증 정보 — 비밀번호 원문은 저장하지 않고 다이제스트만 보관
#[derive(Debug, Clone)]
struct Auth {
    user: String,
    pass_digest: String,
    production: bool,
}

/// 원격 API에 대한 단일 트랜잭션
///
/// # 예시
///
/// ```
/// use paneltx::transaction::Transaction;
///
/// let mut t = Transaction::new();
/// t.authenticate("migraweb", "secret", true)?;
/// t.command("WTD2_Migrate")?;
/// t.parameters([("account", "acme"), ("server", "web01.example")]);
/// let xml = t.to_request_xml()?;
/// assert!(xml.starts_with("<?xml"));
/// # Ok::<(), paneltx::ApiError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    version: ApiVersion,
    command: Option<String>,
    params: Vec<(String, Value)>,
    auth: Option<Auth>,
    debug: bool,
    lenient_types: bool,
}

/// 비밀번호의 소문자 16진 MD5 다이제스트를 계산합니다.
///
/// MD5는 상대 시스템과의 와이어 호환을 위해 보존되는 레거시 알고리즘입니다.
/// 암호학적으로 약하므로 새로운 신뢰 경계에는 절대 사용하면 안 됩니다.
fn md5_hex(password: &str) -> String {
    let digest = Md5::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// 명령명 검증: 비어 있지 않은 `[A-Za-z0-9_]+`
fn is_valid_command(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Transaction {
    /// 기본 버전([`ApiVersion::V2`])의 빈 트랜잭션을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 명시적으로 버전을 지정하여 트랜잭션을 생성합니다.
    pub fn with_version(version: ApiVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// 인증 정보를 설정합니다.
    ///
    /// 비밀번호는 즉시 MD5 다이제스트로 변환되어 원문은 보관되지 않습니다.
    /// `production`이 참이면 와이어의 `istest` 속성이 `"0"`이 됩니다 (프로토콜 특성상 반전).
    ///
    /// # 에러
    ///
    /// - [`ApiError::EmptyCredential`] — 사용자명 또는 비밀번호가 비어 있음
    pub fn authenticate(&mut self, user: &str, password: &str, production: bool) -> Result<()> {
        if user.is_empty() {
            return Err(ApiError::EmptyCredential { field: "user" });
        }
        if password.is_empty() {
            return Err(ApiError::EmptyCredential { field: "password" });
        }
        self.auth = Some(Auth {
            user: user.to_string(),
            pass_digest: md5_hex(password),
            production,
        });
        Ok(())
    }

    /// 트랜잭션의 명령을 설정합니다.
    ///
    /// # 에러
    ///
    /// - [`ApiError::InvalidCommand`] — 명령명이 `[A-Za-z0-9_]+` 형식이 아님
    pub fn command(&mut self, name: &str) -> Result<()> {
        if !is_valid_command(name) {
            return Err(ApiError::InvalidCommand {
                command: name.to_string(),
            });
        }
        self.command = Some(name.to_string());
        Ok(())
    }

    /// 파라미터 하나를 순서 보존 목록 끝에 추가합니다.
    pub fn parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.push((name.into(), value.into()));
    }

    /// 여러 파라미터를 입력 순서대로 추가합니다.
    ///
    /// 이후 호출은 항상 **추가**이며, 기존 파라미터를 대체하지 않습니다.
    pub fn parameters<N, V, I>(&mut self, pairs: I)
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        for (name, value) in pairs {
            self.parameter(name, value);
        }
    }

    /// 디버그 모드를 활성화합니다.
    ///
    /// 커밋 시 응답 해석이 완전히 우회되어, 구조화 디코딩이나 에러 감지 없이
    /// 원시 바이트가 [`Reply::Raw`]로 그대로 반환됩니다.
    pub fn enable_debug(&mut self) {
        self.debug = true;
    }

    /// 레거시 타입 호환 모드를 활성화합니다.
    ///
    /// 응답에서 알 수 없는 와이어 타입 속성을
    /// [`ApiError::UnknownWireType`] 대신 조용히 [`Value::Null`]로 매핑합니다.
    pub fn lenient_types(&mut self) {
        self.lenient_types = true;
    }

    /// 디버그 모드 활성 여부
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// 요청 엔벨로프를 직렬화합니다.
    ///
    /// 커밋과 동일한 검증을 수행하지만 I/O는 하지 않습니다 — golden 테스트와
    /// 진단 용도로 공개되어 있습니다.
    ///
    /// # 에러
    ///
    /// - [`ApiError::MissingCommand`] — 명령 미설정
    /// - [`ApiError::MissingAuth`] — 인증 미설정
    pub fn to_request_xml(&self) -> Result<String> {
        self.serialize().map(|(xml, _)| xml)
    }

    /// 검증 + 직렬화 공통 경로: 엔벨로프와 검증된 명령명을 함께 반환
    fn serialize(&self) -> Result<(String, &str)> {
        let command = self.command.as_deref().ok_or(ApiError::MissingCommand)?;
        let auth = self.auth.as_ref().ok_or(ApiError::MissingAuth)?;
        let xml = match self.version {
            ApiVersion::V2 => wire::write_envelope(
                self.debug,
                auth.production,
                &auth.user,
                &auth.pass_digest,
                &self.params,
                command,
            ),
        };
        Ok((xml, command))
    }

    /// 트랜잭션을 커밋합니다: 직렬화 → 전송 → 응답 파싱.
    ///
    /// `self`를 소비하므로 커밋된 트랜잭션은 재사용할 수 없습니다.
    /// 검증 실패는 네트워크 I/O 이전에 반환됩니다.
    ///
    /// 디버그 모드에서는 응답 바이트가 해석 없이 [`Reply::Raw`]로 반환됩니다 —
    /// 응답이 well-formed XML이 아니어도 에러가 아닙니다.
    ///
    /// # 에러
    ///
    /// - [`ApiError::MissingCommand`] / [`ApiError::MissingAuth`] — I/O 이전 검증 실패
    /// - 전송 계층([`Transport::send`])에서 발생 가능한 모든 에러
    /// - [`ApiError::Command`] — 원격 시스템의 명령 거부
    pub async fn commit<T: Transport>(self, transport: &T) -> Result<Reply> {
        let (request, command) = self.serialize()?;

        let raw = transport.send(request.into_bytes()).await?;

        if self.debug {
            return Ok(Reply::Raw(raw));
        }
        let response = wire::parse_response(&raw, command, self.lenient_types)?;
        Ok(Reply::Values(response))
    }
}
