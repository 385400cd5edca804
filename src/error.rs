//! API 클라이언트의 에러 타입 계층 구조를 정의합니다.
//!
//! 모든 에러는 [`ApiError`] enum으로 표현되며, [`thiserror`]를 통해
//! `Display` 및 `Error` 트레이트가 자동 구현됩니다.
//!
//! 에러는 세 가지 분류([`ErrorKind`]) 중 하나에 속합니다:
//!
//! - [`Validation`](ErrorKind::Validation) — I/O 이전에 감지되는 잘못된 트랜잭션 구성.
//!   호출자의 버그이므로 재시도 대상이 아닙니다.
//! - [`Transport`](ErrorKind::Transport) — 네트워크/HTTP/XML 무결성 실패.
//!   재시도 여부는 호출자의 정책입니다.
//! - [`Command`](ErrorKind::Command) — 원격 시스템이 명령을 거부한 업무 수준 실패.
//!   명령명과 메시지를 원문 그대로 전달하며, 자동으로 재시도하지 않습니다.

/// API 클라이언트의 최상위 에러 타입
///
/// 트랜잭션 검증, 응답 XML 디코딩, HTTP/네트워크 에러, 원격 명령 거부를 모두 포괄합니다.
/// HTTP/네트워크 에러 변형은 feature `"client"` 활성화 시에만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 인증 정보의 필수 필드가 비어 있음
    #[error("invalid credentials: {field} must not be empty")]
    EmptyCredential { field: &'static str },

    /// 명령명이 허용 형식(`[A-Za-z0-9_]+`)에 맞지 않음
    #[error("invalid command name {command:?}: only [A-Za-z0-9_] characters are allowed")]
    InvalidCommand { command: String },

    /// 명령이 설정되지 않은 상태에서 커밋 시도
    #[error("cannot commit: no command has been set")]
    MissingCommand,

    /// 인증 정보가 설정되지 않은 상태에서 커밋 시도
    #[error("cannot commit: authenticate() has not been called")]
    MissingAuth,

    /// 응답 value 요소의 type 속성이 알려진 와이어 타입과 일치하지 않음
    #[error("unknown wire type attribute {type_attr:?}")]
    UnknownWireType { type_attr: String },

    /// 숫자 타입(`integer`/`double`)으로 표시된 값의 텍스트를 파싱할 수 없음
    #[error("invalid {wire_type} value in response: {text:?}")]
    InvalidTypedValue {
        wire_type: &'static str,
        text: String,
    },

    /// 응답 바이트가 유효한 UTF-8이 아님
    #[error("response is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// 응답 XML 파싱 실패 (상대 시스템의 응답 자체가 깨진 경우)
    #[error("malformed response XML: {0}")]
    MalformedXml(#[from] roxmltree::Error),

    /// HTTP 클라이언트 에러 (reqwest 래핑 — 연결 실패, 타임아웃 포함)
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 예기치 않은 HTTP 상태 코드
    #[cfg(feature = "client")]
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },

    /// 원격 시스템이 반환한 명령 거부 (예: 존재하지 않는 계정, 서버 불일치)
    #[error("{command}: {message}")]
    Command { command: String, message: String },
}

/// 에러의 재시도 정책상 분류
///
/// [`ApiError::kind`]가 반환하며, 더 이상 세분화되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// I/O 이전의 잘못된 트랜잭션 — 재시도 불가
    Validation,
    /// 네트워크/HTTP/XML 무결성 실패 — 재시도는 호출자 정책
    Transport,
    /// 원격 시스템의 명령 거부 — 자동 재시도 금지
    Command,
}

impl ApiError {
    /// 에러의 분류를 반환합니다.
    ///
    /// # 예시
    ///
    /// ```
    /// use paneltx::error::{ApiError, ErrorKind};
    ///
    /// let err = ApiError::MissingAuth;
    /// assert_eq!(err.kind(), ErrorKind::Validation);
    ///
    /// let err = ApiError::Command {
    ///     command: "WTD2_Migrate".to_string(),
    ///     message: "unknown account".to_string(),
    /// };
    /// assert_eq!(err.kind(), ErrorKind::Command);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::EmptyCredential { .. }
            | ApiError::InvalidCommand { .. }
            | ApiError::MissingCommand
            | ApiError::MissingAuth => ErrorKind::Validation,
            ApiError::UnknownWireType { .. }
            | ApiError::InvalidTypedValue { .. }
            | ApiError::InvalidUtf8(_)
            | ApiError::MalformedXml(_) => ErrorKind::Transport,
            #[cfg(feature = "client")]
            ApiError::Http(_) | ApiError::HttpStatus { .. } => ErrorKind::Transport,
            ApiError::Command { .. } => ErrorKind::Command,
        }
    }
}

/// [`ApiError`]를 사용하는 편의 Result 타입 별칭
pub type Result<T> = std::result::Result<T, ApiError>;
