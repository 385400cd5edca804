//! # paneltx
//!
//! 레거시 호스팅 제어판 XML API의 트랜잭션 클라이언트 라이브러리.
//!
//! 커스텀 `<apirequest>` 엔벨로프를 빌드하고, MD5 다이제스트로 인증하며,
//! 이기종 파라미터 값을 직렬화해 HTTP로 전송한 뒤, type 속성이 붙은
//! 구조화 XML 응답을 파싱합니다. 전송 실패와 업무 수준 명령 거부를
//! 구분하는 것이 핵심 설계입니다.
//!
//! ## 모듈 구조
//!
//! - [`constants`] — 와이어 고정 문자열, 기본값, 명령 테이블
//! - [`error`] — 에러 타입과 분류 ([`ApiError`], [`ErrorKind`])
//! - [`value`] — 값 모델 ([`Value`], [`Response`], [`Reply`])
//! - [`wire`] — XML 엔벨로프 쓰기 + 응답 디코딩
//! - [`transaction`] — 트랜잭션 빌더 ([`Transaction`], [`ApiVersion`])
//! - [`transport`] — 전송 시임 ([`Transport`], [`HttpTransport`](transport::HttpTransport))
//! - [`client`] — 고수준 클라이언트 + 타입 지정 명령 래퍼 *(feature `"client"` 활성화 시)*
//!
//! ## 사용 예시
//!
//! ```
//! use paneltx::{Transaction, Value};
//!
//! let mut t = Transaction::new();
//! t.authenticate("migraweb", "secret", true)?;
//! t.command("WTD2_Migrate")?;
//! t.parameters([
//!     ("account", Value::from("acme")),
//!     ("server", Value::from("web01.example")),
//!     ("new_server", Value::from("web02.example")),
//! ]);
//! let xml = t.to_request_xml()?;
//! assert!(xml.contains("<command name=\"WTD2_Migrate\"/>"));
//! # Ok::<(), paneltx::ApiError>(())
//! ```
//!
//! 트랜잭션은 커밋으로 정확히 한 번 소비됩니다. 재시도, 연결 풀링, 속도
//! 제한, 다중 트랜잭션 배칭은 이 크레이트의 범위 밖이며 호출자가 바깥
//! 계층에서 결정합니다.

#[cfg(feature = "client")]
pub mod client;
pub mod constants;
pub mod error;
pub mod transaction;
pub mod transport;
pub mod value;
pub mod wire;

// NOTE: Selective re-export — only expose commonly used types
pub use error::{ApiError, ErrorKind, Result};
pub use transaction::{ApiVersion, Transaction};
pub use transport::Transport;
pub use value::{Reply, Response, Value};

#[cfg(feature = "client")]
pub use client::{ApiClient, ApiConfig};
#[cfg(feature = "client")]
pub use transport::HttpTransport;
