//! 와이어 프로토콜에서 사용하는 고정 문자열과 기본값 상수를 정의합니다.

/// 엔드포인트 폴더 뒤에 붙는 요청 페이지 이름
pub const INDEX_PAGE: &str = "index.php";

/// 요청 본문의 Content-Type
pub const CONTENT_TYPE_XML: &str = "text/xml";

/// 요청 XML 선언 (상대 시스템과 동일한 compact 출력)
pub const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// 응답에서 명령 거부를 나타내는 에러 요소 이름
///
/// 이 요소가 문서 내 어디에든 존재하면 결과 값보다 우선하여
/// [`ApiError::Command`](crate::error::ApiError::Command)로 해석됩니다.
pub const ERROR_ELEMENT: &str = "ErroMsg";

/// 응답에서 결과 값을 감싸는 요소 이름 (`<result><value .../></result>`)
pub const RESULT_ELEMENT: &str = "result";

/// 기본 엔드포인트 폴더
pub const DEFAULT_FOLDER: &str = "/";

/// 전송 계층의 기본 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 와이어 명령 문자열 상수
///
/// 레거시 시스템의 동적 메서드명 변환 대신, 논리 작업명을 고정 와이어
/// 명령 문자열로 매핑하는 명시적 테이블입니다.
pub mod commands {
    /// 계정 정보 조회
    pub const ACCOUNT_INFO: &str = "WTD2_AccountInfo";
    /// 계정 재생성
    pub const RECREATE: &str = "WTD2_Recreate";
    /// 계정 마이그레이션
    pub const MIGRATE: &str = "WTD2_Migrate";
    /// 서버 정보 조회
    pub const SERVER_INFO: &str = "WTD2_ServerInfo";
    /// DNS 호스트 교체
    pub const DNS_REPLACE_HOST: &str = "DNS_ReplaceHost";
}
