//! 통합 테스트 — 모듈 간 연동을 검증합니다.
//!
//! - 스텁 전송을 통한 커밋 전체 플로우 (빌드 → 전송 → 파싱)
//! - 타입 지정 명령 래퍼가 전송하는 와이어 바이트 검증
//! - 인코딩/디코딩 라운드트립
//! - 에러 우선순위와 디버그 모드 우회
//! - 검증 실패 시 I/O가 발생하지 않음

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[cfg(feature = "client")]
use paneltx::client::{ApiClient, ApiConfig};
use paneltx::error::{ApiError, ErrorKind};
use paneltx::transaction::Transaction;
use paneltx::transport::Transport;
use paneltx::value::{Reply, Value};
use paneltx::wire::{parse_response, write_value};
use paneltx::Result;

/// 고정 응답을 돌려주는 스텁 전송 — 호출 횟수와 마지막 요청을 기록
struct StubTransport {
    canned: Vec<u8>,
    calls: AtomicUsize,
}

impl StubTransport {
    fn new(canned: &[u8]) -> Self {
        Self {
            canned: canned.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for StubTransport {
    async fn send(&self, _body: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.canned.clone())
    }
}

/// 마지막 요청 바디를 기록하는 스텁 전송 — 래퍼가 내보낸 바이트 검증용
struct RecordingTransport {
    canned: Vec<u8>,
    last_request: Mutex<Vec<u8>>,
}

impl RecordingTransport {
    fn new(canned: &[u8]) -> Self {
        Self {
            canned: canned.to_vec(),
            last_request: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> String {
        String::from_utf8(self.last_request.lock().unwrap().clone()).unwrap()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        *self.last_request.lock().unwrap() = body;
        Ok(self.canned.clone())
    }
}

/// 항상 전송 에러를 반환하는 스텁
struct FailingTransport;

impl Transport for FailingTransport {
    async fn send(&self, _body: Vec<u8>) -> Result<Vec<u8>> {
        Err(ApiError::UnknownWireType {
            type_attr: "unreachable".to_string(),
        })
    }
}

fn migrate_transaction() -> Transaction {
    let mut t = Transaction::new();
    t.authenticate("migraweb", "secret", true).unwrap();
    t.command("WTD2_Migrate").unwrap();
    t.parameters([
        ("account", Value::from("acme")),
        ("server", Value::from("web01.example")),
        ("new_server", Value::from("web02.example")),
    ]);
    t
}

#[tokio::test]
async fn end_to_end_migrate_returns_ok_mapping() {
    let stub = StubTransport::new(
        b"<apiresponse><result><value type=\"string\">OK</value></result></apiresponse>",
    );
    let reply = migrate_transaction().commit(&stub).await.unwrap();

    let response = reply.into_values().expect("expected parsed values");
    assert_eq!(
        response.get("WTD2_Migrate").and_then(|v| v.as_str()),
        Some("OK")
    );
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn commit_without_auth_fails_before_any_io() {
    let stub = StubTransport::new(b"<apiresponse/>");
    let mut t = Transaction::new();
    t.command("WTD2_Migrate").unwrap();

    let err = t.commit(&stub).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingAuth));
    assert_eq!(err.kind(), ErrorKind::Validation);
    // 검증 실패는 전송 호출 없이 반환되어야 함
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn commit_without_command_fails_before_any_io() {
    let stub = StubTransport::new(b"<apiresponse/>");
    let mut t = Transaction::new();
    t.authenticate("migraweb", "secret", true).unwrap();

    let err = t.commit(&stub).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingCommand));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn command_error_takes_precedence_over_result_values() {
    let stub = StubTransport::new(
        b"<apiresponse>\
          <result><value type=\"string\">OK</value></result>\
          <ErroMsg>server mismatch</ErroMsg>\
          </apiresponse>",
    );
    let err = migrate_transaction().commit(&stub).await.unwrap_err();

    match err {
        ApiError::Command { command, message } => {
            assert_eq!(command, "WTD2_Migrate");
            assert_eq!(message, "server mismatch");
        }
        other => panic!("expected Command, got {other:?}"),
    }
}

#[tokio::test]
async fn debug_mode_returns_raw_bytes_even_for_broken_xml() {
    // well-formed XML이 아닌 페이로드도 디버그 모드에서는 에러 없이 그대로 반환
    let broken = b"not xml at all <<<";
    let stub = StubTransport::new(broken);

    let mut t = migrate_transaction();
    t.enable_debug();
    let reply = t.commit(&stub).await.unwrap();

    assert_eq!(reply.raw(), Some(&broken[..]));
}

#[tokio::test]
async fn debug_mode_skips_error_detection() {
    // 디버그 모드는 폴백이 아니라 명시적 우회 — 에러 요소도 해석하지 않음
    let stub = StubTransport::new(b"<apiresponse><ErroMsg>rejected</ErroMsg></apiresponse>");

    let mut t = migrate_transaction();
    t.enable_debug();
    let reply = t.commit(&stub).await.unwrap();

    assert!(matches!(reply, Reply::Raw(_)));
}

#[tokio::test]
async fn transport_errors_propagate_from_commit() {
    let err = migrate_transaction()
        .commit(&FailingTransport)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn malformed_response_is_transport_kind() {
    let stub = StubTransport::new(b"<broken");
    let err = migrate_transaction().commit(&stub).await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedXml(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn roundtrip_struct_preserves_order_and_kinds() {
    // {"a": 1, "b": "x", "c": true}를 인코딩하고, 동등한 typed XML을
    // 디코딩하면 같은 순서/같은 종류의 세 멤버가 재현되어야 함
    let original = Value::from_pairs([
        ("a", Value::Int(1)),
        ("b", Value::from("x")),
        ("c", Value::from(true)),
    ]);

    let mut encoded = String::new();
    write_value(&mut encoded, &original);
    assert_eq!(
        encoded,
        "<value><struct>\
         <member><name>a</name><value>1</value></member>\
         <member><name>b</name><value>x</value></member>\
         <member><name>c</name><value>true</value></member>\
         </struct></value>"
    );

    let typed = b"<apiresponse><result><value type=\"array\"><struct>\
                  <member><name>a</name><value type=\"integer\">1</value></member>\
                  <member><name>b</name><value type=\"string\">x</value></member>\
                  <member><name>c</name><value type=\"boolean\">1</value></member>\
                  </struct></value></result></apiresponse>";
    let response = parse_response(typed, "CMD", false).unwrap();
    let decoded = response.get("CMD").unwrap();

    match decoded {
        Value::Struct(members) => {
            let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
            assert_eq!(members[0].1, Value::Int(1));
            assert_eq!(members[1].1, Value::String("x".to_string()));
            assert_eq!(members[2].1, Value::Bool(true));
        }
        other => panic!("expected struct, got {other:?}"),
    }
}

#[tokio::test]
async fn indexed_sequence_parameter_serializes_in_order() {
    let stub = StubTransport::new(b"<apiresponse/>");
    let mut t = Transaction::new();
    t.authenticate("migraweb", "secret", true).unwrap();
    t.command("WTD2_AccountInfo").unwrap();
    t.parameter("ArDadosColetar", vec!["StFormaPagamento", "StStatus"]);

    let xml = t.to_request_xml().unwrap();
    assert!(xml.contains(
        "<member><name>0</name><value>StFormaPagamento</value></member>\
         <member><name>1</name><value>StStatus</value></member>"
    ));

    // 커밋도 정상 동작해야 함 (빈 결과)
    let reply = t.commit(&stub).await.unwrap();
    assert!(reply.into_values().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_wire_type_strict_vs_lenient() {
    let canned = b"<apiresponse><result>\
                   <value type=\"array\"><struct>\
                   <member><name>odd</name><value type=\"resource\">?</value></member>\
                   </struct></value>\
                   </result></apiresponse>";

    // strict (기본): UnknownWireType 에러
    let stub = StubTransport::new(canned);
    let mut t = Transaction::new();
    t.authenticate("migraweb", "secret", true).unwrap();
    t.command("WTD2_AccountInfo").unwrap();
    let err = t.commit(&stub).await.unwrap_err();
    assert!(matches!(err, ApiError::UnknownWireType { .. }));

    // lenient: 조용히 null
    let stub = StubTransport::new(canned);
    let mut t = Transaction::new();
    t.authenticate("migraweb", "secret", true).unwrap();
    t.command("WTD2_AccountInfo").unwrap();
    t.lenient_types();
    let reply = t.commit(&stub).await.unwrap();
    let response = reply.into_values().unwrap();
    let odd = response.get("WTD2_AccountInfo").and_then(|v| v.get("odd"));
    assert_eq!(odd, Some(&Value::Null));
}

// -- 명령 래퍼 와이어 바이트 테스트 --

#[cfg(feature = "client")]
fn recording_client(canned: &[u8]) -> ApiClient<RecordingTransport> {
    ApiClient::with_transport(
        ApiConfig::new("api.example.net", "migraweb", "secret"),
        RecordingTransport::new(canned),
    )
}

#[cfg(feature = "client")]
fn client_request(client: &ApiClient<RecordingTransport>) -> String {
    client.transport().last_request()
}

#[cfg(feature = "client")]
const EMPTY_OK: &[u8] = b"<apiresponse><result/></apiresponse>";

#[cfg(feature = "client")]
#[tokio::test]
async fn replace_host_sends_search_zone_and_command() {
    let client = recording_client(EMPTY_OK);
    client
        .replace_host("acme.example", "web01", "web02")
        .await
        .unwrap();

    let sent = client_request(&client);
    assert!(sent.contains("<param><name>domain</name><value>acme.example</value></param>"));
    assert!(sent.contains("<param><name>host</name><value>web01</value></param>"));
    assert!(sent.contains("<param><name>new_host</name><value>web02</value></param>"));
    // search_zone은 항상 참으로 나가야 함
    assert!(sent.contains("<name>search_zone</name><value>true</value>"));
    assert!(sent.contains("<command name=\"DNS_ReplaceHost\"/>"));
}

#[cfg(feature = "client")]
#[tokio::test]
async fn account_info_sends_legacy_parameter_name() {
    let client = recording_client(EMPTY_OK);
    client.account_info("acme").await.unwrap();

    let sent = client_request(&client);
    assert!(sent.contains("<param><name>StAccount</name><value>acme</value></param>"));
    assert!(sent.contains("<command name=\"WTD2_AccountInfo\"/>"));
}

#[cfg(feature = "client")]
#[tokio::test]
async fn recreate_sends_short_server_label() {
    let client = recording_client(EMPTY_OK);
    client.recreate("acme", "web01.example.net").await.unwrap();

    let sent = client_request(&client);
    // FQDN이 아니라 첫 레이블만 나가야 함
    assert!(sent.contains("<param><name>server</name><value>web01</value></param>"));
    assert!(!sent.contains("web01.example.net"));
    assert!(sent.contains("<command name=\"WTD2_Recreate\"/>"));
}

#[cfg(feature = "client")]
#[tokio::test]
async fn migrate_sends_parameters_in_declared_order() {
    let client = recording_client(
        b"<apiresponse><result><value type=\"string\">OK</value></result></apiresponse>",
    );
    let result = client
        .migrate("acme", "web01.example", "web02.example")
        .await
        .unwrap();
    assert_eq!(result.as_ref().and_then(|v| v.as_str()), Some("OK"));

    let sent = client_request(&client);
    let account = sent.find("<name>account</name>").unwrap();
    let server = sent.find("<name>server</name>").unwrap();
    let new_server = sent.find("<name>new_server</name>").unwrap();
    assert!(account < server && server < new_server);
    assert!(sent.contains("<auth user=\"migraweb\" pass=\"5ebe2294ecd0e0f08eab7690d2a6ee69\"/>"));
}

#[test]
fn envelope_digest_never_contains_plaintext_password() {
    let t = migrate_transaction();
    let xml = t.to_request_xml().unwrap();
    assert!(xml.contains("pass=\"5ebe2294ecd0e0f08eab7690d2a6ee69\""));
    assert!(!xml.contains("secret"));
    assert!(xml.contains("user=\"migraweb\""));
}
