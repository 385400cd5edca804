//! 와이어 포맷 모듈 — XML 요청 엔벨로프 쓰기와 응답 값 디코딩
//!
//! 요청 방향은 상대 시스템과 바이트 단위로 호환되는 compact XML을 직접
//! 조립하고, 응답 방향은 `roxmltree`로 문서를 파싱한 뒤 type 속성 기반으로
//! [`Value`]를 디코딩합니다.
//!
//! ## 요청 엔벨로프
//!
//! 요소 순서가 의미를 가집니다 (삽입 순서 그대로 직렬화):
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <apirequest>
//!   <debug mode="0|1"/>
//!   <istest value="0|1"/>            <!-- 0 = production (반전 주의) -->
//!   <auth user="..." pass="md5hex"/>
//!   <param><name>...</name><value>...</value></param>   <!-- 0..N개 -->
//!   <command name="CMD"/>
//! </apirequest>
//! ```
//!
//! ## 응답 디코딩
//!
//! - [`parse_response`] — 에러 요소 감지 + `result/value` 디코딩
//! - [`decode_value`] — type 속성 기반 단일 값 디코딩

use crate::constants::{ERROR_ELEMENT, RESULT_ELEMENT, XML_DECL};
use crate::error::{ApiError, Result};
use crate::value::{Response, Value};

/// XML 텍스트/속성 컨텍스트 공용 이스케이프
///
/// `&`, `<`, `>`, `"`, `'`를 엔티티로 치환하며 나머지는 그대로 통과시킵니다.
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
}

/// [`Value`] 하나를 `<value>` 요소로 직렬화합니다.
///
/// 요청 방향에서는 type 속성을 붙이지 않습니다 (상대 시스템과 동일).
/// 원시 값은 텍스트로, [`Value::Null`]은 빈 요소로, [`Value::Struct`]는
/// `<struct><member>...</member></struct>` 중첩으로 표현됩니다.
pub fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("<value/>"),
        Value::String(s) => {
            out.push_str("<value>");
            push_escaped(out, s);
            out.push_str("</value>");
        }
        Value::Int(v) => {
            out.push_str("<value>");
            out.push_str(&v.to_string());
            out.push_str("</value>");
        }
        Value::Double(v) => {
            out.push_str("<value>");
            out.push_str(&v.to_string());
            out.push_str("</value>");
        }
        Value::Bool(v) => {
            out.push_str("<value>");
            out.push_str(if *v { "true" } else { "false" });
            out.push_str("</value>");
        }
        Value::Struct(members) => {
            out.push_str("<value><struct>");
            for (name, member_value) in members {
                out.push_str("<member><name>");
                push_escaped(out, name);
                out.push_str("</name>");
                write_value(out, member_value);
                out.push_str("</member>");
            }
            out.push_str("</struct></value>");
        }
    }
}

/// 요청 엔벨로프 전체를 직렬화합니다.
///
/// 인자 검증은 호출자([`Transaction`](crate::transaction::Transaction))의
/// 책임이며, 여기서는 순수하게 바이트 조립만 수행합니다.
///
/// `istest`의 value는 `production`이 참일 때 `"0"`입니다 — 직관과 반대이지만
/// 외부 프로토콜의 고정된 특성이므로 그대로 보존합니다.
pub fn write_envelope(
    debug: bool,
    production: bool,
    user: &str,
    pass_digest: &str,
    params: &[(String, Value)],
    command: &str,
) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(XML_DECL);
    out.push_str("<apirequest>");

    out.push_str("<debug mode=\"");
    out.push(if debug { '1' } else { '0' });
    out.push_str("\"/>");

    // NOTE: inverted on the wire — 0 means production
    out.push_str("<istest value=\"");
    out.push(if production { '0' } else { '1' });
    out.push_str("\"/>");

    out.push_str("<auth user=\"");
    push_escaped(&mut out, user);
    out.push_str("\" pass=\"");
    push_escaped(&mut out, pass_digest);
    out.push_str("\"/>");

    for (name, value) in params {
        out.push_str("<param><name>");
        push_escaped(&mut out, name);
        out.push_str("</name>");
        write_value(&mut out, value);
        out.push_str("</param>");
    }

    out.push_str("<command name=\"");
    push_escaped(&mut out, command);
    out.push_str("\"/>");

    out.push_str("</apirequest>");
    out
}

/// 응답의 `<value>` 요소 하나를 type 속성에 따라 [`Value`]로 디코딩합니다.
///
/// 매핑:
///
/// | type 속성                  | 결과                  |
/// |----------------------------|-----------------------|
/// | `string` / 속성 없음       | [`Value::String`]     |
/// | `integer`                  | [`Value::Int`]        |
/// | `double`                   | [`Value::Double`]     |
/// | `boolean`                  | [`Value::Bool`]       |
/// | `NULL`                     | [`Value::Null`]       |
/// | `array` / struct 자식      | [`Value::Struct`] 재귀 |
/// | `array` (struct 자식 없음) | 빈 [`Value::Struct`]  |
///
/// struct 자식 없는 `array`는 빈 컬렉션으로 해석합니다 — 레거시 디코더는
/// 이 경우 요소 텍스트로 폴백했지만, 구조적 타입 표시를 우선합니다.
///
/// boolean 텍스트는 `"1"` 또는 `"true"`(ASCII 대소문자 무시)만 참으로 해석합니다.
///
/// `lenient`가 거짓이면 알 수 없는 type 속성은
/// [`ApiError::UnknownWireType`]로 실패합니다. 참이면 레거시 호환 모드로,
/// 알 수 없는 타입을 조용히 [`Value::Null`]로 매핑합니다 — 이는 의도적으로
/// 분리된 호환 동작이며 기본값이 아닙니다.
///
/// # 에러
///
/// - [`ApiError::UnknownWireType`] — 알 수 없는 type 속성 (strict 모드)
/// - [`ApiError::InvalidTypedValue`] — `integer`/`double` 텍스트 파싱 실패
pub fn decode_value(node: roxmltree::Node<'_, '_>, lenient: bool) -> Result<Value> {
    // NOTE: a struct child wins over any type attribute (matches the legacy decoder)
    if let Some(struct_node) = node.children().find(|n| n.has_tag_name("struct")) {
        let mut members = Vec::new();
        for member in struct_node.children().filter(|n| n.has_tag_name("member")) {
            let name = member
                .children()
                .find(|n| n.has_tag_name("name"))
                .and_then(|n| n.text())
                .unwrap_or_default()
                .to_string();
            let value = match member.children().find(|n| n.has_tag_name("value")) {
                Some(value_node) => decode_value(value_node, lenient)?,
                None => Value::Null,
            };
            members.push((name, value));
        }
        return Ok(Value::Struct(members));
    }

    let text = node.text().unwrap_or_default();
    match node.attribute("type") {
        None | Some("string") => Ok(Value::String(text.to_string())),
        Some("integer") => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ApiError::InvalidTypedValue {
                wire_type: "integer",
                text: text.to_string(),
            }),
        Some("double") => text
            .trim()
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| ApiError::InvalidTypedValue {
                wire_type: "double",
                text: text.to_string(),
            }),
        Some("boolean") => {
            let trimmed = text.trim();
            Ok(Value::Bool(
                trimmed == "1" || trimmed.eq_ignore_ascii_case("true"),
            ))
        }
        Some("NULL") => Ok(Value::Null),
        // array without a struct child: empty collection
        Some("array") => Ok(Value::Struct(Vec::new())),
        Some(other) => {
            if lenient {
                Ok(Value::Null)
            } else {
                Err(ApiError::UnknownWireType {
                    type_attr: other.to_string(),
                })
            }
        }
    }
}

/// 응답 바이트를 파싱하여 [`Response`]를 생성합니다.
///
/// 1. UTF-8 검증 후 XML 문서로 파싱 — 실패는 전송 계층에 준하는
///    무결성 에러로 분류됩니다 (상대 시스템의 응답 자체가 깨진 것).
/// 2. [`ERROR_ELEMENT`]가 문서 내 **어디에든** 존재하면 결과 값 유무와
///    무관하게 [`ApiError::Command`]로 중단합니다.
/// 3. 그 외에는 각 `result/value` 요소를 디코딩하여 `command` 이름으로
///    매핑에 넣습니다 (같은 이름의 나중 값이 이전 값을 대체).
///
/// 디버그 모드의 원시 우회는 이 함수에 진입하기 전,
/// [`Transaction::commit`](crate::transaction::Transaction::commit)에서 처리됩니다.
///
/// # 에러
///
/// - [`ApiError::InvalidUtf8`] / [`ApiError::MalformedXml`] — 응답 무결성 실패
/// - [`ApiError::Command`] — 원격 시스템의 명령 거부
/// - [`decode_value`]에서 발생 가능한 모든 에러
pub fn parse_response(raw: &[u8], command: &str, lenient: bool) -> Result<Response> {
    let text = std::str::from_utf8(raw)?;
    let doc = roxmltree::Document::parse(text)?;

    if let Some(error_node) = doc.descendants().find(|n| n.has_tag_name(ERROR_ELEMENT)) {
        return Err(ApiError::Command {
            command: command.to_string(),
            message: error_node.text().unwrap_or_default().trim().to_string(),
        });
    }

    let mut response = Response::default();
    for result in doc.descendants().filter(|n| n.has_tag_name(RESULT_ELEMENT)) {
        for value_node in result.children().filter(|n| n.has_tag_name("value")) {
            let value = decode_value(value_node, lenient)?;
            response.insert(command.to_string(), value);
        }
    }
    Ok(response)
}
