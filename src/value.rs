//! 요청/응답 데이터의 공유 타입 정의입니다.
//!
//! [`Value`], [`Response`], [`Reply`] 등 트랜잭션과 와이어 모듈 전반에서
//! 공유되는 타입을 정의합니다.
//!
//! ## 네이티브 → 와이어 변환
//!
//! Rust 네이티브 값은 `From`/`Into` 구현을 통해 [`Value`]로 변환됩니다:
//!
//! - `&str` / `String` → [`Value::String`]
//! - `i32` / `i64` → [`Value::Int`]
//! - `f64` → [`Value::Double`]
//! - `bool` → [`Value::Bool`]
//! - `Vec<T: Into<Value>>` → 0부터 시작하는 인덱스를 멤버명으로 갖는 [`Value::Struct`]
//! - 순서 있는 키/값 쌍 → [`Value::from_pairs`]
//!
//! 변환이 정의되지 않은 형태는 컴파일 시점에 거부됩니다. 와이어 → 네이티브
//! 방향(type 속성 기반 디코딩)은 [`wire::decode_value`](crate::wire::decode_value)가 담당합니다.

/// 와이어 프로토콜의 재귀적 tagged union 값
///
/// 요청 파라미터와 디코딩된 응답 양쪽에서 사용됩니다.
/// [`Struct`](Self::Struct)의 멤버 순서는 삽입 순서 그대로 보존됩니다 —
/// 와이어 포맷이 요청 파라미터 순서에 민감하고, 직렬화 결과가 재현 가능해야 하기 때문입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL (`type="NULL"`)
    Null,
    /// 문자열 (`type="string"` 또는 type 속성 없는 텍스트)
    String(String),
    /// 정수 (`type="integer"`)
    Int(i64),
    /// 배정밀도 부동소수점 (`type="double"`)
    Double(f64),
    /// 불리언 (`type="boolean"`)
    Bool(bool),
    /// 순서 보존 구조체 (`<struct><member>...</member></struct>`)
    ///
    /// 와이어에서는 배열과 매핑 모두 이 형태로 표현됩니다.
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// null 여부 확인
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 문자열 값이면 `&str`로 반환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 정수 값이면 `i64`로 반환
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// 부동소수점 값이면 `f64`로 반환
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// 불리언 값이면 `bool`로 반환
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// 구조체 값에서 멤버를 이름으로 검색
    ///
    /// 구조체가 아니거나 해당 멤버가 없으면 `None`을 반환합니다.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(members) => members
                .iter()
                .find(|(member_name, _)| member_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// 순서 있는 키/값 쌍으로부터 [`Value::Struct`]를 생성합니다.
    ///
    /// 입력 순서가 멤버 순서로 그대로 보존됩니다.
    ///
    /// # 예시
    ///
    /// ```
    /// use paneltx::value::Value;
    ///
    /// let v = Value::from_pairs([("a", Value::Int(1)), ("b", Value::from("x"))]);
    /// assert_eq!(v.get("a"), Some(&Value::Int(1)));
    /// assert_eq!(v.get("b").and_then(|b| b.as_str()), Some("x"));
    /// ```
    pub fn from_pairs<N, V, I>(pairs: I) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        Value::Struct(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// 시퀀스는 0부터 시작하는 인덱스를 멤버명으로 갖는 구조체로 변환됩니다.
///
/// 와이어 포맷에는 배열 개념이 없으므로, 원소 순서 그대로
/// `"0"`, `"1"`, ... 멤버를 가진 [`Value::Struct`]가 됩니다.
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Struct(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item.into()))
                .collect(),
        )
    }
}

/// 파싱된 응답: 명령명 → [`Value`] 매핑 (순서 보존)
///
/// [`wire::parse_response`](crate::wire::parse_response)만이 이 타입을 생성하며,
/// 파서 밖에서 부분적으로 변경되지 않습니다. 같은 명령명으로 여러 결과 값이
/// 디코딩되면 나중 값이 이전 값을 대체합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    values: Vec<(String, Value)>,
}

impl Response {
    /// 명령명으로 값을 검색
    pub fn get(&self, command: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == command)
            .map(|(_, value)| value)
    }

    /// 명령명으로 값을 꺼내 소유권을 넘깁니다.
    pub fn into_value(self, command: &str) -> Option<Value> {
        self.values
            .into_iter()
            .find(|(name, _)| name == command)
            .map(|(_, value)| value)
    }

    /// 엔트리 수
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 비어 있는지 확인
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(명령명, 값)` 쌍의 순서 보존 이터레이터
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// 값을 추가합니다. 같은 명령명이 이미 있으면 대체합니다.
    pub(crate) fn insert(&mut self, command: String, value: Value) {
        if let Some(entry) = self.values.iter_mut().find(|(name, _)| *name == command) {
            entry.1 = value;
        } else {
            self.values.push((command, value));
        }
    }
}

/// 커밋 결과: 파싱된 응답 또는 디버그 모드의 원시 페이로드
///
/// 디버그 모드가 활성화된 트랜잭션은 구조화 디코딩과 에러 감지를 모두
/// 건너뛰고 응답 바이트를 그대로 반환합니다. 이는 명시적 우회이지
/// 파싱 실패 시의 폴백 경로가 아닙니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 정상 파싱된 응답
    Values(Response),
    /// 디버그 모드의 원시 응답 바이트 (well-formed XML이 아닐 수도 있음)
    Raw(Vec<u8>),
}

impl Reply {
    /// 파싱된 응답이면 참조 반환
    pub fn values(&self) -> Option<&Response> {
        match self {
            Reply::Values(response) => Some(response),
            Reply::Raw(_) => None,
        }
    }

    /// 파싱된 응답이면 소유권 반환
    pub fn into_values(self) -> Option<Response> {
        match self {
            Reply::Values(response) => Some(response),
            Reply::Raw(_) => None,
        }
    }

    /// 원시 디버그 페이로드이면 바이트 슬라이스 반환
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Reply::Raw(bytes) => Some(bytes.as_slice()),
            Reply::Values(_) => None,
        }
    }
}
