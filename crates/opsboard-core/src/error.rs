//! OPSBOARD 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.
//! catch 경계에서는 [`describe_error`]로 한 번만 정규화한다.

use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 관계형 저장소 쿼리 실패
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 캐시 저장소 에러 (드라이버 에러 코드 포함 가능)
    #[error("{message}")]
    Cache {
        /// 에러 메시지
        message: String,
        /// 드라이버 에러 코드 (예: "ECONNREFUSED")
        code: Option<String>,
    },

    /// 작업 큐 조회 실패
    #[error("큐 에러: {0}")]
    Queue(String),

    /// 실행 타임아웃
    #[error("Ping timeout after {timeout_ms}ms")]
    Timeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 서비스 일시 불가 (협력 시스템 미연결)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 캐시 에러 생성 (코드 없음)
    pub fn cache(message: impl Into<String>) -> Self {
        CoreError::Cache {
            message: message.into(),
            code: None,
        }
    }

    /// 캐시 에러 생성 (드라이버 코드 포함)
    pub fn cache_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        CoreError::Cache {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// 에러 코드 (있는 경우)
    pub fn code(&self) -> Option<String> {
        match self {
            CoreError::Cache { code, .. } => code.clone(),
            CoreError::Timeout { .. } => Some("ETIMEDOUT".to_string()),
            CoreError::Io(e) => Some(format!("{:?}", e.kind())),
            _ => None,
        }
    }
}

/// 정규화된 에러 설명
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescription {
    /// 사람이 읽을 수 있는 메시지 (비어 있지 않음)
    pub message: String,
    /// 에러 코드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// 원인 체인 (`source()`를 따라 줄 단위로 연결)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// catch 경계에서 에러를 `{message, code?, stack?}`로 정규화
pub fn describe_error(err: &CoreError) -> ErrorDescription {
    let message = err.to_string();
    let message = if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    };

    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }

    ErrorDescription {
        message,
        code: err.code(),
        stack: if chain.is_empty() {
            None
        } else {
            Some(chain.join("\n"))
        },
    }
}
