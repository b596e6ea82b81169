//! 캐시 저장소 모델.
//!
//! 연결 상태, 헬스 프로브 결과(합 타입), 캐시 삭제 결과.

use serde::ser::Serializer;
use serde::Serialize;
use std::fmt;

/// 캐시 클라이언트 연결 라이프사이클 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// 연결 대기 (lazy connect)
    Wait,
    /// 연결 중
    Connecting,
    /// 소켓 연결됨 (명령 처리 가능)
    Connect,
    /// 준비 완료
    Ready,
    /// 재연결 시도 중
    Reconnecting,
    /// 연결 닫힘
    Close,
    /// 종료됨 (재연결 없음)
    End,
}

impl CacheStatus {
    /// 닫힘/종료 상태
    pub fn is_closed(self) -> bool {
        matches!(self, CacheStatus::Close | CacheStatus::End)
    }

    /// 아직 연결 중인 상태
    pub fn is_pending(self) -> bool {
        matches!(self, CacheStatus::Wait | CacheStatus::Connecting)
    }

    /// 파괴적 명령을 보낼 수 있는 상태
    pub fn accepts_commands(self) -> bool {
        matches!(self, CacheStatus::Ready | CacheStatus::Connect)
    }

    /// 상태 문자열
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Wait => "wait",
            CacheStatus::Connecting => "connecting",
            CacheStatus::Connect => "connect",
            CacheStatus::Ready => "ready",
            CacheStatus::Reconnecting => "reconnecting",
            CacheStatus::Close => "close",
            CacheStatus::End => "end",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 캐시 헬스 프로브 결과
///
/// 성공 필드는 `Connected`에만 존재하므로 호출자는 반드시 variant를 확인해야 한다.
/// 직렬화 시 `connected: true|false` 태그가 붙는다.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStats {
    Connected(CacheHealth),
    Disconnected(CacheFailure),
}

impl CacheStats {
    /// 미연결 결과 생성
    pub fn disconnected(error: impl Into<String>, status: Option<&str>) -> Self {
        CacheStats::Disconnected(CacheFailure {
            error: error.into(),
            status: status.map(str::to_string),
        })
    }

    /// 연결 여부
    pub fn is_connected(&self) -> bool {
        matches!(self, CacheStats::Connected(_))
    }
}

impl Serialize for CacheStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a, T: Serialize> {
            connected: bool,
            #[serde(flatten)]
            inner: &'a T,
        }

        match self {
            CacheStats::Connected(health) => Tagged {
                connected: true,
                inner: health,
            }
            .serialize(serializer),
            CacheStats::Disconnected(failure) => Tagged {
                connected: false,
                inner: failure,
            }
            .serialize(serializer),
        }
    }
}

/// 연결된 캐시의 헬스 수치
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub memory: CacheMemory,
    pub keys: u64,
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses) * 100, 분모 0이면 0
    pub hit_rate: f64,
}

/// 캐시 메모리 사용량 (바이트)
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheMemory {
    pub used: u64,
    pub peak: u64,
}

/// 미연결 진단 정보
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheFailure {
    /// 진단 메시지
    pub error: String,
    /// 마지막으로 관측된 연결 상태
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// 캐시 키 통계 (`getCacheStats`)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CacheKeyStats {
    Available {
        #[serde(rename = "totalKeys")]
        total_keys: u64,
        memory: CacheStats,
    },
    Unavailable {
        #[serde(rename = "totalKeys")]
        total_keys: u64,
        error: String,
    },
}

/// 삭제된 키 수 또는 전체 삭제
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleared {
    Count(u64),
    All,
}

impl Serialize for Cleared {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cleared::Count(n) => serializer.serialize_u64(*n),
            Cleared::All => serializer.serialize_str("all"),
        }
    }
}

/// 캐시 삭제 결과
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClearCacheResult {
    pub cleared: Cleared,
    pub pattern: String,
    pub message: String,
}
