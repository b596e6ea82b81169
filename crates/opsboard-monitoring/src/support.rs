//! best-effort 쿼리 헬퍼.

use opsboard_core::error::{describe_error, CoreError};
use std::future::Future;
use tracing::warn;

/// 실패하면 경고 로그를 남기고 기본값을 돌려준다
///
/// 응답 형태에 필수가 아닌 쿼리(네이티브 SQL, introspection, 보조 집계)에만 사용한다.
pub async fn try_or_default<T, F>(label: &str, fut: F, default: T) -> T
where
    F: Future<Output = Result<T, CoreError>>,
{
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            let desc = describe_error(&e);
            warn!(
                query = label,
                code = desc.code.as_deref().unwrap_or("-"),
                "best-effort 쿼리 실패, 기본값 사용: {}",
                desc.message
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let v = try_or_default("ok", async { Ok::<_, CoreError>(7u64) }, 0).await;
        assert_eq!(v, 7);
    }

    #[tokio::test]
    async fn failure_yields_default() {
        let v = try_or_default(
            "broken",
            async { Err::<Vec<u8>, _>(CoreError::Store("permission denied".into())) },
            Vec::new(),
        )
        .await;
        assert!(v.is_empty());
    }
}
