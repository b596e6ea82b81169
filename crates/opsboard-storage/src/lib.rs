//! # opsboard-storage
//!
//! 저장소 어댑터.
//!
//! ## 모듈
//! - `sqlite`: 관계형 저장소 (RelationalStore 구현)
//! - `migration`: 스키마 마이그레이션
//! - `cache`: 인메모리 키/값 저장소 (CacheStore 구현)

pub mod cache;
pub mod migration;
pub mod sqlite;
