//! 라우트별 접근 메타데이터.
//!
//! 라우터 구성 시 `(메서드, 라우트 패턴)`마다 공개 여부와 필요 역할을 등록하고,
//! 가드 미들웨어가 axum의 `MatchedPath`로 조회합니다. 등록되지 않은 라우트는
//! 인증만 요구합니다.

use std::collections::{HashMap, HashSet};

use axum::http::Method;
use mccfg_core::Role;

/// 라우트 접근 규칙.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccess {
    pub is_public: bool,
    /// 비어 있으면 역할 검사를 하지 않습니다.
    pub required_roles: HashSet<Role>,
}

impl RouteAccess {
    /// 토큰 없이 접근 가능.
    pub fn public() -> Self {
        Self {
            is_public: true,
            required_roles: HashSet::new(),
        }
    }

    /// 유효한 액세스 토큰 필요.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// 유효한 액세스 토큰 + 나열된 역할 중 하나.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            is_public: false,
            required_roles: roles.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, HashMap<Method, RouteAccess>>,
    fallback: RouteAccess,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 규칙 등록 (빌더 형태).
    #[must_use]
    pub fn with(mut self, method: Method, path: &str, access: RouteAccess) -> Self {
        self.register(method, path, access);
        self
    }

    pub fn register(&mut self, method: Method, path: &str, access: RouteAccess) {
        self.routes
            .entry(path.to_string())
            .or_default()
            .insert(method, access);
    }

    /// 라우트 규칙 조회. 미등록이면 인증 필요 규칙을 반환합니다.
    ///
    /// axum은 HEAD를 GET 핸들러로 처리하므로, HEAD 규칙이 따로 없으면 GET 규칙을 따릅니다.
    pub fn lookup(&self, method: &Method, path: &str) -> &RouteAccess {
        let Some(by_method) = self.routes.get(path) else {
            return &self.fallback;
        };
        by_method
            .get(method)
            .or_else(|| {
                (*method == Method::HEAD)
                    .then(|| by_method.get(&Method::GET))
                    .flatten()
            })
            .unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
