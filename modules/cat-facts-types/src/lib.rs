//! Shared types for the cat facts service and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: i64,
    #[serde(rename = "fact")]
    pub text: String,
    pub source: FactSource,
    pub favorite: bool,
    pub created_at: String,
}

/// Who created a fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    #[default]
    User,
    Api,
}

impl FactSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactSource::User => "user",
            FactSource::Api => "api",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(FactSource::User),
            "api" => Some(FactSource::Api),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactStats {
    pub total: i64,
    pub favorites: i64,
    pub user_count: i64,
    pub api_count: i64,
}

// =====================================================
// Request Types
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFactRequest {
    pub fact: String,
    #[serde(default)]
    pub source: Option<FactSource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFactRequest {
    pub fact: String,
}

// =====================================================
// Response Types
// =====================================================

/// Envelope for every mutating endpoint.
///
/// `error` carries a stable machine code (`INVALID_FACT`, `DUPLICATE_FACT`,
/// `NOT_FOUND`, `DATABASE_ERROR`, `UPSTREAM_UNAVAILABLE`) so callers can
/// branch without parsing `message`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(code.into()),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomFact {
    pub fact: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedFact {
    pub id: i64,
}

// =====================================================
// Service Status
// =====================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_facts: i64,
}
