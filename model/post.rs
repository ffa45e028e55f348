use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Coordinate, ValidationError};

/// 帖子存活时间上限（秒，不含）
pub const MAX_LIFETIME_SECS: i64 = 3600;

/// 当前 unix 时间戳（秒）
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 帖子的唯一标识
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

/// 一条带位置和存活时间的帖子
///
/// 序列化字段名沿用对外的 JSON 格式：`location`、`id`、`content`、
/// `duration`、`created_at`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "location")]
    pub coordinate: Coordinate,
    pub id: PostId,
    pub content: String,
    #[serde(rename = "duration")]
    pub lifetime_secs: i64,
    pub created_at: i64,
}

impl Post {
    /// 创建新帖子：校验字段，分配新 id，`created_at` 取当前时间
    pub fn new(
        coordinate: Coordinate,
        content: impl Into<String>,
        lifetime_secs: i64,
    ) -> Result<Self, ValidationError> {
        let post = Self {
            coordinate,
            id: PostId::new(),
            content: content.into(),
            lifetime_secs,
            created_at: unix_now(),
        };
        post.validate()?;
        Ok(post)
    }

    /// Replaces the creation timestamp. Used when replaying posts whose
    /// creation time is already known.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.coordinate, &self.content, self.lifetime_secs)
    }

    /// Last second (inclusive) at which the post is still active.
    pub fn expires_at(&self) -> i64 {
        self.created_at.saturating_add(self.lifetime_secs)
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at() < now
    }

    /// 剩余存活秒数，已过期时为 0
    pub fn remaining_secs(&self, now: i64) -> i64 {
        self.expires_at().saturating_sub(now).max(0)
    }
}

/// 客户端提交的帖子内容，id 与时间戳由服务端分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRequest {
    pub location: Coordinate,
    pub content: String,
    pub duration: i64,
}

impl PostRequest {
    pub fn new(location: Coordinate, content: impl Into<String>, duration: i64) -> Self {
        Self {
            location,
            content: content.into(),
            duration,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.location, &self.content, self.duration)
    }

    pub fn into_post(self) -> Result<Post, ValidationError> {
        Post::new(self.location, self.content, self.duration)
    }
}

/// 查询半径必须是有限的非负数（公里）
pub fn validate_radius(radius_km: f64) -> Result<f64, ValidationError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(ValidationError::InvalidRadius(radius_km))
    }
}

fn validate_fields(
    coordinate: &Coordinate,
    content: &str,
    lifetime_secs: i64,
) -> Result<(), ValidationError> {
    if !coordinate.is_valid() {
        return Err(ValidationError::InvalidCoordinate);
    }
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if lifetime_secs <= 0 || lifetime_secs >= MAX_LIFETIME_SECS {
        return Err(ValidationError::LifetimeOutOfRange(lifetime_secs));
    }
    Ok(())
}
