//! Notification permission seam

use async_trait::async_trait;

/// Asks the platform whether notifications may be shown
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn request(&self) -> bool;
}

/// Fixed answer, for hosts without a permission prompt
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub bool);

#[async_trait]
impl PermissionSource for StaticPermission {
    async fn request(&self) -> bool {
        self.0
    }
}
