//! MemberRepository port - CRM persons keyed by their external id.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::registration::{Member, MemberType};

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Creates the member or updates its type, atomically on `id`.
    async fn upsert(&self, id: &MemberId, member_type: MemberType) -> Result<Member, DomainError>;
}
