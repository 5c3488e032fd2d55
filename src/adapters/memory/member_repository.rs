//! In-memory Member store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberId, Timestamp};
use crate::domain::registration::{Member, MemberType};
use crate::ports::MemberRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryMemberRepository {
    members: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Member> {
        self.members.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn upsert(&self, id: &MemberId, member_type: MemberType) -> Result<Member, DomainError> {
        let now = Timestamp::now();
        let mut members = self.members.write().await;
        let member = members
            .entry(id.clone())
            .and_modify(|m| m.apply_type(member_type, now))
            .or_insert_with(|| Member::new(id.clone(), member_type, now));
        Ok(member.clone())
    }
}
