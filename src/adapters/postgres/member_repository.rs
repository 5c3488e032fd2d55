//! PostgreSQL implementation of MemberRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, MemberId, Timestamp};
use crate::domain::registration::{Member, MemberType};
use crate::ports::MemberRepository;

pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: String,
    member_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: MemberId::new(row.id)
                .map_err(|e| DomainError::database(format!("Invalid member id: {}", e)))?,
            member_type: row
                .member_type
                .parse::<MemberType>()
                .map_err(|e| DomainError::database(format!("Invalid member type: {}", e)))?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn upsert(&self, id: &MemberId, member_type: MemberType) -> Result<Member, DomainError> {
        let row: MemberRow = sqlx::query_as(
            r#"
            INSERT INTO members (id, member_type, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (id) DO UPDATE SET
                member_type = EXCLUDED.member_type,
                updated_at = EXCLUDED.updated_at
            RETURNING id, member_type, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(member_type.as_str())
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert member: {}", e)))?;

        row.try_into()
    }
}
