/*
 * Responsibility
 * - 認証済み主体 (Actor) とそのロールの型定義
 * - ロールは閉じた enum。「isStudent() 的な動的判定」はやらず、policy 側で網羅 match する
 */
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// 認証済みのリクエスト主体
///
/// - `id` は identity サービス側のユーザー UUID (`sub` claim)
/// - `role` は排他的に 1 つ。multi-role はこのモデルには存在しない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// token の `role` claim をパースするための FromStr
///
/// 未知の値は受け入れない (token 発行側との契約違反なので 401 に落とす)
impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}
