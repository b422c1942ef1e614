/*
 * Responsibility
 * - course に対する純粋な認可判定 (I/O なし、副作用なし)
 * - role は閉じた enum なので match で網羅する
 */
use crate::domain::{Actor, Course, Role};

/// course を新規作成できるか
///
/// student のみ禁止。instructor と admin はどちらも作成できる
/// (観測されたソース挙動をそのまま契約にしている)
pub fn can_create(actor: &Actor) -> bool {
    match actor.role {
        Role::Student => false,
        Role::Instructor | Role::Admin => true,
    }
}

/// course を更新/削除できるか: admin か、その course の所有 instructor のみ
pub fn can_mutate(actor: &Actor, course: &Course) -> bool {
    actor.role == Role::Admin || course.instructor_id == actor.id
}

/// course に enroll できるか
///
/// 現仕様では認証済みであれば誰でも可 (course 側の条件なし)。
/// 「本人しか enroll できない」制限は入れていない — service 側で乖離を WARN ログに残す
pub fn can_enroll(_actor: &Actor, _course: &Course) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn course_owned_by(instructor_id: Uuid) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Algorithms".to_string(),
            description: String::new(),
            price: 0.0,
            instructor_id,
            student_ids: Vec::new(),
            instructor: None,
        }
    }

    #[test]
    fn student_cannot_create() {
        let actor = Actor::new(Uuid::new_v4(), Role::Student);
        assert!(!can_create(&actor));
    }

    #[test]
    fn instructor_and_admin_can_create() {
        assert!(can_create(&Actor::new(Uuid::new_v4(), Role::Instructor)));
        assert!(can_create(&Actor::new(Uuid::new_v4(), Role::Admin)));
    }

    #[test]
    fn owner_can_mutate() {
        let owner = Actor::new(Uuid::new_v4(), Role::Instructor);
        let course = course_owned_by(owner.id);
        assert!(can_mutate(&owner, &course));
    }

    #[test]
    fn admin_can_mutate_any_course() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let course = course_owned_by(Uuid::new_v4());
        assert!(can_mutate(&admin, &course));
    }

    #[test]
    fn other_instructor_cannot_mutate() {
        let other = Actor::new(Uuid::new_v4(), Role::Instructor);
        let course = course_owned_by(Uuid::new_v4());
        assert!(!can_mutate(&other, &course));
    }

    #[test]
    fn any_authenticated_actor_can_enroll() {
        let course = course_owned_by(Uuid::new_v4());
        for role in [Role::Student, Role::Instructor, Role::Admin] {
            assert!(can_enroll(&Actor::new(Uuid::new_v4(), role), &course));
        }
    }
}
