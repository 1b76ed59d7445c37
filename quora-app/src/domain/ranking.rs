use super::Answer;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Higher upvote count first, then the most recently updated, then the
/// smallest id so equal answers always come back in the same order.
pub fn most_upvoted_first(a: &Answer, b: &Answer) -> Ordering {
    b.upvote_count
        .cmp(&a.upvote_count)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn top_answer_per_question(answers: Vec<Answer>) -> HashMap<uuid::Uuid, Answer> {
    let mut top: HashMap<uuid::Uuid, Answer> = HashMap::new();
    for answer in answers {
        match top.get(&answer.question_id) {
            Some(current) if most_upvoted_first(current, &answer) != Ordering::Greater => {}
            _ => {
                top.insert(answer.question_id, answer);
            }
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn answer(question_id: Uuid, id: &str, upvotes: i32, age_secs: i64) -> Answer {
        let at = Utc::now() - Duration::seconds(age_secs);
        Answer {
            id: id.parse().unwrap(),
            question_id,
            answerer_id: Uuid::new_v4(),
            answer: "because".to_string(),
            upvote_count: upvotes,
            downvote_count: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_more_upvotes_wins() {
        let q = Uuid::new_v4();
        let low = answer(q, "00000000-0000-0000-0000-000000000001", 1, 0);
        let high = answer(q, "00000000-0000-0000-0000-000000000002", 5, 100);

        let top = top_answer_per_question(vec![low, high.clone()]);
        assert_eq!(top[&q], high);
    }

    #[test]
    fn test_recent_update_breaks_upvote_tie() {
        let q = Uuid::new_v4();
        let older = answer(q, "00000000-0000-0000-0000-000000000001", 3, 60);
        let newer = answer(q, "00000000-0000-0000-0000-000000000002", 3, 0);

        let top = top_answer_per_question(vec![older, newer.clone()]);
        assert_eq!(top[&q], newer);
    }

    #[test]
    fn test_smallest_id_breaks_full_tie() {
        let q = Uuid::new_v4();
        let a = answer(q, "00000000-0000-0000-0000-00000000000b", 2, 0);
        let mut b = answer(q, "00000000-0000-0000-0000-00000000000a", 2, 0);
        b.updated_at = a.updated_at;

        let top = top_answer_per_question(vec![a.clone(), b.clone()]);
        assert_eq!(top[&q], b);

        let top = top_answer_per_question(vec![b.clone(), a]);
        assert_eq!(top[&q], b);
    }

    #[test]
    fn test_answers_group_by_question() {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let a1 = answer(q1, "00000000-0000-0000-0000-000000000001", 0, 0);
        let a2 = answer(q2, "00000000-0000-0000-0000-000000000002", 0, 0);

        let top = top_answer_per_question(vec![a1.clone(), a2.clone()]);
        assert_eq!(top.len(), 2);
        assert_eq!(top[&q1], a1);
        assert_eq!(top[&q2], a2);
    }
}
