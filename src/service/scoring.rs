use crate::models::{participant::Participant, session::ParticipantScore};

/// Correct answers over total questions, as a whole percentage.
pub fn percentage(correct: usize, total_questions: usize) -> u8 {
    if total_questions == 0 {
        return 0;
    }

    let ratio = correct as f64 / total_questions as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn score_participant(participant: &Participant, total_questions: usize) -> ParticipantScore {
    let mut correct = 0;
    let mut pending = 0;

    for record in participant.options.values() {
        if record.decision.is_correct() {
            correct += 1;
        } else if record.decision.is_pending() {
            pending += 1;
        }
    }

    let answered = participant.options.len();

    ParticipantScore {
        participant_id: participant.id,
        name: participant.name.clone(),
        answered,
        correct,
        incorrect: answered - correct - pending,
        pending,
        percentage: percentage(correct, total_questions),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::participant::{AnswerRecord, Decision};

    #[test]
    fn rounds_to_nearest_integer() {
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn pending_answers_do_not_count() {
        let mut participant = Participant::new("Alice", Uuid::new_v4());
        for decision in [Decision::Correct, Decision::Incorrect, Decision::Pending] {
            participant.record(
                Uuid::new_v4(),
                AnswerRecord {
                    option: "x".into(),
                    decision,
                },
            );
        }

        let score = score_participant(&participant, 4);
        assert_eq!(score.answered, 3);
        assert_eq!(score.correct, 1);
        assert_eq!(score.incorrect, 1);
        assert_eq!(score.pending, 1);
        assert_eq!(score.percentage, 25);
    }
}
