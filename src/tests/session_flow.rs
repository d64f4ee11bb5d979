#[cfg(test)]
mod tests {
    use crate::{
        models::{
            participant::Decision,
            response::{ActionResult, PAUSED_MESSAGE, RedirectTarget},
            room::{RoomSettings, RoomStatus},
        },
        tests::{
            OWNER, mcq, room_request, setup_app_state, short_answer, submission, true_false,
        },
    };

    #[tokio::test]
    async fn created_room_has_all_its_questions() {
        let state = setup_app_state();
        let session = state.session();

        let request = room_request(
            "geography",
            vec![
                mcq("Red planet?", &["Mars", "Venus"], 0),
                true_false("Earth is round", true),
                short_answer("Capital of France", "Paris"),
            ],
        );
        let created = session.create_room(OWNER, &request).await.into_data().unwrap();

        assert_eq!(created.number_of_questions, 3);
        assert_eq!(created.redirect_path, "/teacher");

        let questions = session
            .questions()
            .list_questions(created.room_id)
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);

        let room = session.rooms().get_room(created.room_id).await.unwrap();
        assert_eq!(room.status, RoomStatus::Active);
        assert!(
            session
                .questions()
                .verify_question_count(room.id, room.number_of_questions)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_room_name_points_at_existing_room() {
        let state = setup_app_state();
        let session = state.session();

        let first = session
            .create_room(OWNER, &room_request("chemistry", vec![]))
            .await
            .into_data()
            .unwrap();
        let second = session
            .create_room("teacher-2", &room_request("  chemistry ", vec![]))
            .await;

        match second {
            ActionResult::AlreadyExists { room_id, status, .. } => {
                assert_eq!(room_id, first.room_id);
                assert_eq!(status, RoomStatus::Active);
            }
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_room_name_is_rejected() {
        let state = setup_app_state();
        let result = state
            .session()
            .create_room(OWNER, &room_request("   ", vec![]))
            .await;

        assert_eq!(result.message(), Some("Room name is required"));
    }

    #[tokio::test]
    async fn invalid_question_creates_nothing() {
        let state = setup_app_state();
        let session = state.session();

        let request = room_request(
            "broken",
            vec![
                mcq("Fine", &["A", "B"], 0),
                mcq("Out of range", &["A", "B"], 5),
            ],
        );
        let result = session.create_room(OWNER, &request).await;
        assert!(!result.is_success());

        let lookup = session.rooms().find_room_by_name("broken").await.unwrap();
        assert!(!lookup.exists);
    }

    #[tokio::test]
    async fn join_flow_trims_and_redirects() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("history", vec![]))
            .await
            .into_data()
            .unwrap();

        let check = session.check_room(" history ").await.into_data().unwrap();
        assert_eq!(check.room_id, room.room_id);
        assert_eq!(
            check.redirect,
            RedirectTarget::StudentInfo {
                room: "history".into()
            }
        );

        let joined = session
            .join("history", "  Alice  ")
            .await
            .into_data()
            .unwrap();
        assert_eq!(joined.name, "Alice");
        assert_eq!(
            joined.redirect.to_string(),
            format!("/student/quiz/{}/{}", room.room_id, joined.participant_id)
        );

        let participant = session
            .participants()
            .get_participant(joined.participant_id)
            .await
            .unwrap();
        assert_eq!(participant.name, "Alice");
        assert!(participant.options.is_empty());
    }

    #[tokio::test]
    async fn join_rejects_missing_room_and_blank_name() {
        let state = setup_app_state();
        let session = state.session();

        let missing = session.join("nowhere", "Alice").await;
        assert_eq!(missing.message(), Some("Room not found"));
        assert_eq!(session.check_room("nowhere").await.message(), Some("Room not found"));

        session
            .create_room(OWNER, &room_request("art", vec![]))
            .await
            .into_data()
            .unwrap();
        let blank = session.join("art", "   ").await;
        assert_eq!(blank.message(), Some("Name is required"));
    }

    #[tokio::test]
    async fn repeat_joins_create_separate_participants() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("music", vec![]))
            .await
            .into_data()
            .unwrap();

        let first = session.join("music", "Bob").await.into_data().unwrap();
        let second = session.join("music", "Bob").await.into_data().unwrap();
        assert_ne!(first.participant_id, second.participant_id);

        let participants = session
            .participants()
            .list_participants(room.room_id)
            .await
            .unwrap();
        assert_eq!(participants.len(), 2);
    }

    #[tokio::test]
    async fn restricted_room_checks_allow_list() {
        let state = setup_app_state();
        let session = state.session();

        let mut request = room_request("private", vec![]);
        request.settings = RoomSettings {
            restrict_participants: true,
            ..RoomSettings::default()
        };
        request.participant_list = vec!["Alice".into(), " Bob ".into()];
        session.create_room(OWNER, &request).await.into_data().unwrap();

        assert!(session.join("private", "Bob").await.is_success());
        let rejected = session.join("private", "Mallory").await;
        assert_eq!(
            rejected.message(),
            Some("You are not on the participant list for this room")
        );
    }

    #[tokio::test]
    async fn restricted_room_reports_blank_name_first() {
        let state = setup_app_state();
        let session = state.session();

        let mut request = room_request("closed", vec![]);
        request.settings.restrict_participants = true;
        request.participant_list = vec!["Alice".into()];
        session.create_room(OWNER, &request).await.into_data().unwrap();

        let blank = session.join("closed", "   ").await;
        assert_eq!(blank.message(), Some("Name is required"));
    }

    #[tokio::test]
    async fn choice_answers_use_exact_matching() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(
                OWNER,
                &room_request("astronomy", vec![mcq("Red planet?", &["Mars", "Venus"], 0)]),
            )
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("astronomy", "Alice").await.into_data().unwrap();

        let record = session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "mars",
            ))
            .await
            .into_data()
            .unwrap();
        assert_eq!(record.decision, Decision::Incorrect);

        let record = session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "Mars",
            ))
            .await
            .into_data()
            .unwrap();
        assert_eq!(record.decision, Decision::Correct);

        let participant = session
            .participants()
            .get_participant(student.participant_id)
            .await
            .unwrap();
        assert_eq!(participant.options.len(), 1);
        assert_eq!(participant.progress, 1);
        assert_eq!(participant.answer_for(&question.id).unwrap().option, "Mars");
    }

    #[tokio::test]
    async fn short_answers_stay_pending_until_graded() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(
                OWNER,
                &room_request("french", vec![short_answer("Capital?", "Paris")]),
            )
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("french", "Alice").await.into_data().unwrap();

        let record = session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "Paris",
            ))
            .await
            .into_data()
            .unwrap();
        assert_eq!(record.decision, Decision::Pending);

        let reviews = session
            .pending_reviews(OWNER, &room.room_id.to_string())
            .await
            .into_data()
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].option, "Paris");
        assert_eq!(reviews[0].question_text, "Capital?");

        let graded = session
            .grade_answer(
                OWNER,
                &student.participant_id.to_string(),
                &question.id.to_string(),
                true,
            )
            .await
            .into_data()
            .unwrap();
        assert_eq!(graded.decision, Decision::Correct);
        assert_eq!(graded.option, "Paris");

        let reviews = session
            .pending_reviews(OWNER, &room.room_id.to_string())
            .await
            .into_data()
            .unwrap();
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn grading_missing_answer_creates_nothing() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(
                OWNER,
                &room_request("latin", vec![short_answer("Translate", "hello")]),
            )
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("latin", "Alice").await.into_data().unwrap();

        let result = session
            .grade_answer(
                OWNER,
                &student.participant_id.to_string(),
                &question.id.to_string(),
                true,
            )
            .await;
        assert_eq!(result.message(), Some("Answer not found"));

        let participant = session
            .participants()
            .get_participant(student.participant_id)
            .await
            .unwrap();
        assert!(participant.options.is_empty());
    }

    #[tokio::test]
    async fn only_the_owner_can_grade() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("ethics", vec![short_answer("Why?", "")]))
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("ethics", "Alice").await.into_data().unwrap();
        session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "Because",
            ))
            .await
            .into_data()
            .unwrap();

        let result = session
            .grade_answer(
                "someone-else",
                &student.participant_id.to_string(),
                &question.id.to_string(),
                true,
            )
            .await;
        assert_eq!(result.message(), Some("Answer not found"));
    }

    #[tokio::test]
    async fn paused_room_rejects_submissions_without_writing() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("biology", vec![true_false("Cells?", true)]))
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("biology", "Alice").await.into_data().unwrap();

        let status = session
            .toggle_pause(OWNER, &room.room_id.to_string())
            .await
            .into_data()
            .unwrap();
        assert_eq!(status, RoomStatus::Pause);

        let result = session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "True",
            ))
            .await;
        assert!(matches!(result, ActionResult::Paused { .. }));
        assert_eq!(result.message(), Some(PAUSED_MESSAGE));

        let served = session
            .get_questions(
                &room.room_id.to_string(),
                &student.participant_id.to_string(),
            )
            .await;
        assert!(matches!(served, ActionResult::Paused { .. }));

        let participant = session
            .participants()
            .get_participant(student.participant_id)
            .await
            .unwrap();
        assert!(participant.options.is_empty());
    }

    #[tokio::test]
    async fn finished_room_redirects_without_writing() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("physics", vec![true_false("g > 9?", true)]))
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("physics", "Alice").await.into_data().unwrap();

        session
            .change_status(OWNER, &room.room_id.to_string(), RoomStatus::Finish)
            .await
            .into_data()
            .unwrap();

        let result = session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                question.id,
                "True",
            ))
            .await;
        assert_eq!(
            result,
            ActionResult::Redirect {
                target: RedirectTarget::StudentInfo {
                    room: "physics".into()
                }
            }
        );

        let participant = session
            .participants()
            .get_participant(student.participant_id)
            .await
            .unwrap();
        assert!(participant.options.is_empty());

        let restarted = session
            .toggle_finish(OWNER, &room.room_id.to_string())
            .await
            .into_data()
            .unwrap();
        assert_eq!(restarted, RoomStatus::Active);
    }

    #[tokio::test]
    async fn serving_partitions_by_ledger() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(
                OWNER,
                &room_request(
                    "maths",
                    vec![
                        mcq("1+1", &["2", "3"], 0),
                        mcq("2+2", &["4", "5"], 0),
                        true_false("0 is even", true),
                    ],
                ),
            )
            .await
            .into_data()
            .unwrap();
        let questions = session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap();
        let student = session.join("maths", "Alice").await.into_data().unwrap();

        session
            .submit_answer(&submission(
                room.room_id,
                student.participant_id,
                questions[0].id,
                "3",
            ))
            .await
            .into_data()
            .unwrap();

        let served = session
            .get_questions(
                &room.room_id.to_string(),
                &student.participant_id.to_string(),
            )
            .await
            .into_data()
            .unwrap();

        assert_eq!(served.already_answered_count, 1);
        assert_eq!(served.answered[0].id, questions[0].id);
        assert_eq!(served.answered[0].user_answer, "3");
        assert_eq!(served.answered[0].decision, Decision::Incorrect);
        assert_eq!(served.unanswered.len(), 2);
        assert!(served.unanswered.iter().all(|q| q.id != questions[0].id));

        session
            .change_status(OWNER, &room.room_id.to_string(), RoomStatus::Finish)
            .await
            .into_data()
            .unwrap();
        let served = session
            .get_questions(
                &room.room_id.to_string(),
                &student.participant_id.to_string(),
            )
            .await
            .into_data()
            .unwrap();
        assert!(served.unanswered.is_empty());
        assert_eq!(served.answered.len(), 1);
    }

    #[tokio::test]
    async fn randomized_serving_keeps_the_same_questions() {
        let state = setup_app_state();
        let session = state.session();

        let mut request = room_request(
            "random",
            (0..8)
                .map(|n| mcq(&format!("Q{}", n), &["a", "b"], 0))
                .collect(),
        );
        request.settings.randomize_questions = true;
        let room = session.create_room(OWNER, &request).await.into_data().unwrap();
        let student = session.join("random", "Alice").await.into_data().unwrap();

        let served = session
            .get_questions(
                &room.room_id.to_string(),
                &student.participant_id.to_string(),
            )
            .await
            .into_data()
            .unwrap();

        let mut served_ids: Vec<_> = served.unanswered.iter().map(|q| q.id).collect();
        let mut stored_ids: Vec<_> = session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        served_ids.sort();
        stored_ids.sort();
        assert_eq!(served_ids, stored_ids);
    }

    #[tokio::test]
    async fn malformed_submissions_are_rejected() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("input", vec![mcq("?", &["a", "b"], 0)]))
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("input", "Alice").await.into_data().unwrap();

        let mut missing_answer =
            submission(room.room_id, student.participant_id, question.id, "a");
        missing_answer.answer_text = None;
        assert_eq!(
            session.submit_answer(&missing_answer).await.message(),
            Some("Please select an answer")
        );

        let mut missing_student =
            submission(room.room_id, student.participant_id, question.id, "a");
        missing_student.participant_id = String::new();
        assert_eq!(
            session.submit_answer(&missing_student).await.message(),
            Some("Missing student id")
        );

        let unknown_student =
            submission(room.room_id, uuid::Uuid::new_v4(), question.id, "a");
        assert_eq!(
            session.submit_answer(&unknown_student).await.message(),
            Some("Participant not found")
        );

        let unknown_question =
            submission(room.room_id, student.participant_id, uuid::Uuid::new_v4(), "a");
        assert_eq!(
            session.submit_answer(&unknown_question).await.message(),
            Some("Question not found")
        );
    }

    #[tokio::test]
    async fn stored_question_wins_over_client_claims() {
        let state = setup_app_state();
        let session = state.session();

        let room = session
            .create_room(OWNER, &room_request("claims", vec![mcq("?", &["a", "b"], 0)]))
            .await
            .into_data()
            .unwrap();
        let question = &session
            .questions()
            .list_questions(room.room_id)
            .await
            .unwrap()[0];
        let student = session.join("claims", "Alice").await.into_data().unwrap();

        let mut forged = submission(room.room_id, student.participant_id, question.id, "b");
        forged.canonical_answer = Some("b".into());
        let record = session.submit_answer(&forged).await.into_data().unwrap();
        assert_eq!(record.decision, Decision::Incorrect);
    }
}
