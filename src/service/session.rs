use std::{collections::HashMap, sync::Arc};

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    db::QuizStore,
    models::{
        error::{QuizError, SessionState},
        participant::AnswerRecord,
        question::{Question, StudentQuestion},
        response::{ActionResult, RedirectTarget},
        room::{CreateRoomRequest, Room, RoomStatus, UpdateRoomSettingsRequest},
        session::{
            AnsweredQuestion, CreatedRoom, JoinedParticipant, ParticipantScore, PendingReview,
            RoomCheck, RoomReport, ServedQuestions, SubmitAnswer,
        },
    },
    service::{
        grading::grade_record,
        participant_tracker::ParticipantTracker,
        question_bank::QuestionBank,
        room_registry::RoomRegistry,
        scoring::score_participant,
        validation::{parse_id, participant_name},
    },
};

const TEACHER_HOME: &str = "/teacher";

/// Join, serve, submit and review flows. Every public operation returns an
/// [`ActionResult`]; errors never cross this boundary.
pub struct SessionOrchestrator<S> {
    rooms: RoomRegistry<S>,
    questions: QuestionBank<S>,
    participants: ParticipantTracker<S>,
}

impl<S> Clone for SessionOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            rooms: self.rooms.clone(),
            questions: self.questions.clone(),
            participants: self.participants.clone(),
        }
    }
}

impl<S: QuizStore> SessionOrchestrator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            rooms: RoomRegistry::new(store.clone()),
            questions: QuestionBank::new(store.clone()),
            participants: ParticipantTracker::new(store),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry<S> {
        &self.rooms
    }

    pub fn questions(&self) -> &QuestionBank<S> {
        &self.questions
    }

    pub fn participants(&self) -> &ParticipantTracker<S> {
        &self.participants
    }

    pub async fn create_room(
        &self,
        owner: &str,
        request: &CreateRoomRequest,
    ) -> ActionResult<CreatedRoom> {
        self.try_create_room(owner, request).await.into()
    }

    async fn try_create_room(
        &self,
        owner: &str,
        request: &CreateRoomRequest,
    ) -> Result<CreatedRoom, QuizError> {
        let room = self
            .rooms
            .create_room(owner, request, |room_id| {
                self.questions.create_questions(room_id, &request.questions)
            })
            .await?;

        Ok(CreatedRoom {
            room_id: room.id,
            number_of_questions: room.number_of_questions,
            redirect_path: TEACHER_HOME.to_string(),
        })
    }

    /// First join step: does the room exist, and where to go next.
    pub async fn check_room(&self, room_name: &str) -> ActionResult<RoomCheck> {
        self.try_check_room(room_name).await.into()
    }

    async fn try_check_room(&self, room_name: &str) -> Result<RoomCheck, QuizError> {
        let lookup = self.rooms.find_room_by_name(room_name).await?;

        match (lookup.room_id, lookup.status) {
            (Some(room_id), Some(status)) => Ok(RoomCheck {
                room_id,
                status,
                redirect: RedirectTarget::StudentInfo {
                    room: room_name.trim().to_string(),
                },
            }),
            _ => Err(QuizError::not_found("Room not found")),
        }
    }

    pub async fn join(&self, room_name: &str, participant_name: &str) -> ActionResult<JoinedParticipant> {
        self.try_join(room_name, participant_name).await.into()
    }

    async fn try_join(
        &self,
        room_name: &str,
        name: &str,
    ) -> Result<JoinedParticipant, QuizError> {
        let name = participant_name(name)?;
        let room = self.rooms.get_room_by_name(room_name).await?;

        if !room.admits(name) {
            info!("Participant name rejected by allow list of room {}", room.id);
            return Err(QuizError::validation(
                "You are not on the participant list for this room",
            ));
        }

        let participant = self
            .participants
            .create_participant(name, room.id)
            .await?;

        Ok(JoinedParticipant {
            participant_id: participant.id,
            room_id: room.id,
            name: participant.name,
            redirect: RedirectTarget::Quiz {
                room_id: room.id,
                participant_id: participant.id,
            },
        })
    }

    pub async fn get_questions(
        &self,
        room_id: &str,
        participant_id: &str,
    ) -> ActionResult<ServedQuestions> {
        self.try_get_questions(room_id, participant_id).await.into()
    }

    async fn try_get_questions(
        &self,
        room_id: &str,
        participant_id: &str,
    ) -> Result<ServedQuestions, QuizError> {
        let room_id = parse_id("room", room_id)?;
        let participant_id = parse_id("student", participant_id)?;

        let participant = self.participants.get_participant(participant_id).await?;
        if participant.room_id != room_id {
            return Err(QuizError::not_found("Participant not found"));
        }

        let room = self.rooms.get_room(room_id).await?;
        if room.status == RoomStatus::Pause {
            return Err(QuizError::State(SessionState::Paused));
        }

        let mut answered = Vec::new();
        let mut unanswered = Vec::new();

        for question in self.questions.list_questions(room_id).await? {
            match participant.answer_for(&question.id) {
                Some(record) => answered.push(answered_question(&question, record)),
                None => unanswered.push(StudentQuestion::from(&question)),
            }
        }

        if room.status == RoomStatus::Finish {
            unanswered.clear();
        } else if room.settings.randomize_questions {
            let mut rng = ChaCha8Rng::from_os_rng();
            unanswered.shuffle(&mut rng);
        }

        debug!(
            "Serving {} new and {} answered questions to {}",
            unanswered.len(),
            answered.len(),
            participant_id
        );

        Ok(ServedQuestions {
            already_answered_count: answered.len(),
            answered,
            unanswered,
        })
    }

    pub async fn submit_answer(&self, request: &SubmitAnswer) -> ActionResult<AnswerRecord> {
        self.try_submit_answer(request).await.into()
    }

    async fn try_submit_answer(&self, request: &SubmitAnswer) -> Result<AnswerRecord, QuizError> {
        let participant_id = parse_id("student", &request.participant_id)?;
        let question_id = parse_id("question", &request.question_id)?;
        let Some(answer_text) = request.answer_text.as_deref() else {
            return Err(QuizError::validation("Please select an answer"));
        };

        let participant = self.participants.get_participant(participant_id).await?;
        let room_id = parse_id("room", &request.room_id)?;
        if participant.room_id != room_id {
            return Err(QuizError::not_found("Participant not found"));
        }

        let room = self.rooms.get_room(room_id).await?;
        ensure_accepting_answers(&room)?;

        let question = self.questions.get_question(room_id, question_id).await?;
        let canonical = question.canonical_answer();

        if request
            .question_type
            .is_some_and(|claimed| claimed != question.question_type())
            || request
                .canonical_answer
                .as_deref()
                .is_some_and(|claimed| claimed != canonical)
        {
            warn!(
                "Client sent stale question data for {}, grading against stored question",
                question_id
            );
        }

        let record = grade_record(question.question_type(), answer_text, &canonical);
        self.participants
            .record_answer(participant_id, question_id, record)
            .await
    }

    /// Short answers still waiting for the teacher.
    pub async fn pending_reviews(&self, owner: &str, room_id: &str) -> ActionResult<Vec<PendingReview>> {
        self.try_pending_reviews(owner, room_id).await.into()
    }

    async fn try_pending_reviews(
        &self,
        owner: &str,
        room_id: &str,
    ) -> Result<Vec<PendingReview>, QuizError> {
        let room = self.owned_room(owner, room_id).await?;
        let questions = self.questions.list_questions(room.id).await?;
        let positions: HashMap<Uuid, (usize, &Question)> = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| (q.id, (idx, q)))
            .collect();

        let mut reviews = Vec::new();
        for participant in self.participants.list_participants(room.id).await? {
            for (question_id, record) in &participant.options {
                if !record.decision.is_pending() {
                    continue;
                }
                let Some((position, question)) = positions.get(question_id) else {
                    continue;
                };

                reviews.push((
                    *position,
                    PendingReview {
                        participant_id: participant.id,
                        participant_name: participant.name.clone(),
                        question_id: *question_id,
                        question_text: question.text.clone(),
                        option: record.option.clone(),
                    },
                ));
            }
        }

        reviews.sort_by(|(a_pos, a), (b_pos, b)| {
            a.participant_name
                .cmp(&b.participant_name)
                .then(a.participant_id.cmp(&b.participant_id))
                .then(a_pos.cmp(b_pos))
        });

        Ok(reviews.into_iter().map(|(_, review)| review).collect())
    }

    /// Teacher's manual decision on one ledger entry.
    pub async fn grade_answer(
        &self,
        owner: &str,
        participant_id: &str,
        question_id: &str,
        decision: bool,
    ) -> ActionResult<AnswerRecord> {
        self.try_grade_answer(owner, participant_id, question_id, decision)
            .await
            .into()
    }

    async fn try_grade_answer(
        &self,
        owner: &str,
        participant_id: &str,
        question_id: &str,
        decision: bool,
    ) -> Result<AnswerRecord, QuizError> {
        let participant_id = parse_id("student", participant_id)?;
        let question_id = parse_id("question", question_id)?;

        let participant = match self.participants.get_participant(participant_id).await {
            Ok(participant) => participant,
            Err(QuizError::NotFound(_)) => return Err(QuizError::not_found("Answer not found")),
            Err(e) => return Err(e),
        };

        match self
            .rooms
            .get_room_for_owner(participant.room_id, owner)
            .await
        {
            Ok(_) => {}
            Err(QuizError::NotFound(_)) => return Err(QuizError::not_found("Answer not found")),
            Err(e) => return Err(e),
        }

        self.participants
            .update_decision(participant_id, question_id, decision)
            .await
    }

    pub async fn change_status(
        &self,
        owner: &str,
        room_id: &str,
        status: RoomStatus,
    ) -> ActionResult<RoomStatus> {
        self.try_change_status(owner, room_id, |current| current.transition(status))
            .await
            .into()
    }

    pub async fn toggle_pause(&self, owner: &str, room_id: &str) -> ActionResult<RoomStatus> {
        self.try_change_status(owner, room_id, RoomStatus::toggle_pause)
            .await
            .into()
    }

    pub async fn toggle_finish(&self, owner: &str, room_id: &str) -> ActionResult<RoomStatus> {
        self.try_change_status(owner, room_id, RoomStatus::toggle_finish)
            .await
            .into()
    }

    async fn try_change_status(
        &self,
        owner: &str,
        room_id: &str,
        next: impl FnOnce(RoomStatus) -> RoomStatus,
    ) -> Result<RoomStatus, QuizError> {
        let room = self.owned_room(owner, room_id).await?;
        self.rooms.set_status(room.id, next(room.status)).await
    }

    pub async fn list_rooms(&self, owner: &str) -> ActionResult<Vec<Room>> {
        self.rooms.list_rooms_for_owner(owner).await.into()
    }

    pub async fn update_settings(
        &self,
        owner: &str,
        room_id: &str,
        request: &UpdateRoomSettingsRequest,
    ) -> ActionResult<Room> {
        self.try_update_settings(owner, room_id, request).await.into()
    }

    async fn try_update_settings(
        &self,
        owner: &str,
        room_id: &str,
        request: &UpdateRoomSettingsRequest,
    ) -> Result<Room, QuizError> {
        let room_id = parse_id("room", room_id)?;
        self.rooms.update_settings(room_id, owner, request).await
    }

    pub async fn delete_room(&self, owner: &str, room_id: &str) -> ActionResult<()> {
        self.try_delete_room(owner, room_id).await.into()
    }

    async fn try_delete_room(&self, owner: &str, room_id: &str) -> Result<(), QuizError> {
        let room_id = parse_id("room", room_id)?;
        self.rooms.soft_delete_room(room_id, owner).await
    }

    pub async fn room_results(
        &self,
        owner: &str,
        room_id: &str,
    ) -> ActionResult<Vec<ParticipantScore>> {
        self.try_room_results(owner, room_id).await.into()
    }

    async fn try_room_results(
        &self,
        owner: &str,
        room_id: &str,
    ) -> Result<Vec<ParticipantScore>, QuizError> {
        let room = self.owned_room(owner, room_id).await?;
        let total = self.questions.list_questions(room.id).await?.len();

        Ok(self
            .participants
            .list_participants(room.id)
            .await?
            .iter()
            .map(|participant| score_participant(participant, total))
            .collect())
    }

    pub async fn room_report(&self, owner: &str, room_id: &str) -> ActionResult<RoomReport> {
        self.try_room_report(owner, room_id).await.into()
    }

    async fn try_room_report(&self, owner: &str, room_id: &str) -> Result<RoomReport, QuizError> {
        let room = self.owned_room(owner, room_id).await?;
        let questions = self.questions.list_questions(room.id).await?;
        let participants = self.participants.list_participants(room.id).await?;

        Ok(RoomReport {
            room,
            questions,
            participants,
        })
    }

    async fn owned_room(&self, owner: &str, room_id: &str) -> Result<Room, QuizError> {
        let room_id = parse_id("room", room_id)?;
        self.rooms.get_room_for_owner(room_id, owner).await
    }
}

fn ensure_accepting_answers(room: &Room) -> Result<(), QuizError> {
    match room.status {
        RoomStatus::Pause => Err(QuizError::State(SessionState::Paused)),
        RoomStatus::Finish => Err(QuizError::State(SessionState::Finished {
            room_name: room.name.clone(),
        })),
        RoomStatus::Draft | RoomStatus::Active => Ok(()),
    }
}

fn answered_question(question: &Question, record: &AnswerRecord) -> AnsweredQuestion {
    AnsweredQuestion {
        id: question.id,
        question_type: question.question_type(),
        text: question.text.clone(),
        options: question.kind.options(),
        answer: question.canonical_answer(),
        user_answer: record.option.clone(),
        decision: record.decision,
    }
}
