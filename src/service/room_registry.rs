use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::QuizStore,
    models::{
        error::QuizError,
        question::Question,
        room::{CreateRoomRequest, Room, RoomLookup, RoomStatus, UpdateRoomSettingsRequest},
    },
    service::validation::validate_request,
};

const ROOM_NOT_FOUND: &str = "Room not found";

pub struct RoomRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for RoomRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: QuizStore> RoomRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores the room and its already normalized questions in one write.
    /// A live room with the same name yields `Conflict`.
    pub async fn create_room(
        &self,
        owner: &str,
        request: &CreateRoomRequest,
        build_questions: impl FnOnce(Uuid) -> Result<Vec<Question>, QuizError>,
    ) -> Result<Room, QuizError> {
        validate_request(request)?;

        if owner.trim().is_empty() {
            return Err(QuizError::validation("Missing room owner"));
        }

        let room = Room::from_create_request(owner, request);

        if let Some(existing) = self.store.room_by_name(&room.name).await? {
            return Err(QuizError::Conflict {
                room_id: existing.id,
                status: existing.status,
            });
        }

        let questions = build_questions(room.id)?;
        self.store.insert_room(&room, &questions).await?;

        info!(
            "Created room {} ({}) with {} questions",
            room.name, room.id, room.number_of_questions
        );
        Ok(room)
    }

    pub async fn find_room_by_name(&self, name: &str) -> Result<RoomLookup, QuizError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(RoomLookup::missing());
        }

        let lookup = match self.store.room_by_name(name).await? {
            Some(room) => RoomLookup::found(&room),
            None => RoomLookup::missing(),
        };

        debug!("Room lookup for {}: {}", name, lookup.exists);
        Ok(lookup)
    }

    pub async fn get_room_by_name(&self, name: &str) -> Result<Room, QuizError> {
        self.store
            .room_by_name(name.trim())
            .await?
            .ok_or_else(|| QuizError::not_found(ROOM_NOT_FOUND))
    }

    pub async fn get_room(&self, id: Uuid) -> Result<Room, QuizError> {
        self.store
            .room_by_id(id)
            .await?
            .ok_or_else(|| QuizError::not_found(ROOM_NOT_FOUND))
    }

    /// Same error for "missing" and "not yours".
    pub async fn get_room_for_owner(&self, id: Uuid, owner: &str) -> Result<Room, QuizError> {
        match self.store.room_by_id(id).await? {
            Some(room) if room.is_owned_by(owner) => Ok(room),
            _ => Err(QuizError::not_found(ROOM_NOT_FOUND)),
        }
    }

    pub async fn list_rooms_for_owner(&self, owner: &str) -> Result<Vec<Room>, QuizError> {
        self.store.rooms_by_owner(owner).await
    }

    /// Unconditional overwrite, last write wins.
    pub async fn set_status(&self, id: Uuid, status: RoomStatus) -> Result<RoomStatus, QuizError> {
        if !self.store.update_room_status(id, status).await? {
            return Err(QuizError::not_found(ROOM_NOT_FOUND));
        }

        info!("Room {} status set to {}", id, status);
        Ok(status)
    }

    pub async fn update_settings(
        &self,
        id: Uuid,
        owner: &str,
        request: &UpdateRoomSettingsRequest,
    ) -> Result<Room, QuizError> {
        validate_request(request)?;
        self.get_room_for_owner(id, owner).await?;

        let updated = self
            .store
            .update_room_settings(id, request.settings, request.duration, &request.allow_list())
            .await?;
        if !updated {
            return Err(QuizError::not_found(ROOM_NOT_FOUND));
        }

        self.get_room(id).await
    }

    pub async fn soft_delete_room(&self, id: Uuid, owner: &str) -> Result<(), QuizError> {
        self.get_room_for_owner(id, owner).await?;

        if !self.store.soft_delete_room(id).await? {
            return Err(QuizError::not_found(ROOM_NOT_FOUND));
        }

        info!("Room {} deleted", id);
        Ok(())
    }
}
