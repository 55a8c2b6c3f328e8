//! Message repository for sending and triaging anonymous messages.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Message, NewMessage, UpdateMessage};
use crate::types::MessageStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for message database operations.
///
/// Every operation except sending and public listing is scoped to the
/// receiver, so a message owned by someone else behaves as if it did
/// not exist.
pub trait MessageRepository {
    /// Stores a new message for its receiver.
    fn create_message(
        &mut self,
        new_message: NewMessage,
    ) -> impl Future<Output = PgResult<Message>> + Send;

    /// Lists messages received by a user, newest first.
    ///
    /// When `status` is set only messages with that status are returned.
    fn list_received_messages(
        &mut self,
        receiver_id: Uuid,
        status: Option<MessageStatus>,
    ) -> impl Future<Output = PgResult<Vec<Message>>> + Send;

    /// Changes the status of a message owned by `receiver_id`.
    fn update_message_status(
        &mut self,
        message_id: Uuid,
        receiver_id: Uuid,
        status: MessageStatus,
    ) -> impl Future<Output = PgResult<Option<Message>>> + Send;

    /// Deletes a message owned by `receiver_id`, returning whether a row was removed.
    fn delete_message(
        &mut self,
        message_id: Uuid,
        receiver_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists the public messages of a user, newest first.
    fn list_public_messages(
        &mut self,
        receiver_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Message>>> + Send;
}

impl MessageRepository for PgConnection {
    async fn create_message(&mut self, new_message: NewMessage) -> PgResult<Message> {
        use schema::messages;

        diesel::insert_into(messages::table)
            .values(&new_message)
            .returning(Message::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_received_messages(
        &mut self,
        receiver_id: Uuid,
        status: Option<MessageStatus>,
    ) -> PgResult<Vec<Message>> {
        use schema::messages::{self, dsl};

        let mut query = messages::table
            .filter(dsl::receiver_id.eq(receiver_id))
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(dsl::status.eq(status));
        }

        query
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .select(Message::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_message_status(
        &mut self,
        message_id: Uuid,
        receiver_id: Uuid,
        status: MessageStatus,
    ) -> PgResult<Option<Message>> {
        use schema::messages::{self, dsl};

        let updates = UpdateMessage {
            status: Some(status),
        };

        diesel::update(
            messages::table
                .filter(dsl::id.eq(message_id))
                .filter(dsl::receiver_id.eq(receiver_id)),
        )
        .set(&updates)
        .returning(Message::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn delete_message(&mut self, message_id: Uuid, receiver_id: Uuid) -> PgResult<bool> {
        use schema::messages::{self, dsl};

        let deleted = diesel::delete(
            messages::table
                .filter(dsl::id.eq(message_id))
                .filter(dsl::receiver_id.eq(receiver_id)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_public_messages(&mut self, receiver_id: Uuid) -> PgResult<Vec<Message>> {
        use schema::messages::{self, dsl};

        messages::table
            .filter(dsl::receiver_id.eq(receiver_id))
            .filter(dsl::status.eq(MessageStatus::Public))
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .select(Message::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
