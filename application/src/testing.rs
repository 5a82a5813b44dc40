//! In-memory implementations of the kernel interfaces for service tests.

use std::sync::{Arc, Mutex};

use time::OffsetDateTime;

use kernel::interface::database::QueryDatabaseConnection;
use kernel::interface::query::{
    BookingQuery, CommentQuery, DependOnBookingQuery, DependOnCommentQuery, DependOnItemQuery,
    DependOnRequestQuery, DependOnUserQuery, ItemQuery, RequestQuery, UserQuery,
};
use kernel::interface::update::{
    BookingModifier, CommentModifier, DependOnBookingModifier, DependOnCommentModifier,
    DependOnItemModifier, DependOnRequestModifier, DependOnUserModifier, ItemModifier,
    RequestModifier, UserModifier,
};
use kernel::prelude::entity::{
    Booking, BookingFilter, BookingId, BookingSelection, BookingState, Comment, Item, ItemId,
    RentalRequest, RequestId, StartOrder, User, UserEmail, UserId,
};
use kernel::KernelError;

#[derive(Default)]
pub struct MockStore {
    pub users: Vec<User>,
    pub items: Vec<Item>,
    pub bookings: Vec<Booking>,
    pub comments: Vec<Comment>,
    pub requests: Vec<RentalRequest>,
}

#[derive(Clone, Default)]
pub struct MockApp {
    pub store: Arc<Mutex<MockStore>>,
}

pub struct MockConnection;

#[async_trait::async_trait]
impl QueryDatabaseConnection<MockConnection> for MockApp {
    async fn transact(&self) -> error_stack::Result<MockConnection, KernelError> {
        Ok(MockConnection)
    }
}

#[async_trait::async_trait]
impl UserQuery<MockConnection> for MockApp {
    async fn find_by_id(
        &self,
        _con: &mut MockConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        _con: &mut MockConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_all(
        &self,
        _con: &mut MockConnection,
    ) -> error_stack::Result<Vec<User>, KernelError> {
        Ok(self.store.lock().unwrap().users.clone())
    }
}

impl DependOnUserQuery<MockConnection> for MockApp {
    type UserQuery = Self;
    fn user_query(&self) -> &Self::UserQuery {
        self
    }
}

#[async_trait::async_trait]
impl UserModifier<MockConnection> for MockApp {
    async fn create(
        &self,
        _con: &mut MockConnection,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        self.store.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn update(
        &self,
        _con: &mut MockConnection,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        let mut store = self.store.lock().unwrap();
        if let Some(row) = store.users.iter_mut().find(|row| row.id() == user.id()) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        _con: &mut MockConnection,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        self.store
            .lock()
            .unwrap()
            .users
            .retain(|user| user.id() != user_id);
        Ok(())
    }
}

impl DependOnUserModifier<MockConnection> for MockApp {
    type UserModifier = Self;
    fn user_modifier(&self) -> &Self::UserModifier {
        self
    }
}

#[async_trait::async_trait]
impl ItemQuery<MockConnection> for MockApp {
    async fn find_by_id(
        &self,
        _con: &mut MockConnection,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned())
    }

    async fn find_all_by_owner(
        &self,
        _con: &mut MockConnection,
        owner_id: &UserId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|item| item.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn find_all_by_request(
        &self,
        _con: &mut MockConnection,
        request_id: &RequestId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|item| item.request_id().as_ref() == Some(request_id))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        _con: &mut MockConnection,
        text: &str,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        let needle = text.to_lowercase();
        Ok(self
            .store
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|item| bool::from(*item.available()))
            .filter(|item| {
                item.name().as_ref().to_lowercase().contains(&needle)
                    || item.description().as_ref().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

impl DependOnItemQuery<MockConnection> for MockApp {
    type ItemQuery = Self;
    fn item_query(&self) -> &Self::ItemQuery {
        self
    }
}

#[async_trait::async_trait]
impl ItemModifier<MockConnection> for MockApp {
    async fn create(
        &self,
        _con: &mut MockConnection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        self.store.lock().unwrap().items.push(item.clone());
        Ok(())
    }

    async fn update(
        &self,
        _con: &mut MockConnection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        let mut store = self.store.lock().unwrap();
        if let Some(row) = store.items.iter_mut().find(|row| row.id() == item.id()) {
            *row = item.clone();
        }
        Ok(())
    }
}

impl DependOnItemModifier<MockConnection> for MockApp {
    type ItemModifier = Self;
    fn item_modifier(&self) -> &Self::ItemModifier {
        self
    }
}

fn apply_selection(
    mut rows: Vec<Booking>,
    state: BookingState,
    now: OffsetDateTime,
) -> Vec<Booking> {
    let BookingSelection { filter, order } = state.selection();
    rows.retain(|booking| match filter {
        BookingFilter::Any => true,
        BookingFilter::Status(status) => booking.status() == &status,
        BookingFilter::EndsBeforeNow => booking.period().ends_before(now),
        BookingFilter::CoversNow => booking.period().contains(now),
        BookingFilter::StartsAfterNow => booking.period().starts_after(now),
    });
    rows.sort_by_key(|booking| *booking.period().start());
    if order == StartOrder::Desc {
        rows.reverse();
    }
    rows
}

#[async_trait::async_trait]
impl BookingQuery<MockConnection> for MockApp {
    async fn find_by_id(
        &self,
        _con: &mut MockConnection,
        id: &BookingId,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|booking| booking.id() == id)
            .cloned())
    }

    async fn find_overlapping(
        &self,
        _con: &mut MockConnection,
        item_id: &ItemId,
        instant: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|booking| booking.item_id() == item_id && booking.period().contains(instant))
            .cloned())
    }

    async fn find_all_by_booker(
        &self,
        _con: &mut MockConnection,
        booker_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = self
            .store
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|booking| booking.is_booked_by(booker_id))
            .cloned()
            .collect();
        Ok(apply_selection(rows, state, OffsetDateTime::now_utc()))
    }

    async fn find_all_by_owner(
        &self,
        _con: &mut MockConnection,
        owner_id: &UserId,
        state: BookingState,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let rows = {
            let store = self.store.lock().unwrap();
            store
                .bookings
                .iter()
                .filter(|booking| {
                    store
                        .items
                        .iter()
                        .any(|item| item.id() == booking.item_id() && item.is_owned_by(owner_id))
                })
                .cloned()
                .collect()
        };
        Ok(apply_selection(rows, state, OffsetDateTime::now_utc()))
    }

    async fn find_all_by_item(
        &self,
        _con: &mut MockConnection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Booking>, KernelError> {
        let mut rows: Vec<Booking> = self
            .store
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|booking| booking.item_id() == item_id)
            .cloned()
            .collect();
        rows.sort_by_key(|booking| *booking.period().start());
        Ok(rows)
    }

    async fn find_finished(
        &self,
        _con: &mut MockConnection,
        item_id: &ItemId,
        booker_id: &UserId,
        before: OffsetDateTime,
    ) -> error_stack::Result<Option<Booking>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|booking| {
                booking.item_id() == item_id
                    && booking.is_booked_by(booker_id)
                    && booking.period().ends_before(before)
            })
            .cloned())
    }
}

impl DependOnBookingQuery<MockConnection> for MockApp {
    type BookingQuery = Self;
    fn booking_query(&self) -> &Self::BookingQuery {
        self
    }
}

#[async_trait::async_trait]
impl BookingModifier<MockConnection> for MockApp {
    async fn create(
        &self,
        _con: &mut MockConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        self.store.lock().unwrap().bookings.push(booking.clone());
        Ok(())
    }

    async fn update(
        &self,
        _con: &mut MockConnection,
        booking: &Booking,
    ) -> error_stack::Result<(), KernelError> {
        let mut store = self.store.lock().unwrap();
        if let Some(row) = store
            .bookings
            .iter_mut()
            .find(|row| row.id() == booking.id())
        {
            *row = booking.clone();
        }
        Ok(())
    }
}

impl DependOnBookingModifier<MockConnection> for MockApp {
    type BookingModifier = Self;
    fn booking_modifier(&self) -> &Self::BookingModifier {
        self
    }
}

#[async_trait::async_trait]
impl CommentQuery<MockConnection> for MockApp {
    async fn find_all_by_item(
        &self,
        _con: &mut MockConnection,
        item_id: &ItemId,
    ) -> error_stack::Result<Vec<Comment>, KernelError> {
        let mut rows: Vec<Comment> = self
            .store
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|comment| comment.item_id() == item_id)
            .cloned()
            .collect();
        rows.sort_by_key(|comment| *comment.created_at().as_ref());
        Ok(rows)
    }
}

impl DependOnCommentQuery<MockConnection> for MockApp {
    type CommentQuery = Self;
    fn comment_query(&self) -> &Self::CommentQuery {
        self
    }
}

#[async_trait::async_trait]
impl CommentModifier<MockConnection> for MockApp {
    async fn create(
        &self,
        _con: &mut MockConnection,
        comment: &Comment,
    ) -> error_stack::Result<(), KernelError> {
        self.store.lock().unwrap().comments.push(comment.clone());
        Ok(())
    }
}

impl DependOnCommentModifier<MockConnection> for MockApp {
    type CommentModifier = Self;
    fn comment_modifier(&self) -> &Self::CommentModifier {
        self
    }
}

#[async_trait::async_trait]
impl RequestQuery<MockConnection> for MockApp {
    async fn find_by_id(
        &self,
        _con: &mut MockConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|request| request.id() == id)
            .cloned())
    }

    async fn find_all_by_requester(
        &self,
        _con: &mut MockConnection,
        requester_id: &UserId,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let mut rows: Vec<RentalRequest> = self
            .store
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.requester_id() == requester_id)
            .cloned()
            .collect();
        rows.sort_by_key(|request| *request.created_at().as_ref());
        rows.reverse();
        Ok(rows)
    }

    async fn find_all(
        &self,
        _con: &mut MockConnection,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let mut rows = self.store.lock().unwrap().requests.clone();
        rows.sort_by_key(|request| *request.created_at().as_ref());
        rows.reverse();
        Ok(rows)
    }
}

impl DependOnRequestQuery<MockConnection> for MockApp {
    type RequestQuery = Self;
    fn request_query(&self) -> &Self::RequestQuery {
        self
    }
}

#[async_trait::async_trait]
impl RequestModifier<MockConnection> for MockApp {
    async fn create(
        &self,
        _con: &mut MockConnection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        self.store.lock().unwrap().requests.push(request.clone());
        Ok(())
    }
}

impl DependOnRequestModifier<MockConnection> for MockApp {
    type RequestModifier = Self;
    fn request_modifier(&self) -> &Self::RequestModifier {
        self
    }
}
