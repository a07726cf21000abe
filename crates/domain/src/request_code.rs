//! Platform timers are keyed by integers, not UUIDs. These functions map
//! a `Reminder` id onto that keyspace without the collisions a string hash
//! would produce.

use crate::shared::entity::ID;
use uuid::Uuid;

/// Action prefix for the snooze timer of a `Reminder`
pub const SNOOZE_ACTION: &str = "snooze";

fn fold(id: &Uuid) -> i64 {
    let bits = id.as_u128();
    let high = (bits >> 64) as u64;
    let low = bits as u64;
    ((high ^ low) & i64::MAX as u64) as i64
}

/// Timer key of the main alarm of a `Reminder`
pub fn request_code(reminder_id: &ID) -> i64 {
    fold(reminder_id.inner_ref())
}

/// Timer key of an auxiliary action (e.g. snooze) of a `Reminder`.
///
/// The action is combined with the reminder id into a name based uuid
/// before folding, so keys of different reminders do not collide.
pub fn action_request_code(reminder_id: &ID, action: &str) -> i64 {
    fold(&Uuid::new_v5(reminder_id.inner_ref(), action.as_bytes()))
}
