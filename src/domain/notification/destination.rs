//! Broker destination addressing.
//!
//! Subscribers already listen on these exact strings, so the formats below
//! must not change:
//!
//! | Destination | Address |
//! |---|---|
//! | `User(id)` | `/user/{id}/queue/notifications` |
//! | `Broadcast` | `/topic/notifications` |
//! | `Channel(name)` | `/topic/{name}` |

use std::fmt;

use crate::domain::foundation::UserId;

/// Global topic every notification subscriber listens on.
pub const BROADCAST_TOPIC: &str = "/topic/notifications";

const TOPIC_PREFIX: &str = "/topic/";
const USER_PREFIX: &str = "/user/";
const USER_QUEUE_SUFFIX: &str = "/queue/notifications";

/// Where a notification is routed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Private queue of a single user.
    User(UserId),
    /// Global notifications topic.
    Broadcast,
    /// Named topic, e.g. `cases` or `admin`.
    Channel(String),
}

impl Destination {
    pub fn user(user_id: UserId) -> Self {
        Destination::User(user_id)
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Destination::Channel(name.into())
    }

    /// Wire address the broker routes on.
    pub fn address(&self) -> String {
        match self {
            Destination::User(user_id) => {
                format!("{}{}{}", USER_PREFIX, user_id, USER_QUEUE_SUFFIX)
            }
            Destination::Broadcast => BROADCAST_TOPIC.to_string(),
            Destination::Channel(name) => format!("{}{}", TOPIC_PREFIX, name),
        }
    }

    /// Short identifier for log fields: the user id, the channel name, or
    /// `broadcast`.
    pub fn target(&self) -> String {
        match self {
            Destination::User(user_id) => user_id.to_string(),
            Destination::Broadcast => "broadcast".to_string(),
            Destination::Channel(name) => name.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}
