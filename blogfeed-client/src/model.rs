use std::{fmt, num::NonZeroU64, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Error, Debug)]
#[error("`{0}` is not a valid id")]
pub struct ParseIdError(String);

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Returns `None` for zero, which never names a record.
            pub fn new(raw: u64) -> Option<Self> {
                NonZeroU64::new(raw).map(Self)
            }

            pub fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse()
                    .ok()
                    .and_then(Self::new)
                    .ok_or_else(|| ParseIdError(s.to_string()))
            }
        }
    };
}

id_type!(
    /// Identifier of a [`User`].
    UserId
);
id_type!(
    /// Identifier of a [`Post`].
    PostId
);

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub company: Company,
}

impl User {
    pub fn user_id(&self) -> Option<UserId> {
        UserId::new(self.id)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn post_id(&self) -> Option<PostId> {
        PostId::new(self.id)
    }

    pub fn author_id(&self) -> Option<UserId> {
        UserId::new(self.user_id)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}
