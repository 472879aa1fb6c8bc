use crate::{HubError, Result as HubErrorResult};

use std::fmt;
use std::ops::Deref;
use std::panic::Location;

use error_location::ErrorLocation;

/// A validated channel name: one or more of `a-z`, `0-9`, `-`, `_` or `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(String);

impl ChannelName {
    #[track_caller]
    pub fn parse(value: &str) -> HubErrorResult<Self> {
        if Self::is_valid(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(HubError::InvalidChannel {
                name: value.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'/'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ChannelName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
