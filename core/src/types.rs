use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Address of one channel of one component, written `component0/Channel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelAddress {
    pub component_id: String,
    pub channel_id: String,
}

impl ChannelAddress {
    pub fn new(component_id: impl ToString, channel_id: impl ToString) -> Self {
        Self {
            component_id: component_id.to_string(),
            channel_id: channel_id.to_string(),
        }
    }
}

impl FromStr for ChannelAddress {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('/') {
            Some((component_id, channel_id))
                if !component_id.is_empty() && !channel_id.is_empty() =>
            {
                Ok(Self::new(component_id, channel_id))
            }
            _ => Err(ParseError::new(format!(
                "`{}` is not a channel address of form `component/channel`",
                value
            ))),
        }
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component_id, self.channel_id)
    }
}

/// `major.minor.patch` with an optional `-suffix`, e.g. `2024.1.0-SNAPSHOT`.
/// Missing numeric components read as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub additional: String,
}

impl SemanticVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            additional: Default::default(),
        }
    }

    pub fn additional(mut self, value: impl ToString) -> Self {
        self.additional = value.to_string();
        self
    }

    /// Compares numeric components only.
    pub fn is_at_least(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) >= (other.major, other.minor, other.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (numbers, additional) = value.split_once('-').unwrap_or((value, ""));
        if numbers.is_empty() {
            return Err(ParseError::new("empty version"));
        }
        let mut components = [0u32; 3];
        for (index, part) in numbers.split('.').enumerate() {
            let Some(component) = components.get_mut(index) else {
                return Err(ParseError::new(format!(
                    "version `{}` has more than three components",
                    value
                )));
            };
            *component = part.parse().map_err(|_| {
                ParseError::new(format!("invalid version component `{}` in `{}`", part, value))
            })?;
        }
        let [major, minor, patch] = components;
        Ok(Self::new(major, minor, patch).additional(additional))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.additional.is_empty() {
            write!(f, "-{}", self.additional)?;
        }
        Ok(())
    }
}

macro_rules! impl_string_serde {
    ($type:ty) => {
        impl Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_string_serde!(ChannelAddress);
impl_string_serde!(SemanticVersion);
