use crate::{
    error::ParseError,
    parser::{Example, StringParser},
    types::{ChannelAddress, SemanticVersion},
};
use uuid::Uuid;

/// Hyphenated UUID, e.g. `c48e2e28-09be-41d5-8e58-260d162991cc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidParser;

impl StringParser for UuidParser {
    type Output = Uuid;

    fn parse(&self, raw: &str) -> Result<Uuid, ParseError> {
        Uuid::parse_str(raw).map_err(ParseError::new)
    }

    fn format(&self, value: &Uuid) -> String {
        value.hyphenated().to_string()
    }

    fn example(&self) -> Example<Uuid> {
        let value = Uuid::from_u128(0xc48e2e28_09be_41d5_8e58_260d162991cc);
        Example::new(self.format(&value), value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticVersionParser;

impl StringParser for SemanticVersionParser {
    type Output = SemanticVersion;

    fn parse(&self, raw: &str) -> Result<SemanticVersion, ParseError> {
        raw.parse()
    }

    fn format(&self, value: &SemanticVersion) -> String {
        value.to_string()
    }

    fn example(&self) -> Example<SemanticVersion> {
        Example::new("2024.1.0-SNAPSHOT", SemanticVersion::new(2024, 1, 0).additional("SNAPSHOT"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChannelAddressParser;

impl StringParser for ChannelAddressParser {
    type Output = ChannelAddress;

    fn parse(&self, raw: &str) -> Result<ChannelAddress, ParseError> {
        raw.parse()
    }

    fn format(&self, value: &ChannelAddress) -> String {
        value.to_string()
    }

    fn example(&self) -> Example<ChannelAddress> {
        Example::new("component0/Channel", ChannelAddress::new("component0", "Channel"))
    }
}
