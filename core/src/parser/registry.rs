use crate::{
    error::*,
    parser::{
        ChannelAddressParser, LocalDateParser, LocalTimeParser, PlainString,
        SemanticVersionParser, StringParser, UuidParser, ZonedDateTimeParser,
    },
};
use std::any::{type_name, Any};

struct Entry {
    tag: String,
    type_name: &'static str,
    example: String,
    parser: Box<dyn Any + Send + Sync>,
}

/// Explicit tag to parser map handed to whatever builds serializers.
/// Registries are independent values, there is no global one.
#[derive(Default)]
pub struct ParserRegistry {
    entries: Vec<Entry>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in parsers under their usual tags.
    pub fn with_defaults() -> Self {
        let mut result = Self::new();
        result
            .register("string", PlainString)
            .register("uuid", UuidParser)
            .register("semanticVersion", SemanticVersionParser)
            .register("channelAddress", ChannelAddressParser)
            .register("localDate", LocalDateParser::new())
            .register("localTime", LocalTimeParser::new())
            .register("zonedDateTime", ZonedDateTimeParser::new());
        result
    }

    pub fn register<P>(&mut self, tag: impl ToString, parser: P) -> &mut Self
    where
        P: StringParser + Send + Sync + 'static,
    {
        let entry = Entry {
            tag: tag.to_string(),
            type_name: type_name::<P>(),
            example: parser.example().raw,
            parser: Box::new(parser),
        };
        if let Some(index) = self.entries.iter().position(|e| e.tag == entry.tag) {
            tracing::warn!(
                tag = %entry.tag,
                previous = self.entries[index].type_name,
                parser = entry.type_name,
                "replacing string parser"
            );
            self.entries[index] = entry;
        } else {
            tracing::debug!(tag = %entry.tag, parser = entry.type_name, "registered string parser");
            self.entries.push(entry);
        }
        self
    }

    pub fn unregister(&mut self, tag: &str) -> bool {
        if let Some(index) = self.entries.iter().position(|e| e.tag == tag) {
            self.entries.remove(index);
            return true;
        }
        false
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|e| e.tag == tag)
    }

    /// `None` when nothing is registered under `tag` or it holds another parser type.
    pub fn get<P>(&self, tag: &str) -> Option<&P>
    where
        P: StringParser + 'static,
    {
        self.entries
            .iter()
            .find(|e| e.tag == tag)
            .and_then(|e| e.parser.downcast_ref::<P>())
    }

    pub fn require<P>(&self, tag: &str) -> Result<&P>
    where
        P: StringParser + 'static,
    {
        self.get::<P>(tag).ok_or_else(|| Error::UnknownParser {
            tag: tag.to_owned(),
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.tag.as_str())
    }

    /// Example raw strings by tag, in registration order.
    pub fn examples(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.tag.as_str(), e.example.as_str()))
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.tag, e.type_name)))
            .finish()
    }
}
