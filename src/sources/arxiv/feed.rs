//! Atom feed parsing for arXiv search responses.
//!
//! The whole document must be well-formed XML; anything else is a
//! [`FeedError`] and no entries are returned. Inside a well-formed document
//! every `atom:entry` is extracted on its own: an entry that cannot be
//! extracted becomes an [`EntryError`] and is dropped by [`parse_feed`]
//! without affecting its neighbours.
//!
//! Elements are matched on their resolved namespace, so a feed that binds the
//! Atom namespace to a prefix (or declares it as the default) parses the same.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::models::{Paper, PaperBuilder};
use crate::utils::{clean_optional, clean_text, last_path_segment};

/// Atom namespace URI
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// arXiv extension namespace URI
pub const ARXIV_NS: &str = "http://arxiv.org/schemas/atom";

/// The document as a whole could not be read as XML
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("document ends inside an open element")]
    Unclosed,

    #[error("unexpected content outside the root element at byte {0}")]
    OutsideRoot(u64),

    #[error("unbound namespace prefix '{0}'")]
    UnboundPrefix(String),
}

/// A single entry could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("<{0}> element has no text content")]
    EmptyElement(&'static str),
}

/// Fields pulled out of one `atom:entry`, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub primary_category: Option<String>,
}

impl RawFeedEntry {
    /// Map raw fields onto the canonical paper record
    pub fn into_paper(self) -> Paper {
        let id = self
            .id
            .as_deref()
            .map(|id| last_path_segment(id.trim()))
            .unwrap_or_default()
            .to_string();

        PaperBuilder::new(id)
            .title(clean_optional(self.title.as_deref()))
            .authors(self.authors)
            .abstract_text(clean_optional(self.summary.as_deref()))
            .published_date(self.published.unwrap_or_default())
            .journal(self.primary_category)
            .build()
    }
}

/// Parse a feed into normalized papers, dropping entries that fail extraction
pub fn parse_feed(xml: &str) -> Result<Vec<Paper>, FeedError> {
    let entries = parse_entries(xml)?;
    let total = entries.len();

    let papers: Vec<Paper> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Ok(raw) => Some(raw.into_paper()),
            Err(e) => {
                tracing::debug!(index, error = %e, "Dropping malformed feed entry");
                None
            }
        })
        .collect();

    if papers.len() < total {
        tracing::debug!(
            kept = papers.len(),
            dropped = total - papers.len(),
            "Feed contained malformed entries"
        );
    }

    Ok(papers)
}

/// Parse a feed into one extraction result per `atom:entry`, in document order
pub fn parse_entries(xml: &str) -> Result<Vec<Result<RawFeedEntry, EntryError>>, FeedError> {
    let mut reader = NsReader::from_str(xml);
    let mut walker = FeedWalker::default();

    loop {
        let next = reader
            .read_resolved_event()
            .map(|(ns, event)| (Scope::of(&ns), event));

        let (scope, event) = match next {
            Ok(pair) => pair,
            Err(e) => {
                return Err(FeedError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })
            }
        };

        match event {
            Event::Start(ref e) => {
                walker.open_root(reader.buffer_position() as u64)?;
                let element = Element::classify(scope, e)?;
                walker.start(element, e, false);
            }
            Event::Empty(ref e) => {
                walker.open_root(reader.buffer_position() as u64)?;
                let element = Element::classify(scope, e)?;
                walker.start(element, e, true);
            }
            Event::End(_) => walker.end(),
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| FeedError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                if walker.depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(FeedError::OutsideRoot(reader.buffer_position() as u64));
                    }
                } else {
                    walker.text(&text);
                }
            }
            Event::CData(e) => {
                if walker.depth == 0 {
                    return Err(FeedError::OutsideRoot(reader.buffer_position() as u64));
                }
                walker.text(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    walker.finish()
}

/// Namespace of an element, reduced to the ones this parser cares about
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Atom,
    Arxiv,
    Other,
    Unknown(String),
}

impl Scope {
    fn of(ns: &ResolveResult) -> Self {
        match ns {
            ResolveResult::Bound(Namespace(uri)) if *uri == ATOM_NS.as_bytes() => Scope::Atom,
            ResolveResult::Bound(Namespace(uri)) if *uri == ARXIV_NS.as_bytes() => Scope::Arxiv,
            ResolveResult::Unknown(prefix) => {
                Scope::Unknown(String::from_utf8_lossy(prefix).into_owned())
            }
            _ => Scope::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Entry,
    Id,
    Title,
    Author,
    Name,
    Summary,
    Published,
    PrimaryCategory,
    Other,
}

impl Element {
    fn classify(scope: Scope, e: &BytesStart) -> Result<Self, FeedError> {
        let local = e.local_name();
        let element = match (scope, local.as_ref()) {
            (Scope::Atom, b"entry") => Element::Entry,
            (Scope::Atom, b"id") => Element::Id,
            (Scope::Atom, b"title") => Element::Title,
            (Scope::Atom, b"author") => Element::Author,
            (Scope::Atom, b"name") => Element::Name,
            (Scope::Atom, b"summary") => Element::Summary,
            (Scope::Atom, b"published") => Element::Published,
            (Scope::Arxiv, b"primary_category") => Element::PrimaryCategory,
            (Scope::Unknown(prefix), _) => return Err(FeedError::UnboundPrefix(prefix)),
            _ => Element::Other,
        };
        Ok(element)
    }
}

/// Text-bearing fields read from direct children of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
}

impl Field {
    fn tag(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Summary => "summary",
            Field::Published => "published",
        }
    }
}

/// What an open element below the entry means to the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Field(Field),
    Author,
    AuthorName,
    Other,
}

/// Extraction state for the entry currently being read
#[derive(Debug, Default)]
struct EntryCursor {
    /// Open elements below the entry element
    path: Vec<Node>,
    /// Text of the open field or author name, `None` until a text event arrives
    text: Option<String>,
    /// Set once the open field has had a child element; later text is a tail
    text_closed: bool,
    /// Name of the author block currently open
    author_name: Option<String>,
    raw: RawFeedEntry,
    error: Option<EntryError>,
}

impl EntryCursor {
    fn fail(&mut self, error: EntryError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn start(&mut self, element: Element, e: &BytesStart) {
        let parent = self.path.last().copied();
        let node = match (parent, element) {
            (None, Element::Id) => Node::Field(Field::Id),
            (None, Element::Title) => Node::Field(Field::Title),
            (None, Element::Summary) => Node::Field(Field::Summary),
            (None, Element::Published) => Node::Field(Field::Published),
            (None, Element::Author) => {
                self.author_name = None;
                Node::Author
            }
            (Some(Node::Author), Element::Name) => Node::AuthorName,
            (None, Element::PrimaryCategory) => {
                if self.raw.primary_category.is_none() {
                    self.raw.primary_category = term_attribute(e);
                }
                Node::Other
            }
            _ => Node::Other,
        };

        if matches!(node, Node::Field(_) | Node::AuthorName) {
            self.text = None;
            self.text_closed = false;
        } else if matches!(parent, Some(Node::Field(_)) | Some(Node::AuthorName)) {
            // Only text before the first child belongs to the field
            self.text_closed = true;
        }
        self.path.push(node);
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() || self.text_closed {
            return;
        }
        if matches!(
            self.path.last(),
            Some(Node::Field(_)) | Some(Node::AuthorName)
        ) {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    /// Close the innermost open element below the entry
    fn end(&mut self) {
        let Some(node) = self.path.pop() else {
            return;
        };

        match node {
            Node::Field(field) => {
                let text = self.text.take();
                self.finish_field(field, text);
            }
            Node::AuthorName => {
                let text = self.text.take();
                // Only the first name of an author block counts
                if self.author_name.is_some() {
                    return;
                }
                match text {
                    Some(name) => self.author_name = Some(name),
                    None => self.fail(EntryError::EmptyElement("name")),
                }
            }
            Node::Author => {
                if let Some(name) = self.author_name.take() {
                    self.raw.authors.push(clean_text(&name));
                }
            }
            Node::Other => {}
        }
    }

    fn finish_field(&mut self, field: Field, text: Option<String>) {
        let slot = match field {
            Field::Id => &mut self.raw.id,
            Field::Title => &mut self.raw.title,
            Field::Summary => &mut self.raw.summary,
            Field::Published => {
                if self.raw.published.is_none() {
                    self.raw.published = Some(text.unwrap_or_default());
                }
                return;
            }
        };

        // First occurrence wins
        if slot.is_some() {
            return;
        }
        match text {
            Some(text) => *slot = Some(text),
            None => self.fail(EntryError::EmptyElement(field.tag())),
        }
    }

    fn into_result(self) -> Result<RawFeedEntry, EntryError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.raw),
        }
    }
}

fn term_attribute(e: &BytesStart) -> Option<String> {
    e.try_get_attribute("term")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Tracks document depth and the entry currently being extracted
#[derive(Debug, Default)]
struct FeedWalker {
    depth: usize,
    root_seen: bool,
    entry: Option<EntryCursor>,
    entries: Vec<Result<RawFeedEntry, EntryError>>,
}

impl FeedWalker {
    /// Reject a second top-level element, reported at `position`
    fn open_root(&mut self, position: u64) -> Result<(), FeedError> {
        if self.depth == 0 {
            if self.root_seen {
                return Err(FeedError::OutsideRoot(position));
            }
            self.root_seen = true;
        }
        Ok(())
    }

    fn start(&mut self, element: Element, e: &BytesStart, empty: bool) {
        if let Some(cursor) = self.entry.as_mut() {
            cursor.start(element, e);
            if empty {
                cursor.end();
            }
        } else if element == Element::Entry {
            self.entry = Some(EntryCursor::default());
            if empty {
                self.close_entry();
            }
        }

        if !empty {
            self.depth += 1;
        }
    }

    fn end(&mut self) {
        self.depth = self.depth.saturating_sub(1);

        let closes_entry = match self.entry.as_mut() {
            Some(cursor) if cursor.path.is_empty() => true,
            Some(cursor) => {
                cursor.end();
                false
            }
            None => false,
        };
        if closes_entry {
            self.close_entry();
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(cursor) = self.entry.as_mut() {
            cursor.text(text);
        }
    }

    fn close_entry(&mut self) {
        if let Some(cursor) = self.entry.take() {
            self.entries.push(cursor.into_result());
        }
    }

    fn finish(self) -> Result<Vec<Result<RawFeedEntry, EntryError>>, FeedError> {
        if !self.root_seen {
            return Err(FeedError::NoRoot);
        }
        if self.depth != 0 {
            return Err(FeedError::Unclosed);
        }
        Ok(self.entries)
    }
}
