//! Markup stripper.
//!
//! A three-state scanner over the body text. Tags are skipped, `&lt;` and
//! `&gt;` are resolved, and everything else in text position passes
//! through unchanged. No tree is built.

use std::collections::VecDeque;

/// Scanner position relative to the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    InTag,
    /// Accumulating `&name;`. Remembers whether a tag was interrupted.
    InEntity { in_tag: bool },
}

/// Lazily strip markup from a character stream.
///
/// Each call starts from a fresh scanner; the returned iterator borrows
/// nothing beyond `input`.
pub fn strip_markup<I>(input: I) -> StripMarkup<I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    StripMarkup {
        input: input.into_iter(),
        state: State::Text,
        entity: String::new(),
        pending: VecDeque::new(),
    }
}

/// Resolve a named entity, without its `&` and `;`.
pub fn lookup_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        _ => None,
    }
}

/// Iterator returned by [`strip_markup`].
#[derive(Debug, Clone)]
pub struct StripMarkup<I> {
    input: I,
    state: State,
    /// Entity name collected so far, excluding the leading `&`.
    entity: String,
    /// Output produced ahead of the consumer (an unresolved entity).
    pending: VecDeque<char>,
}

impl<I> StripMarkup<I> {
    /// Emit an unresolved entity verbatim, `&` first.
    fn flush_raw_entity(&mut self) {
        self.pending.push_back('&');
        self.pending.extend(self.entity.drain(..));
        self.pending.push_back(';');
    }
}

impl<I: Iterator<Item = char>> Iterator for StripMarkup<I> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.pending.pop_front() {
                return Some(ch);
            }

            let Some(ch) = self.input.next() else {
                // An entity never closed by `;` is dropped with whatever it
                // swallowed.
                self.entity.clear();
                return None;
            };

            match (self.state, ch) {
                (State::InEntity { in_tag }, ';') => {
                    self.state = if in_tag { State::InTag } else { State::Text };
                    match lookup_entity(&self.entity) {
                        Some(resolved) => {
                            self.entity.clear();
                            return Some(resolved);
                        },
                        None => self.flush_raw_entity(),
                    }
                },
                (State::InEntity { .. }, _) => self.entity.push(ch),
                (state, '&') => {
                    self.state = State::InEntity {
                        in_tag: state == State::InTag,
                    };
                },
                (State::Text, '<') => self.state = State::InTag,
                (State::InTag, '>') => self.state = State::Text,
                // Stray delimiters and tag contents.
                (State::Text, '>') | (State::InTag, _) => {},
                (State::Text, _) => return Some(ch),
            }
        }
    }
}
