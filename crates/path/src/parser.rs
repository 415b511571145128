use pest::Parser;
use pest::error::{Error, InputLocation};
use pest::iterators::Pair;

use crate::error::{PathError, Result};
use crate::model::{GroupElement, Path};

const FILE_SEPARATOR: &str = "://";
const ATTRIBUTE_SEPARATOR: char = '@';

#[derive(pest_derive::Parser)]
#[grammar = "parser/nxpath.pest"]
pub struct PathParser;

/// Parse a textual NeXus path.
///
/// Either the whole input is accepted or a [`PathError::Syntax`] is returned;
/// there is no partially filled result.
pub fn parse_path(input: &str) -> Result<Path> {
    PathParser::parse_str(input).inspect_err(|err| {
        tracing::debug!(input, offset = err.offset(), %err, "path parse failed");
    })
}

/// The three lexical parts of a path string before the group chain is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawParts<'a> {
    pub file_name: &'a str,
    pub groups: &'a str,
    /// Byte offset of `groups` within the original input.
    pub groups_offset: usize,
    pub attribute: &'a str,
    /// Byte offset of `attribute` within the original input.
    pub attribute_offset: usize,
}

impl PathParser {
    pub fn parse_str(input: &str) -> Result<Path> {
        if input.is_empty() {
            return Err(PathError::syntax(input, 0, "empty path"));
        }
        let parts = Self::split_raw(input)?;

        let attribute = if parts.attribute.is_empty() {
            ""
        } else {
            Self::parse(Rule::attribute, parts.attribute)
                .map_err(|err| Self::syntax_error(input, parts.attribute_offset, &err))?;
            parts.attribute
        };

        let mut pairs = Self::parse(Rule::group_path, parts.groups)
            .map_err(|err| Self::syntax_error(input, parts.groups_offset, &err))?;
        let group_path = pairs
            .next()
            .ok_or_else(|| PathError::syntax(input, parts.groups_offset, "missing group path"))?;

        let mut absolute = false;
        let mut groups = Vec::new();
        for pair in group_path.into_inner() {
            match pair.as_rule() {
                Rule::root => absolute = true,
                Rule::group_chain => {
                    for element in pair.into_inner() {
                        groups.push(Self::build_element(input, parts.groups_offset, element)?);
                    }
                }
                _ => {}
            }
        }

        Ok(Path::from_parts(parts.file_name, absolute, groups, attribute))
    }

    /// Lexical pre-pass: cut the file part at the first `://` and the
    /// attribute at the last `@`.
    pub(crate) fn split_raw(input: &str) -> Result<RawParts<'_>> {
        let (file_name, rest, rest_offset) = match input.find(FILE_SEPARATOR) {
            Some(0) => return Err(PathError::syntax(input, 0, "missing file name before '://'")),
            Some(index) => {
                let start = index + FILE_SEPARATOR.len();
                (&input[..index], &input[start..], start)
            }
            None => ("", input, 0),
        };

        let (groups, attribute, attribute_offset) = match rest.rfind(ATTRIBUTE_SEPARATOR) {
            Some(index) => {
                let start = rest_offset + index + 1;
                let attribute = &rest[index + 1..];
                if attribute.is_empty() {
                    return Err(PathError::syntax(input, start, "missing attribute name after '@'"));
                }
                (&rest[..index], attribute, start)
            }
            None => (rest, "", 0),
        };

        Ok(RawParts { file_name, groups, groups_offset: rest_offset, attribute, attribute_offset })
    }

    fn build_element(input: &str, base: usize, pair: Pair<'_, Rule>) -> Result<GroupElement> {
        debug_assert_eq!(pair.as_rule(), Rule::group_elem);
        let offset = base + pair.as_span().start();
        let mut name = "";
        let mut class = "";
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::name => name = inner.as_str(),
                Rule::class => class = inner.as_str(),
                _ => {}
            }
        }

        if !name.is_empty() && name.bytes().all(|b| b == b'.') {
            if !class.is_empty() {
                return Err(PathError::syntax(input, offset, "'.' and '..' cannot carry a class"));
            }
            // any run of two or more dots collapses to the parent marker
            return Ok(if name.len() == 1 {
                GroupElement::current()
            } else {
                GroupElement::parent()
            });
        }

        Ok(GroupElement::new(name, class))
    }

    fn syntax_error(input: &str, base: usize, err: &Error<Rule>) -> PathError {
        let position = match err.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };
        PathError::syntax(input, base + position, err.variant.message())
    }
}
