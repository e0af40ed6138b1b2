//! Format-preserving access to Maven POM manifests.
//!
//! A [`PomDocument`] keeps its source text verbatim and edits it by spans,
//! so untouched regions survive byte for byte: whitespace, attribute order,
//! comments, and the original element layout are all preserved. Only the
//! elements the migration cares about are inspected; everything else is
//! opaque text.
//!
//! The canonical dependency block is the `<dependencies>` element that is a
//! direct child of `<project>`. A `<dependencies>` nested anywhere else,
//! such as under `<dependencyManagement>` or inside a `<profile>`, is never
//! read or edited.

use camino::{Utf8Path, Utf8PathBuf};
use repkg_core::Dependency;

use crate::error::ManifestError;

/// A Maven manifest held as verbatim text with span-based editing.
///
/// Loading never normalizes the document. Insertions copy the indentation
/// style already present around the insertion point, so a two-space POM
/// stays two-space and a tab-indented POM stays tab-indented.
#[derive(Debug, Clone)]
pub struct PomDocument {
    path: Utf8PathBuf,
    text: String,
    changed: bool,
}

/// Coordinates of a dependency already declared in a manifest.
///
/// The version is deliberately not part of the identity: two declarations
/// of the same `groupId`/`artifactId` are the same dependency even when
/// their versions differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// The declared `<groupId>` text.
    pub group_id: String,
    /// The declared `<artifactId>` text.
    pub artifact_id: String,
}

impl DeclaredDependency {
    /// Returns `true` when this declaration covers `dependency`, ignoring
    /// the version.
    #[must_use]
    pub fn covers(&self, dependency: &Dependency) -> bool {
        self.group_id == dependency.group_id && self.artifact_id == dependency.artifact_id
    }
}

impl PomDocument {
    /// Parses manifest text, verifying that a `<project>` root exists.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingElement`] when the text has no
    /// well-formed `<project>` element.
    pub fn parse(
        path: impl Into<Utf8PathBuf>,
        text: impl Into<String>,
    ) -> Result<Self, ManifestError> {
        let document = Self {
            path: path.into(),
            text: text.into(),
            changed: false,
        };
        document.project_element()?;
        Ok(document)
    }

    /// Reads and parses a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] when the file cannot be read, or a
    /// parse error from [`PomDocument::parse`].
    pub fn load(path: impl Into<Utf8PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ManifestError::io(path.clone(), source))?;
        Self::parse(path, text)
    }

    /// The path this manifest was loaded from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The current manifest text, including any edits made so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once at least one dependency has been inserted.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// The dependencies declared in the canonical `<dependencies>` block.
    ///
    /// Entries missing a `<groupId>` or `<artifactId>` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingElement`] when `<project>` has no
    /// direct `<dependencies>` child.
    pub fn dependencies(&self) -> Result<Vec<DeclaredDependency>, ManifestError> {
        let project = self.project_element()?;
        let block = self.dependencies_element(&project)?;
        let entries = collect_children(&self.text, block.content_range(), "dependency");
        Ok(entries
            .iter()
            .filter_map(|entry| self.declared(entry))
            .collect())
    }

    /// Returns `true` when the canonical block already declares the given
    /// coordinates, at any version.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingElement`] when `<project>` has no
    /// direct `<dependencies>` child.
    pub fn has_dependency(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<bool, ManifestError> {
        Ok(self
            .dependencies()?
            .iter()
            .any(|declared| declared.group_id == group_id && declared.artifact_id == artifact_id))
    }

    /// Inserts `dependency` into the canonical `<dependencies>` block.
    ///
    /// Returns `Ok(true)` when the entry was added and `Ok(false)` when a
    /// declaration with the same `groupId` and `artifactId` already exists,
    /// regardless of its version. The new entry is appended after the last
    /// existing `<dependency>`, indented to match its siblings.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingElement`] when `<project>` has no
    /// direct `<dependencies>` child. The block is never created; a
    /// manifest without one is left untouched.
    pub fn insert_dependency(&mut self, dependency: &Dependency) -> Result<bool, ManifestError> {
        let project = self.project_element()?;
        let block = self.dependencies_element(&project)?;
        let entries = collect_children(&self.text, block.content_range(), "dependency");

        if entries
            .iter()
            .filter_map(|entry| self.declared(entry))
            .any(|declared| declared.covers(dependency))
        {
            tracing::debug!(
                path = %self.path,
                dependency = %dependency,
                "dependency already declared, skipping"
            );
            return Ok(false);
        }

        let block_indent = line_indent(&self.text, block.start).to_owned();
        let project_indent = line_indent(&self.text, project.start).to_owned();
        let base_unit = indent_unit(&project_indent, &block_indent);
        let (entry_indent, unit) = match entries.last() {
            Some(last) => {
                let indent = line_indent(&self.text, last.start).to_owned();
                let unit = indent_unit(&block_indent, &indent);
                (indent, unit)
            }
            None => (format!("{block_indent}{base_unit}"), base_unit),
        };
        let rendered = render_dependency(dependency, &entry_indent, &unit);

        if block.is_self_closing() {
            let replacement = format!("<dependencies>\n{rendered}\n{block_indent}</dependencies>");
            self.text.replace_range(block.start..block.end, &replacement);
        } else {
            let (close_ws_start, after_newline) = {
                let bytes = self.text.as_bytes();
                let mut at = block.content_end;
                while at > block.content_start
                    && matches!(bytes.get(at - 1).copied(), Some(b' ' | b'\t'))
                {
                    at -= 1;
                }
                let newline = at > block.content_start && bytes.get(at - 1).copied() == Some(b'\n');
                (at, newline)
            };
            if after_newline {
                self.text.insert_str(close_ws_start, &format!("{rendered}\n"));
            } else {
                self.text
                    .insert_str(block.content_end, &format!("\n{rendered}\n{block_indent}"));
            }
        }
        self.changed = true;
        tracing::debug!(
            path = %self.path,
            dependency = %dependency,
            "injected dependency into manifest"
        );
        Ok(true)
    }

    fn project_element(&self) -> Result<Element, ManifestError> {
        find_child(&self.text, (0, self.text.len()), "project")
            .ok_or_else(|| ManifestError::missing_element(self.path.clone(), "project"))
    }

    fn dependencies_element(&self, project: &Element) -> Result<Element, ManifestError> {
        find_child(&self.text, project.content_range(), "dependencies")
            .ok_or_else(|| ManifestError::missing_element(self.path.clone(), "dependencies"))
    }

    fn declared(&self, entry: &Element) -> Option<DeclaredDependency> {
        let group = find_child(&self.text, entry.content_range(), "groupId")?;
        let artifact = find_child(&self.text, entry.content_range(), "artifactId")?;
        Some(DeclaredDependency {
            group_id: element_text(&self.text, &group).to_owned(),
            artifact_id: element_text(&self.text, &artifact).to_owned(),
        })
    }
}

/// Byte spans of one element occurrence.
///
/// `start..end` covers the whole element including both tags;
/// `content_start..content_end` covers the text between them. A
/// self-closing element has an empty content range equal to `end`.
#[derive(Debug, Clone, Copy)]
struct Element {
    start: usize,
    content_start: usize,
    content_end: usize,
    end: usize,
}

impl Element {
    fn content_range(&self) -> (usize, usize) {
        (self.content_start, self.content_end)
    }

    fn is_self_closing(&self) -> bool {
        self.content_start == self.end
    }
}

enum Token<'a> {
    /// `<name ...>`
    Open {
        name: &'a str,
        start: usize,
        end: usize,
    },
    /// `</name>`
    Close {
        name: &'a str,
        start: usize,
        end: usize,
    },
    /// `<name ... />`
    SelfClose {
        name: &'a str,
        start: usize,
        end: usize,
    },
    /// Comment, processing instruction, doctype, or CDATA section.
    Skip { start: usize, end: usize },
}

/// Scans for the next markup token at or after `from`.
///
/// Returns `None` at end of input or when a token is left unterminated.
fn next_token(text: &str, from: usize) -> Option<Token<'_>> {
    let rest = text.get(from..)?;
    let rel = rest.find('<')?;
    let start = from + rel;
    let tail = &rest[rel..];
    if let Some(body) = tail.strip_prefix("<!--") {
        let close = body.find("-->")?;
        return Some(Token::Skip {
            start,
            end: start + 4 + close + 3,
        });
    }
    if let Some(body) = tail.strip_prefix("<![CDATA[") {
        let close = body.find("]]>")?;
        return Some(Token::Skip {
            start,
            end: start + 9 + close + 3,
        });
    }
    if tail.starts_with("<?") || tail.starts_with("<!") {
        let close = tail.find('>')?;
        return Some(Token::Skip {
            start,
            end: start + close + 1,
        });
    }
    if let Some(body) = tail.strip_prefix("</") {
        let name = &body[..tag_name_len(body)];
        let close = tail.find('>')?;
        return Some(Token::Close {
            name,
            start,
            end: start + close + 1,
        });
    }
    let body = &tail[1..];
    let name_len = tag_name_len(body);
    if name_len == 0 {
        // Stray `<` in text content.
        return Some(Token::Skip {
            start,
            end: start + 1,
        });
    }
    let name = &body[..name_len];
    let close = tail.find('>')?;
    let end = start + close + 1;
    if tail[..close].ends_with('/') {
        Some(Token::SelfClose { name, start, end })
    } else {
        Some(Token::Open { name, start, end })
    }
}

fn tag_name_len(text: &str) -> usize {
    text.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        .unwrap_or(text.len())
}

/// Finds the first direct child element named `name` within `range`.
///
/// Depth tracking keeps the search at the immediate-child level, so a
/// same-named element nested deeper never matches.
fn find_child(text: &str, range: (usize, usize), name: &str) -> Option<Element> {
    let (from, until) = range;
    let mut pos = from;
    let mut depth = 0usize;
    while let Some(token) = next_token(text, pos) {
        match token {
            Token::Skip { start, end } => {
                if start >= until {
                    return None;
                }
                pos = end;
            }
            Token::Open { name: tag, start, end } => {
                if start >= until {
                    return None;
                }
                if depth == 0 && tag == name {
                    return close_of(text, start, end, name, until);
                }
                depth += 1;
                pos = end;
            }
            Token::SelfClose { name: tag, start, end } => {
                if start >= until {
                    return None;
                }
                if depth == 0 && tag == name {
                    return Some(Element {
                        start,
                        content_start: end,
                        content_end: end,
                        end,
                    });
                }
                pos = end;
            }
            Token::Close { start, end, .. } => {
                if start >= until || depth == 0 {
                    return None;
                }
                depth -= 1;
                pos = end;
            }
        }
    }
    None
}

/// Completes an element whose open tag ends at `content_start` by locating
/// its matching close tag.
fn close_of(
    text: &str,
    start: usize,
    content_start: usize,
    name: &str,
    until: usize,
) -> Option<Element> {
    let mut pos = content_start;
    let mut depth = 0usize;
    while let Some(token) = next_token(text, pos) {
        match token {
            Token::Skip { end, .. } | Token::SelfClose { end, .. } => pos = end,
            Token::Open { end, .. } => {
                depth += 1;
                pos = end;
            }
            Token::Close {
                name: tag,
                start: close_start,
                end,
            } => {
                if depth == 0 {
                    if tag == name && close_start < until {
                        return Some(Element {
                            start,
                            content_start,
                            content_end: close_start,
                            end,
                        });
                    }
                    return None;
                }
                depth -= 1;
                pos = end;
            }
        }
    }
    None
}

/// Collects every direct child element named `name` within `range`.
fn collect_children(text: &str, range: (usize, usize), name: &str) -> Vec<Element> {
    let mut found = Vec::new();
    let mut pos = range.0;
    while let Some(element) = find_child(text, (pos, range.1), name) {
        pos = element.end;
        found.push(element);
    }
    found
}

fn element_text<'a>(text: &'a str, element: &Element) -> &'a str {
    text.get(element.content_start..element.content_end)
        .unwrap_or("")
        .trim()
}

/// The whitespace prefix of the line `at` sits on, or `""` when the tag is
/// not the first thing on its line.
fn line_indent(text: &str, at: usize) -> &str {
    let line_start = text
        .get(..at)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |newline| newline + 1);
    let prefix = text.get(line_start..at).unwrap_or("");
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

/// One level of indentation, inferred from a parent/child indent pair.
fn indent_unit(parent: &str, child: &str) -> String {
    match child.strip_prefix(parent) {
        Some(unit) if !unit.is_empty() => unit.to_owned(),
        _ => "    ".to_owned(),
    }
}

fn render_dependency(dependency: &Dependency, indent: &str, unit: &str) -> String {
    let inner = format!("{indent}{unit}");
    let mut xml = String::new();
    xml.push_str(&format!("{indent}<dependency>\n"));
    xml.push_str(&format!(
        "{inner}<groupId>{}</groupId>\n",
        escape_text(&dependency.group_id)
    ));
    xml.push_str(&format!(
        "{inner}<artifactId>{}</artifactId>\n",
        escape_text(&dependency.artifact_id)
    ));
    xml.push_str(&format!(
        "{inner}<version>{}</version>\n",
        escape_text(&dependency.version)
    ));
    if let Some(scope) = &dependency.scope {
        xml.push_str(&format!("{inner}<scope>{}</scope>\n", escape_text(scope)));
    }
    if !dependency.exclusions.is_empty() {
        xml.push_str(&format!("{inner}<exclusions>\n"));
        for exclusion in &dependency.exclusions {
            xml.push_str(&format!("{inner}{unit}<exclusion>\n"));
            xml.push_str(&format!(
                "{inner}{unit}{unit}<groupId>{}</groupId>\n",
                escape_text(&exclusion.group_id)
            ));
            xml.push_str(&format!(
                "{inner}{unit}{unit}<artifactId>{}</artifactId>\n",
                escape_text(&exclusion.artifact_id)
            ));
            xml.push_str(&format!("{inner}{unit}</exclusion>\n"));
        }
        xml.push_str(&format!("{inner}</exclusions>\n"));
    }
    xml.push_str(&format!("{indent}</dependency>"));
    xml
}

fn escape_text(value: &str) -> String {
    if !value.contains(['&', '<', '>']) {
        return value.to_owned();
    }
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
