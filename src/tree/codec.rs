//! Line-based text format for guess trees.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::GuessNode;
use crate::schema::Outcome;

/// Marker for an empty child slot.
pub const EMPTY_SLOT: &str = "-1";

/// Encode a tree as one line per node, joined by `\n` without a trailing
/// newline.
///
/// Nodes are numbered in pre-order: a node's line index is the position at
/// which it first appears, so the root is line 0 and every child reference
/// points forward.
pub fn encode(root: &GuessNode) -> Result<String, CodecError> {
    let visits = root.preorder();

    let mut slots = vec![[None; Outcome::COUNT]; visits.len()];
    for (index, visit) in visits.iter().enumerate() {
        if let Some((parent, outcome)) = visit.parent {
            slots[parent][outcome.index()] = Some(index);
        }
    }

    let mut lines = Vec::with_capacity(visits.len());
    for (visit, children) in visits.iter().zip(&slots) {
        let guess = &visit.node.guess;
        if guess.is_empty() || guess.contains(char::is_whitespace) {
            return Err(CodecError::InvalidGuess(guess.clone()));
        }
        let mut line = guess.clone();
        for child in children {
            line.push(' ');
            match child {
                Some(index) => line.push_str(&index.to_string()),
                None => line.push_str(EMPTY_SLOT),
            }
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Decode a tree from its line format.
///
/// Child references must point strictly forward and every line except the
/// root must be referenced exactly once, which rules out cycles and shared
/// subtrees.
pub fn decode(text: &str) -> Result<GuessNode, CodecError> {
    let lines: Vec<&str> = text.lines().collect();
    // Tolerate a trailing blank line left by editors.
    let count = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |last| last + 1);
    if count == 0 {
        return Err(CodecError::Empty);
    }

    // Children always sit on later lines, so building back to front means
    // every referenced node already exists.
    let mut built: Vec<Option<GuessNode>> = (0..count).map(|_| None).collect();
    for index in (0..count).rev() {
        let (guess, slots) = parse_line(lines[index], index, count)?;
        let mut node = GuessNode::leaf(guess);
        for (outcome, slot) in Outcome::ALL.into_iter().zip(slots) {
            let Some(child_index) = slot else { continue };
            let child = built[child_index].take().ok_or(CodecError::Malformed {
                line: index,
                reason: format!("line {} is referenced more than once", child_index),
            })?;
            node.set_child(outcome, Some(child));
        }
        built[index] = Some(node);
    }

    let root = built[0].take().ok_or(CodecError::Empty)?;
    if let Some(orphan) = built.iter().position(Option::is_some) {
        return Err(CodecError::Malformed {
            line: orphan,
            reason: "line is not referenced by any node".to_string(),
        });
    }
    Ok(root)
}

fn parse_line(
    line: &str,
    index: usize,
    count: usize,
) -> Result<(&str, [Option<usize>; Outcome::COUNT]), CodecError> {
    let malformed = |reason: String| CodecError::Malformed {
        line: index,
        reason,
    };

    let mut tokens = line.split_whitespace();
    let guess = tokens
        .next()
        .ok_or_else(|| malformed("missing guess".to_string()))?;

    let mut slots = [None; Outcome::COUNT];
    for slot in slots.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(format!("expected {} child indices", Outcome::COUNT)))?;
        let value: i64 = token
            .parse()
            .map_err(|_| malformed(format!("child index {:?} is not an integer", token)))?;
        *slot = match value {
            -1 => None,
            v if v > index as i64 && v < count as i64 => Some(v as usize),
            v => {
                return Err(malformed(format!(
                    "child index {} is out of range ({}..{})",
                    v,
                    index + 1,
                    count
                )));
            }
        };
    }
    if tokens.next().is_some() {
        return Err(malformed("trailing tokens".to_string()));
    }

    Ok((guess, slots))
}

/// Write the encoded tree to a writer.
pub fn write_to<W: Write>(root: &GuessNode, w: &mut W) -> Result<(), CodecError> {
    w.write_all(encode(root)?.as_bytes())?;
    Ok(())
}

/// Read and decode a tree from a reader.
pub fn read_from<R: Read>(r: &mut R) -> Result<GuessNode, CodecError> {
    let mut text = String::new();
    r.read_to_string(&mut text)?;
    decode(&text)
}

/// Save a tree to `path`.
///
/// The tree is written to a sibling temporary file first and renamed into
/// place, so readers never see a partially written tree.
pub fn save<P: AsRef<Path>>(root: &GuessNode, path: P) -> Result<(), CodecError> {
    let path = path.as_ref();
    let encoded = encode(root)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, encoded)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a tree from `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<GuessNode, CodecError> {
    let text = fs::read_to_string(path)?;
    decode(&text)
}

/// Tree codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Serialized tree is empty")]
    Empty,
    #[error("Malformed tree at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Guess {0:?} is empty or contains whitespace")]
    InvalidGuess(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
