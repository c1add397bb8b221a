//! Parser module: compiles the static segments of a template into a `Block`.
//!
//! The parser is a single left-to-right scan driven by a small mode machine.
//! Every hole between two static segments triggers the same commit a literal
//! boundary would, except the emitted record points at the hole through its
//! field index instead of carrying text. The output never depends on the
//! dynamic values.
//!
//! The parser is lenient: it never fails, and for markup outside the supported
//! grammar it still returns a well-formed (if meaningless) block.

use crate::ir::{Block, Instruction};
use crate::trim::trim_line_breaks;
use crate::types::{FieldIndex, Literal};
use std::mem;

const SPREAD_MARKER: &str = "...";
const COMMENT_OPEN: &str = "!--";
const COMMENT_CLOSE_TAIL: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// After a `/` that closes an element; everything up to `>` is ignored.
    Slash,
    Text,
    /// Inside an open tag, between attributes.
    Whitespace,
    TagName,
    Comment,
    PropSet,
    PropAppend,
}

// Hand-written scanner over the static segments
pub struct TemplateParser<'a, S> {
    statics: &'a [S],
    mode: Mode,
    buffer: String,
    quote: Option<char>,
    prop_name: String,
    current: Block,
    parents: Vec<Block>,
    // Text accumulated since the last hole is kept verbatim.
    text_after_hole: bool,
}

impl<'a, S: AsRef<str>> TemplateParser<'a, S> {
    pub fn new(statics: &'a [S]) -> Self {
        Self {
            statics,
            mode: Mode::Text,
            buffer: String::new(),
            quote: None,
            prop_name: String::new(),
            current: Block::new(),
            parents: Vec::new(),
            text_after_hole: false,
        }
    }

    pub fn parse(statics: &'a [S]) -> Block {
        TemplateParser::new(statics).run()
    }

    fn run(mut self) -> Block {
        let statics = self.statics;
        for (i, segment) in statics.iter().enumerate() {
            if i > 0 {
                if self.mode == Mode::Text {
                    self.text_after_hole = true;
                    self.commit(FieldIndex::LITERAL);
                }
                self.commit(FieldIndex(i));
            }
            self.scan_segment(segment.as_ref());
        }
        self.commit(FieldIndex::LITERAL);

        while !self.parents.is_empty() {
            log::trace!(target: "htree.parser", "closing unterminated element at end of input");
            self.close_element();
        }

        log::debug!(
            target: "htree.parser",
            "parsed {} static segments into {} top-level records",
            statics.len(),
            self.current.len()
        );
        self.current
    }

    fn scan_segment(&mut self, segment: &str) {
        let mut chars = segment.chars().peekable();
        while let Some(ch) = chars.next() {
            if self.mode == Mode::Text {
                if ch == '<' {
                    self.commit(FieldIndex::LITERAL);
                    self.descend();
                    self.set_mode(Mode::TagName);
                } else {
                    self.buffer.push(ch);
                }
            } else if self.mode == Mode::Comment {
                if self.buffer == COMMENT_CLOSE_TAIL && ch == '>' {
                    self.buffer.clear();
                    self.enter_text();
                } else {
                    // Keep only the last two characters, newest first.
                    let previous = self.buffer.chars().next();
                    self.buffer.clear();
                    self.buffer.push(ch);
                    self.buffer.extend(previous);
                }
            } else if let Some(quote) = self.quote {
                if ch == quote {
                    self.quote = None;
                } else {
                    self.buffer.push(ch);
                }
            } else if ch == '"' || ch == '\'' {
                self.quote = Some(ch);
            } else if ch == '>' {
                self.commit(FieldIndex::LITERAL);
                self.enter_text();
            } else if self.mode == Mode::Slash {
                // Ignore everything until the tag ends
            } else if ch == '=' {
                self.set_mode(Mode::PropSet);
                self.prop_name = mem::take(&mut self.buffer);
            } else if ch == '/'
                && (matches!(self.mode, Mode::Whitespace | Mode::TagName)
                    || chars.peek() == Some(&'>'))
            {
                self.commit(FieldIndex::LITERAL);
                if self.mode == Mode::TagName {
                    // `</name>`: drop the block opened by its `<`
                    self.ascend();
                }
                self.close_element();
                self.set_mode(Mode::Slash);
            } else if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.commit(FieldIndex::LITERAL);
                self.set_mode(Mode::Whitespace);
            } else {
                self.buffer.push(ch);
            }

            if self.mode == Mode::TagName && self.buffer == COMMENT_OPEN {
                self.set_mode(Mode::Comment);
                self.ascend();
            }
        }
    }

    /// Flush the buffer (or the hole named by `field`) as a record appropriate
    /// to the current mode.
    fn commit(&mut self, field: FieldIndex) {
        let hole = !field.is_literal();
        match self.mode {
            Mode::Text => {
                if hole {
                    let literal = mem::take(&mut self.buffer);
                    self.emit(Instruction::ChildAppend { field, literal });
                } else {
                    let text = if self.text_after_hole {
                        mem::take(&mut self.buffer)
                    } else {
                        trim_line_breaks(&self.buffer).into_owned()
                    };
                    if !text.is_empty() {
                        self.emit(Instruction::ChildAppend { field, literal: text });
                    }
                }
            }
            Mode::TagName if hole || !self.buffer.is_empty() => {
                let literal = mem::take(&mut self.buffer);
                self.emit(Instruction::TagSet { field, literal });
                self.set_mode(Mode::Whitespace);
            }
            Mode::Whitespace if hole && self.buffer == SPREAD_MARKER => {
                self.emit(Instruction::PropsAssign { field });
            }
            Mode::Whitespace if !hole && !self.buffer.is_empty() => {
                let name = mem::take(&mut self.buffer);
                self.emit(Instruction::PropSet {
                    name,
                    field,
                    literal: Literal::Bool(true),
                });
            }
            Mode::PropSet | Mode::PropAppend => {
                if !self.buffer.is_empty() || (!hole && self.mode == Mode::PropSet) {
                    let literal = Literal::Str(mem::take(&mut self.buffer));
                    self.emit_prop(FieldIndex::LITERAL, literal);
                }
                if hole {
                    self.emit_prop(field, Literal::Str(String::new()));
                }
            }
            _ => {}
        }
        self.buffer.clear();
    }

    /// Emit the next value part of the open attribute; the first part opens it.
    fn emit_prop(&mut self, field: FieldIndex, literal: Literal) {
        let name = self.prop_name.clone();
        let instruction = if self.mode == Mode::PropSet {
            Instruction::PropSet { name, field, literal }
        } else {
            Instruction::PropAppend { name, field, literal }
        };
        self.emit(instruction);
        self.set_mode(Mode::PropAppend);
    }

    fn emit(&mut self, instruction: Instruction) {
        log::trace!(
            target: "htree.parser",
            "emit {:?} at depth {}",
            instruction.opcode(),
            self.parents.len()
        );
        self.current.push(instruction);
    }

    fn descend(&mut self) {
        let parent = mem::take(&mut self.current);
        self.parents.push(parent);
    }

    /// Leave the current block without attaching it to its parent.
    fn ascend(&mut self) {
        if let Some(parent) = self.parents.pop() {
            self.current = parent;
        }
    }

    /// Leave the current block and append it to its parent as a child element.
    fn close_element(&mut self) {
        match self.parents.pop() {
            Some(parent) => {
                let block = mem::replace(&mut self.current, parent);
                self.emit(Instruction::ChildRecurse { block });
            }
            None => {
                log::trace!(target: "htree.parser", "ignoring close marker at top level");
            }
        }
    }

    fn enter_text(&mut self) {
        self.text_after_hole = false;
        self.set_mode(Mode::Text);
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::trace!(target: "htree.parser", "mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

/// Compile static segments into an instruction stream.
pub fn parse<S: AsRef<str>>(statics: &[S]) -> Block {
    TemplateParser::parse(statics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Opcode;

    fn lit(s: &str) -> Instruction {
        Instruction::ChildAppend { field: FieldIndex::LITERAL, literal: s.to_string() }
    }

    fn tag(name: &str) -> Instruction {
        Instruction::TagSet { field: FieldIndex::LITERAL, literal: name.to_string() }
    }

    fn only_child(block: &Block) -> &Block {
        match block.instructions() {
            [Instruction::ChildRecurse { block }] => block,
            other => panic!("Expected a single element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_element_with_text() {
        let block = parse(&["<div>hello</div>"]);
        let div = only_child(&block);
        assert_eq!(div.instructions(), &[tag("div"), lit("hello")]);
    }

    #[test]
    fn test_parse_dynamic_child() {
        let block = parse(&["<div>", "</div>"]);
        let div = only_child(&block);
        assert_eq!(
            div.instructions(),
            &[tag("div"), Instruction::ChildAppend { field: FieldIndex(1), literal: String::new() }]
        );
    }

    #[test]
    fn test_parse_dynamic_tag_name() {
        let block = parse(&["<", " a=b />"]);
        let el = only_child(&block);
        assert_eq!(
            el.instructions()[0],
            Instruction::TagSet { field: FieldIndex(1), literal: String::new() }
        );
        assert_eq!(el.instructions()[1].opcode(), Opcode::PropSet);
    }

    #[test]
    fn test_parse_quoted_attribute_parts() {
        let block = parse(&["<div class=\"a ", " b\"></div>"]);
        let div = only_child(&block);
        assert_eq!(
            div.instructions(),
            &[
                tag("div"),
                Instruction::PropSet {
                    name: "class".into(),
                    field: FieldIndex::LITERAL,
                    literal: "a ".into(),
                },
                Instruction::PropAppend {
                    name: "class".into(),
                    field: FieldIndex(1),
                    literal: "".into(),
                },
                Instruction::PropAppend {
                    name: "class".into(),
                    field: FieldIndex::LITERAL,
                    literal: " b".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_whole_attribute_hole() {
        let block = parse(&["<a href=", ">x</a>"]);
        let a = only_child(&block);
        assert_eq!(
            a.instructions()[1],
            Instruction::PropSet { name: "href".into(), field: FieldIndex(1), literal: "".into() }
        );
    }

    #[test]
    fn test_parse_empty_quoted_attribute() {
        let block = parse(&["<a title=\"\"/>"]);
        let a = only_child(&block);
        assert_eq!(
            a.instructions()[1],
            Instruction::PropSet {
                name: "title".into(),
                field: FieldIndex::LITERAL,
                literal: "".into(),
            }
        );
    }

    #[test]
    fn test_parse_spread() {
        let block = parse(&["<div ...", "></div>"]);
        let div = only_child(&block);
        assert_eq!(div.instructions()[1], Instruction::PropsAssign { field: FieldIndex(1) });
    }

    #[test]
    fn test_parse_boolean_attribute() {
        let block = parse(&["<input disabled>"]);
        // Not self-closed, so it stays open and is closed at end of input.
        let input = only_child(&block);
        assert_eq!(
            input.instructions()[1],
            Instruction::PropSet {
                name: "disabled".into(),
                field: FieldIndex::LITERAL,
                literal: Literal::Bool(true),
            }
        );
    }

    #[test]
    fn test_parse_self_closing_variants() {
        for src in ["<br/>", "<br />"] {
            let block = parse(&[src]);
            let br = only_child(&block);
            assert_eq!(br.instructions(), &[tag("br")]);
        }
    }

    #[test]
    fn test_parse_slash_inside_unquoted_value() {
        let block = parse(&["<a href=/x/y/>"]);
        let a = only_child(&block);
        assert_eq!(
            a.instructions()[1],
            Instruction::PropSet {
                name: "href".into(),
                field: FieldIndex::LITERAL,
                literal: "/x/y".into(),
            }
        );
    }

    #[test]
    fn test_parse_comment_is_dropped() {
        let block = parse(&["<div><!-- a <b> c --></div>"]);
        let div = only_child(&block);
        assert_eq!(div.instructions(), &[tag("div")]);
    }

    #[test]
    fn test_parse_hole_inside_comment_is_dropped() {
        let block = parse(&["<div><!-- ", " --></div>"]);
        let div = only_child(&block);
        assert_eq!(div.instructions(), &[tag("div")]);
    }

    #[test]
    fn test_parse_nested_elements() {
        let block = parse(&["<ul><li>a</li><li>b</li></ul>"]);
        let ul = only_child(&block);
        assert_eq!(ul.len(), 3);
        assert_eq!(ul.instructions()[1].opcode(), Opcode::ChildRecurse);
        assert_eq!(ul.instructions()[2].opcode(), Opcode::ChildRecurse);
    }

    #[test]
    fn test_parse_indentation_is_dropped() {
        let block = parse(&["\n  <div>\n    <b/>\n  </div>\n"]);
        let div = only_child(&block);
        assert_eq!(div.len(), 2);
        assert_eq!(div.instructions()[1].opcode(), Opcode::ChildRecurse);
    }

    #[test]
    fn test_parse_hole_adjacent_whitespace_is_verbatim() {
        let block = parse(&["<p>\n  ", "\n</p>"]);
        let p = only_child(&block);
        assert_eq!(
            p.instructions(),
            &[
                tag("p"),
                lit("\n  "),
                Instruction::ChildAppend { field: FieldIndex(1), literal: String::new() },
                lit("\n"),
            ]
        );
    }

    #[test]
    fn test_parse_no_segments() {
        let statics: [&str; 0] = [];
        assert!(parse(&statics).is_empty());
    }

    #[test]
    fn test_parse_stray_close_at_top_level() {
        let block = parse(&["</div>text"]);
        assert_eq!(block.instructions(), &[lit("text")]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let statics = ["<a x=", " ...", ">", "</a>"];
        assert_eq!(parse(&statics), parse(&statics));
    }
}
